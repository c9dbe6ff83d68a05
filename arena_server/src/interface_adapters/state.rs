use crate::use_cases::ArenaHandle;

#[derive(Clone)]
pub struct AppState {
    // Channels into and out of the single arena world task.
    pub arena: ArenaHandle,
}

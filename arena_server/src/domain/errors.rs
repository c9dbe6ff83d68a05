// Domain-level errors for the join workflow.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    EmptyName,
    NameTooLong,
    /// The connection already has a live ship.
    AlreadyPlaying,
    /// The world task is gone.
    Unavailable,
}

impl JoinError {
    /// Message shown to the requesting client.
    pub fn message(&self) -> &'static str {
        match self {
            JoinError::EmptyName => "Name can't be null",
            JoinError::NameTooLong => "Name is too long",
            JoinError::AlreadyPlaying => "Already in game",
            JoinError::Unavailable => "Game unavailable",
        }
    }
}

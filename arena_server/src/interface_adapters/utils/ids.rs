use std::sync::atomic::{AtomicU64, Ordering};

/// Returns a process-unique player id for a new connection.
///
/// Ids are never reused while the process runs, so a reconnecting client always gets a
/// fresh identity.
pub fn next_player_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

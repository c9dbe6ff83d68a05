// Notifications the simulation emits at the point of mutation.

use super::state::{IslandSnapshot, PickupSnapshot, PlayerSnapshot, ProjectileSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    PlayerCreated(PlayerSnapshot),
    /// Player died; its connection leaves the game group.
    PlayerRemoved(PlayerSnapshot),
    /// Player disconnected.
    PlayerLeft { id: u64 },
    ProjectileCreated(ProjectileSnapshot),
    ProjectileRemoved(ProjectileSnapshot),
    PickupCreated(PickupSnapshot),
    PickupRemoved(PickupSnapshot),
    IslandCreated(IslandSnapshot),
}

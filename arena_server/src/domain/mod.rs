// Domain layer: core simulation types and rules.

pub mod errors;
pub mod events;
pub mod geometry;
pub mod safe_zone;
pub mod state;
pub mod systems;
pub mod tuning;
pub mod world;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::JoinError;
pub use events::WorldEvent;
pub use state::{
    IslandKind, IslandSnapshot, PickupSnapshot, PlayerSnapshot, ProjectileSnapshot, ShipInput,
    ZoneSnapshot,
};
pub use world::{Welcome, World};

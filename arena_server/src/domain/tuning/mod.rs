// Gameplay tuning, kept separate from runtime/server configuration.

pub mod arena;
pub mod player;
pub mod projectile;

pub use arena::{ArenaTuning, ZoneTuning};
pub use player::PlayerTuning;
pub use projectile::ProjectileTuning;

/// Every tuning table the simulation reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameTuning {
    pub arena: ArenaTuning,
    pub player: PlayerTuning,
    pub projectile: ProjectileTuning,
}

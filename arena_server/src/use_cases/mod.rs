// Use cases layer: application workflows for the arena server.

pub mod arena;
pub mod game;
pub mod types;

pub use arena::{ArenaHandle, ArenaSettings, spawn_arena};
pub use types::{
    DisplayName, GameEvent, LatestSnapshot, TickFrames, TickOutput, WorldUpdate,
};

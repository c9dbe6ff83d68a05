// Shared world builders for deterministic domain tests.

use super::state::Player;
use super::tuning::GameTuning;
use super::world::World;
use glam::Vec2;

/// Tuning with no pools and a zone that covers the whole map.
pub(crate) fn bare_tuning() -> GameTuning {
    let mut tuning = GameTuning::default();
    tuning.arena.max_pickups = 0;
    tuning.arena.max_islands = 0;
    tuning.arena.zone.initial_radius = 10_000.0;
    tuning.arena.zone.min_radius = 10_000.0;
    tuning
}

pub(crate) fn empty_world() -> World {
    World::new(bare_tuning(), 1)
}

/// Registers a ship at an exact pose, bypassing spawn placement.
pub(crate) fn place_player(world: &mut World, id: u64, pos: Vec2, heading: f32) {
    let player = Player::new(id, format!("p{id}"), pos, heading, &world.tuning.player);
    world.players.insert(id, player);
}

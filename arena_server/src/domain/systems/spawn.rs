// Placement for new ships, islands and pickups.

use crate::domain::state::{Island, IslandKind, Pickup};
use crate::domain::world::World;
use glam::Vec2;
use rand::Rng;
use tracing::warn;

/// Uniform draw in `[margin, extent - margin]`, collapsing to the middle when
/// the margin does not fit.
fn draw_axis(rng: &mut impl Rng, extent: f32, margin: f32) -> f32 {
    let lo = margin.min(extent / 2.0);
    let hi = (extent - margin).max(lo);
    rng.random_range(lo..=hi)
}

fn draw_spawn_candidate(world: &mut World) -> Vec2 {
    let arena = world.tuning.arena;
    let x = draw_axis(&mut world.rng, arena.width, arena.spawn_inset);
    let y = draw_axis(&mut world.rng, arena.height, arena.spawn_inset);
    Vec2::new(x, y)
}

fn crowded(world: &World, candidate: Vec2) -> bool {
    let arena = &world.tuning.arena;
    let min_player = arena.min_player_distance * arena.min_player_distance;
    let min_island = arena.min_island_distance * arena.min_island_distance;

    world
        .players
        .values()
        .any(|p| p.pos.distance_squared(candidate) < min_player)
        || world
            .islands
            .values()
            .any(|i| i.pos.distance_squared(candidate) < min_island)
}

/// Rejection-samples a ship position away from other ships and islands.
///
/// A crowded candidate that already sits outside the safe zone is accepted:
/// once the zone has shrunk there may be no free spot left inside it.
pub fn find_player_spawn(world: &mut World) -> Vec2 {
    let attempts = world.tuning.arena.spawn_attempts;

    let mut candidate = draw_spawn_candidate(world);
    for _ in 1..attempts.max(1) {
        if !crowded(world, candidate) || !world.zone.contains(candidate) {
            return candidate;
        }
        candidate = draw_spawn_candidate(world);
    }

    warn!(
        x = candidate.x,
        y = candidate.y,
        attempts,
        "no clear spawn point; accepting crowded candidate"
    );
    candidate
}

/// Uniform placement; only the island constructor's clamping applies.
pub fn place_island(world: &mut World, id: u64) -> Island {
    let arena = world.tuning.arena;
    let x = world.rng.random_range(0.0..=arena.width);
    let y = world.rng.random_range(0.0..=arena.height);
    let kind = if world.rng.random_bool(0.5) {
        IslandKind::Ammo
    } else {
        IslandKind::Health
    };
    Island::new(
        id,
        Vec2::new(x, y),
        arena.island_radius,
        arena.island_restore_scale,
        kind,
        Vec2::new(arena.width, arena.height),
    )
}

pub fn place_pickup(world: &mut World, id: u64) -> Pickup {
    let arena = world.tuning.arena;
    let x = draw_axis(&mut world.rng, arena.width, arena.pickup_radius);
    let y = draw_axis(&mut world.rng, arena.height, arena.pickup_radius);
    let (lo, hi) = arena.pickup_reward;
    let ammo = world.rng.random_range(lo.min(hi)..=hi.max(lo));
    Pickup {
        id,
        pos: Vec2::new(x, y),
        ammo,
        radius: arena.pickup_radius,
    }
}

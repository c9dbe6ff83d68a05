// Collision pass: ship pairs, then each ship against pickups, cannonballs and islands.
//
// Every loop walks ids captured up front and re-looks each one up, so entities
// removed earlier in the pass are skipped rather than touched.

use crate::domain::geometry::{polygon_intersects_circle, polygons_intersect};
use crate::domain::events::WorldEvent;
use crate::domain::state::{IslandKind, PickupSnapshot};
use crate::domain::world::World;
use tracing::{debug, info};

/// Which directional segments of two overlapping ships reach into the other hull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RamContacts {
    pub a_prow_hits_b: bool,
    pub b_prow_hits_a: bool,
    pub a_midline_hits_b: bool,
    pub b_midline_hits_a: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamOutcome {
    BothKilled,
    AKilled,
    BKilled,
    /// Hulls overlap but no directional segment does.
    Unresolved,
}

/// Prow contacts decide first; midlines only break the tie when no prow hits.
pub fn ram_outcome(c: RamContacts) -> RamOutcome {
    match (c.a_prow_hits_b, c.b_prow_hits_a) {
        (true, true) => RamOutcome::BothKilled,
        (true, false) => RamOutcome::BKilled,
        (false, true) => RamOutcome::AKilled,
        (false, false) => match (c.a_midline_hits_b, c.b_midline_hits_a) {
            (true, true) => RamOutcome::BothKilled,
            (true, false) => RamOutcome::BKilled,
            (false, true) => RamOutcome::AKilled,
            (false, false) => RamOutcome::Unresolved,
        },
    }
}

pub fn resolve(world: &mut World) {
    let players: Vec<u64> = world.players.keys().copied().collect();

    for &a in &players {
        for &b in players.iter().filter(|&&b| b < a) {
            collide_players(world, a, b);
        }

        let pickups: Vec<u64> = world.pickups.keys().copied().collect();
        for pickup in pickups {
            collide_player_and_pickup(world, a, pickup);
        }

        let projectiles: Vec<u64> = world.projectiles.keys().copied().collect();
        for projectile in projectiles {
            collide_player_and_projectile(world, a, projectile);
        }

        let islands: Vec<u64> = world.islands.keys().copied().collect();
        for island in islands {
            collide_player_and_island_restore(world, a, island);
            collide_player_and_island_ground(world, a, island);
        }
    }
}

pub fn collide_players(world: &mut World, a: u64, b: u64) {
    if a == b {
        return;
    }
    let tuning = world.tuning.player;
    let (Some(pa), Some(pb)) = (world.players.get(&a), world.players.get(&b)) else {
        return;
    };
    if pa.dead || pb.dead {
        return;
    }

    let (hull_a, hull_b) = (pa.hull(&tuning), pb.hull(&tuning));
    if !polygons_intersect(&hull_a, &hull_b) {
        return;
    }

    let contacts = RamContacts {
        a_prow_hits_b: polygons_intersect(&pa.prow(&tuning), &hull_b),
        b_prow_hits_a: polygons_intersect(&pb.prow(&tuning), &hull_a),
        a_midline_hits_b: polygons_intersect(&pa.midline(&tuning), &hull_b),
        b_midline_hits_a: polygons_intersect(&pb.midline(&tuning), &hull_a),
    };

    match ram_outcome(contacts) {
        RamOutcome::BothKilled => {
            info!(a, b, "ships collided; both sunk");
            world.player_killed(a);
            world.player_killed(b);
        }
        RamOutcome::AKilled => {
            info!(rammer = b, victim = a, "ship rammed");
            world.player_killed(a);
        }
        RamOutcome::BKilled => {
            info!(rammer = a, victim = b, "ship rammed");
            world.player_killed(b);
        }
        RamOutcome::Unresolved => {
            debug!(a, b, ?contacts, "unresolved ship contact");
        }
    }
}

pub fn collide_player_and_pickup(world: &mut World, player_id: u64, pickup_id: u64) {
    let tuning = world.tuning.player;
    let (Some(player), Some(pickup)) = (
        world.players.get(&player_id),
        world.pickups.get(&pickup_id),
    ) else {
        return;
    };
    if !polygon_intersects_circle(&player.hull(&tuning), &pickup.shape()) {
        return;
    }

    let Some(pickup) = world.pickups.remove(&pickup_id) else {
        return;
    };
    if let Some(player) = world.players.get_mut(&player_id) {
        player.ammo = player.ammo.saturating_add(pickup.ammo);
        debug!(player_id, reward = pickup.ammo, ammo = player.ammo, "pickup collected");
    }
    world.emit(WorldEvent::PickupRemoved(PickupSnapshot::from(&pickup)));
    world.refill_pickups();
}

pub fn collide_player_and_projectile(world: &mut World, player_id: u64, projectile_id: u64) {
    let tuning = world.tuning.player;
    let (Some(player), Some(projectile)) = (
        world.players.get(&player_id),
        world.projectiles.get(&projectile_id),
    ) else {
        return;
    };
    // No self-damage.
    if projectile.creator_id == player_id {
        return;
    }
    if !polygon_intersects_circle(&player.hull(&tuning), &projectile.shape()) {
        return;
    }

    let shooter_id = projectile.creator_id;
    world.remove_projectile(projectile_id);

    let Some(player) = world.players.get_mut(&player_id) else {
        return;
    };
    player.health = player.health.saturating_sub(1);
    info!(
        victim_id = player_id,
        shooter_id,
        projectile_id,
        victim_health = player.health,
        "player hit"
    );
    if player.health == 0 {
        world.player_killed(player_id);
    }
}

pub fn collide_player_and_island_restore(world: &mut World, player_id: u64, island_id: u64) {
    if !world.on_period_boundary() {
        return;
    }
    let tuning = world.tuning.player;
    let (Some(player), Some(island)) = (
        world.players.get(&player_id),
        world.islands.get(&island_id),
    ) else {
        return;
    };
    if !polygon_intersects_circle(&player.hull(&tuning), &island.restore()) {
        return;
    }

    let kind = island.kind;
    if let Some(player) = world.players.get_mut(&player_id) {
        match kind {
            IslandKind::Ammo => player.ammo = player.ammo.saturating_add(1),
            IslandKind::Health => {
                player.health = player.health.saturating_add(1).min(tuning.max_health)
            }
        }
        debug!(player_id, island_id, ?kind, "resource restored");
    }
}

pub fn collide_player_and_island_ground(world: &mut World, player_id: u64, island_id: u64) {
    let tuning = world.tuning.player;
    let (Some(player), Some(island)) = (
        world.players.get(&player_id),
        world.islands.get(&island_id),
    ) else {
        return;
    };
    if polygon_intersects_circle(&player.hull(&tuning), &island.ground()) {
        info!(player_id, island_id, "ship ran aground");
        world.player_killed(player_id);
    }
}

// Charged broadside shots and out-of-zone damage.

use crate::domain::state::{Player, Projectile, Side};
use crate::domain::tuning::{PlayerTuning, ProjectileTuning};
use crate::domain::world::World;
use glam::Vec2;
use tracing::debug;

/// Position and velocity of one cannonball about to be fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
}

pub fn tick_players(world: &mut World) {
    let now = world.clock_ms;
    let ids: Vec<u64> = world.players.keys().copied().collect();

    for id in ids {
        for side in [Side::Left, Side::Right] {
            let Some(player) = world.players.get_mut(&id).filter(|p| !p.dead) else {
                break;
            };
            let shots = update_charge(player, side, now, &world.tuning.player, &world.tuning.projectile);
            for shot in shots {
                let projectile = Projectile {
                    id: world.alloc_id(),
                    creator_id: id,
                    pos: shot.pos,
                    vel: shot.vel,
                    z: world.tuning.projectile.launch_z,
                    radius: world.tuning.projectile.radius,
                };
                world.add_projectile(projectile);
            }
        }

        apply_zone_damage(world, id);
    }
}

/// Advances one side's charge state; returns the volley on release.
pub fn update_charge(
    player: &mut Player,
    side: Side,
    now: u64,
    ship: &PlayerTuning,
    cannon: &ProjectileTuning,
) -> Vec<Shot> {
    let held = match side {
        Side::Left => player.input.charge_left,
        Side::Right => player.input.charge_right,
    };
    let ammo = player.ammo;
    let start = player.charge_start(side);

    match (held, *start) {
        (true, None) if ammo > 0 => {
            *start = Some(now);
            Vec::new()
        }
        (false, Some(started)) => {
            *start = None;
            let count = volley_size(now.saturating_sub(started), ammo, cannon);
            player.ammo -= count;
            if count > 0 {
                debug!(player_id = player.id, ?side, count, "volley fired");
            }
            volley(player, side, count, ship, cannon)
        }
        _ => Vec::new(),
    }
}

/// Cannonballs fired for a hold of `hold_ms`, bounded by ammo and volley size.
pub fn volley_size(hold_ms: u64, ammo: u32, cannon: &ProjectileTuning) -> u32 {
    if ammo == 0 || hold_ms < cannon.min_charge_ms {
        return 0;
    }
    let steps = (hold_ms - cannon.min_charge_ms) / cannon.charge_step_ms.max(1);
    let count = u32::try_from(steps).unwrap_or(u32::MAX).saturating_add(1);
    count.min(cannon.max_volley).min(ammo)
}

fn volley(
    player: &Player,
    side: Side,
    count: u32,
    ship: &PlayerTuning,
    cannon: &ProjectileTuning,
) -> Vec<Shot> {
    let fwd = Vec2::from_angle(player.heading);
    let out = match side {
        Side::Left => fwd.perp(),
        Side::Right => -fwd.perp(),
    };
    let center = (count as f32 - 1.0) / 2.0;

    (0..count)
        .map(|i| {
            let along = (i as f32 - center) * cannon.volley_spacing;
            Shot {
                pos: player.pos + fwd * along + out * ship.half_beam,
                vel: out * cannon.speed,
            }
        })
        .collect()
}

/// Ships outside the zone lose one health per damage window.
fn apply_zone_damage(world: &mut World, id: u64) {
    if !world.on_period_boundary() {
        return;
    }
    let Some(player) = world.players.get_mut(&id) else {
        return;
    };
    if world.zone.contains(player.pos) {
        return;
    }

    player.health = player.health.saturating_sub(1);
    debug!(player_id = id, health = player.health, "zone damage");
    if player.health == 0 {
        world.player_killed(id);
    }
}

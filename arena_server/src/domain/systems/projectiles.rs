use crate::domain::world::World;
use tracing::debug;

pub fn tick_projectiles(world: &mut World, dt: f32) {
    let z_decay = world.tuning.projectile.z_decay;

    // Integrate projectile movement and altitude.
    for p in world.projectiles.values_mut() {
        p.pos += p.vel * dt;
        p.z -= z_decay * dt;
    }

    // Despawn after the scan so removal never races the iteration.
    let expired: Vec<u64> = world
        .projectiles
        .values()
        .filter(|p| p.z <= 0.0)
        .map(|p| p.id)
        .collect();
    for id in expired {
        debug!(projectile_id = id, "projectile splashed down");
        world.remove_projectile(id);
    }
}

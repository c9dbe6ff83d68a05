// Per-tick systems, run by `World::tick` in a fixed order.

pub mod collision;
pub mod combat;
pub mod movement;
pub mod projectiles;
pub mod spawn;

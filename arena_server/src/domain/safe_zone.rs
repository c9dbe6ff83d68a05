// Shrinking circular safe zone.

use super::state::ZoneSnapshot;
use super::tuning::ZoneTuning;
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct SafeZone {
    pub center: Vec2,
    pub radius: f32,
    /// World bounds the zone shrinks within.
    pub bounds: Vec2,
    schedule: ZoneTuning,
}

impl SafeZone {
    pub fn new(schedule: ZoneTuning, bounds: Vec2) -> Self {
        let center = Vec2::new(schedule.center_x, schedule.center_y).clamp(Vec2::ZERO, bounds);
        Self {
            center,
            radius: schedule.initial_radius,
            bounds,
            schedule,
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        pos.distance_squared(self.center) <= self.radius * self.radius
    }

    /// Radius after `tick` ticks, independent of any previous update.
    pub fn radius_at(&self, tick: u64) -> f32 {
        let s = &self.schedule;
        let cycle = s.shrink_ticks + s.pause_ticks;
        if tick <= s.start_delay_ticks || s.shrink_ticks == 0 {
            return s.initial_radius;
        }

        let t = tick - s.start_delay_ticks;
        let shrinking = (t / cycle) * s.shrink_ticks + (t % cycle).min(s.shrink_ticks);
        (s.initial_radius - shrinking as f32 * s.shrink_per_tick).max(s.min_radius)
    }

    pub fn update(&mut self, tick: u64) {
        self.radius = self.radius_at(tick);
    }
}

impl From<&SafeZone> for ZoneSnapshot {
    fn from(z: &SafeZone) -> Self {
        Self {
            x: z.center.x,
            y: z.center.y,
            radius: z.radius,
        }
    }
}

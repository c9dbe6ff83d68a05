// Domain-level simulation entities and input/snapshot types.

use super::geometry::{Circle, Polygon};
use super::tuning::PlayerTuning;
use glam::Vec2;

/// Latest intent flags received for a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipInput {
    pub move_forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub charge_left: bool,
    pub charge_right: bool,
}

/// Cannon side of a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IslandKind {
    /// Restores ammo.
    Ammo,
    /// Restores health.
    Health,
}

pub struct Player {
    pub id: u64,
    pub name: String,
    pub pos: Vec2,
    pub heading: f32,

    // Combat state.
    pub health: u32,
    pub ammo: u32,
    pub dead: bool,

    pub input: ShipInput,
    // World-clock millis when each side started charging.
    pub left_charge_start: Option<u64>,
    pub right_charge_start: Option<u64>,
}

pub struct Projectile {
    pub id: u64,
    pub creator_id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    pub z: f32,
    pub radius: f32,
}

pub struct Pickup {
    pub id: u64,
    pub pos: Vec2,
    pub ammo: u32,
    pub radius: f32,
}

pub struct Island {
    pub id: u64,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: IslandKind,
    pub restore_radius: f32,
}

impl Player {
    pub fn new(id: u64, name: String, pos: Vec2, heading: f32, tuning: &PlayerTuning) -> Self {
        Self {
            id,
            name,
            pos,
            heading,
            health: tuning.max_health,
            ammo: tuning.start_ammo,
            dead: false,
            input: ShipInput::default(),
            left_charge_start: None,
            right_charge_start: None,
        }
    }

    pub fn charge_start(&mut self, side: Side) -> &mut Option<u64> {
        match side {
            Side::Left => &mut self.left_charge_start,
            Side::Right => &mut self.right_charge_start,
        }
    }

    pub fn hull(&self, tuning: &PlayerTuning) -> Polygon {
        let (l, w) = (tuning.half_length, tuning.half_beam);
        let local = [
            Vec2::new(l, 0.0),
            Vec2::new(0.3 * l, w),
            Vec2::new(-l, w),
            Vec2::new(-l, -w),
            Vec2::new(0.3 * l, -w),
        ];
        Polygon::from_local(&local, self.pos, self.heading)
    }

    /// Bow segment, from the tip back along the keel.
    pub fn prow(&self, tuning: &PlayerTuning) -> Polygon {
        let l = tuning.half_length;
        self.keel_segment(0.65 * l, l)
    }

    /// Keel segment behind the prow.
    pub fn midline(&self, tuning: &PlayerTuning) -> Polygon {
        let l = tuning.half_length;
        self.keel_segment(-0.9 * l, 0.65 * l)
    }

    fn keel_segment(&self, from: f32, to: f32) -> Polygon {
        let fwd = Vec2::from_angle(self.heading);
        Polygon::segment(self.pos + fwd * from, self.pos + fwd * to)
    }
}

/// Clamps to `[margin, extent - margin]`, collapsing to the middle when
/// the margin does not fit.
fn clamp_axis(value: f32, extent: f32, margin: f32) -> f32 {
    let lo = margin.min(extent / 2.0);
    let hi = (extent - margin).max(lo);
    value.clamp(lo, hi)
}

impl Projectile {
    pub fn shape(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

impl Pickup {
    pub fn shape(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

impl Island {
    /// Keeps the whole restore circle inside the world.
    pub fn new(
        id: u64,
        pos: Vec2,
        radius: f32,
        restore_scale: f32,
        kind: IslandKind,
        bounds: Vec2,
    ) -> Self {
        let restore_radius = radius * restore_scale.max(1.0);
        let pos = Vec2::new(
            clamp_axis(pos.x, bounds.x, restore_radius),
            clamp_axis(pos.y, bounds.y, restore_radius),
        );
        Self {
            id,
            pos,
            radius,
            kind,
            restore_radius,
        }
    }

    pub fn ground(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    pub fn restore(&self) -> Circle {
        Circle::new(self.pos, self.restore_radius)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: u64,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub health: u32,
    pub ammo: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSnapshot {
    pub id: u64,
    pub creator_id: u64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickupSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub ammo: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IslandSnapshot {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub restore_radius: f32,
    pub kind: IslandKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSnapshot {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            x: p.pos.x,
            y: p.pos.y,
            heading: p.heading,
            health: p.health,
            ammo: p.ammo,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            creator_id: p.creator_id,
            x: p.pos.x,
            y: p.pos.y,
            z: p.z,
        }
    }
}

impl From<&Pickup> for PickupSnapshot {
    fn from(p: &Pickup) -> Self {
        Self {
            id: p.id,
            x: p.pos.x,
            y: p.pos.y,
            ammo: p.ammo,
        }
    }
}

impl From<&Island> for IslandSnapshot {
    fn from(i: &Island) -> Self {
        Self {
            id: i.id,
            x: i.pos.x,
            y: i.pos.y,
            radius: i.radius,
            restore_radius: i.restore_radius,
            kind: i.kind,
        }
    }
}

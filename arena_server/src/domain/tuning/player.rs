/// Gameplay tuning for player-controlled ships.
///
/// Hull dimensions describe the ship in its local frame, bow pointing along +X.

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Forward speed in world units per second while `move_forward` is held.
    pub speed: f32,

    /// Rotation speed in radians per second.
    pub turn_rate: f32,

    /// Health on spawn; regeneration saturates here.
    pub max_health: u32,

    /// Ammo on spawn.
    pub start_ammo: u32,

    /// Distance from the ship center to the bow tip (and to the stern).
    pub half_length: f32,

    /// Half the ship's width.
    pub half_beam: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 110.0,
            turn_rate: 1.6,
            max_health: 3,
            start_ammo: 10,
            half_length: 40.0,
            half_beam: 14.0,
        }
    }
}

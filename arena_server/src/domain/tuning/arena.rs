/// World-level tuning: dimensions, entity pools, hazards and the safe zone.

#[derive(Debug, Clone, Copy)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,

    /// Pickup pool target; kept full at all times.
    pub max_pickups: usize,

    /// Islands placed at world start.
    pub max_islands: usize,

    /// Ticks per damage/regeneration window.
    pub damage_period_ticks: u64,

    pub pickup_radius: f32,
    /// Inclusive ammo reward range for a pickup.
    pub pickup_reward: (u32, u32),

    /// Ground radius of an island; touching it is fatal.
    pub island_radius: f32,
    /// Restore radius as a multiple of the ground radius.
    pub island_restore_scale: f32,

    /// Player spawns stay this far from every world edge.
    pub spawn_inset: f32,
    pub min_player_distance: f32,
    pub min_island_distance: f32,
    pub spawn_attempts: u32,

    pub zone: ZoneTuning,
}

/// Shrink schedule for the safe zone, expressed in ticks.
#[derive(Debug, Clone, Copy)]
pub struct ZoneTuning {
    pub center_x: f32,
    pub center_y: f32,
    pub initial_radius: f32,
    pub min_radius: f32,
    /// Ticks before the first shrink phase begins.
    pub start_delay_ticks: u64,
    pub shrink_ticks: u64,
    pub pause_ticks: u64,
    pub shrink_per_tick: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            max_pickups: 15,
            max_islands: 10,
            damage_period_ticks: 120,
            pickup_radius: 12.0,
            pickup_reward: (1, 5),
            island_radius: 100.0,
            island_restore_scale: 1.6,
            spawn_inset: 250.0,
            min_player_distance: 130.0,
            min_island_distance: 220.0,
            spawn_attempts: 64,
            zone: ZoneTuning::default(),
        }
    }
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            center_x: 1000.0,
            center_y: 1000.0,
            initial_radius: 1000.0,
            min_radius: 150.0,
            start_delay_ticks: 500,
            shrink_ticks: 250,
            pause_ticks: 500,
            shrink_per_tick: 0.5,
        }
    }
}

/// Gameplay tuning for cannonballs and the charged-shot mechanic.

#[derive(Debug, Clone, Copy)]
pub struct ProjectileTuning {
    /// Flight speed in world units per second.
    pub speed: f32,

    /// Collision radius.
    pub radius: f32,

    /// Altitude a cannonball leaves the deck with.
    pub launch_z: f32,

    /// Altitude lost per second; the ball is gone once `z` reaches zero.
    pub z_decay: f32,

    /// Holds shorter than this fire nothing.
    pub min_charge_ms: u64,

    /// Each further step of holding adds one cannonball to the volley.
    pub charge_step_ms: u64,

    /// Upper bound on a single volley.
    pub max_volley: u32,

    /// Distance between neighbouring cannonballs along the hull.
    pub volley_spacing: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 260.0,
            radius: 5.0,
            launch_z: 1.0,
            z_decay: 1.0,
            min_charge_ms: 150,
            charge_step_ms: 300,
            max_volley: 3,
            volley_spacing: 18.0,
        }
    }
}

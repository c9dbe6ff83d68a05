use crate::domain::tuning::GameTuning;
use std::{env, str::FromStr, time::Duration};

// Runtime/server settings read once at startup. Gameplay defaults live in domain::tuning.

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub fn http_port() -> u16 {
    env_parse("ARENA_SERVER_PORT").unwrap_or(3001)
}

pub fn tick_interval() -> Duration {
    let millis = env_parse::<u64>("ARENA_TICK_MS")
        .filter(|ms| *ms > 0)
        .unwrap_or(60);
    Duration::from_millis(millis)
}

/// Placement seed; random per process unless pinned for replays.
pub fn seed() -> u64 {
    env_parse("ARENA_SEED").unwrap_or_else(rand::random)
}

/// Default tuning with any `ARENA_*` overrides applied.
pub fn game_tuning() -> GameTuning {
    let mut tuning = GameTuning::default();
    let arena = &mut tuning.arena;

    if let Some(v) = env_parse("ARENA_WIDTH") {
        arena.width = v;
    }
    if let Some(v) = env_parse("ARENA_HEIGHT") {
        arena.height = v;
    }
    if let Some(v) = env_parse("ARENA_MAX_PICKUPS") {
        arena.max_pickups = v;
    }
    if let Some(v) = env_parse("ARENA_MAX_ISLANDS") {
        arena.max_islands = v;
    }
    if let Some(v) = env_parse::<u64>("ARENA_DAMAGE_PERIOD_TICKS") {
        arena.damage_period_ticks = v.max(1);
    }

    let zone = &mut arena.zone;
    if let Some(v) = env_parse("ARENA_ZONE_CENTER_X") {
        zone.center_x = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_CENTER_Y") {
        zone.center_y = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_RADIUS") {
        zone.initial_radius = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_MIN_RADIUS") {
        zone.min_radius = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_START_DELAY_TICKS") {
        zone.start_delay_ticks = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_SHRINK_TICKS") {
        zone.shrink_ticks = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_PAUSE_TICKS") {
        zone.pause_ticks = v;
    }
    if let Some(v) = env_parse("ARENA_ZONE_SHRINK_PER_TICK") {
        zone.shrink_per_tick = v;
    }

    tuning
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_value_is_unparseable_then_it_is_ignored() {
        // Unique key so parallel tests never race on it.
        unsafe { env::set_var("ARENA_TEST_UNPARSEABLE", "wide") };
        assert_eq!(env_parse::<f32>("ARENA_TEST_UNPARSEABLE"), None);
    }

    #[test]
    fn when_value_has_whitespace_then_it_is_trimmed() {
        unsafe { env::set_var("ARENA_TEST_PADDED", " 42 ") };
        assert_eq!(env_parse::<u64>("ARENA_TEST_PADDED"), Some(42));
    }
}

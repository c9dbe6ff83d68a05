// Arena orchestration: owns the channel wiring around the single world task.

use crate::domain::World;
use crate::domain::tuning::GameTuning;
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, LatestSnapshot, TickFrames, TickOutput};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::info;

/// Settings fixed when the arena starts.
#[derive(Debug, Clone)]
pub struct ArenaSettings {
    /// Capacity for inbound connection events.
    pub input_channel_capacity: usize,
    /// Capacity for per-tick broadcasts.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// Seed for deterministic placement.
    pub seed: u64,
    pub tuning: GameTuning,
}

/// Channels connection tasks use to talk to the arena.
#[derive(Clone)]
pub struct ArenaHandle {
    /// Sender for events into the world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Raw per-tick output from the world task.
    pub tick_tx: broadcast::Sender<TickOutput>,
    /// Serialized per-tick frames, shared by every connection.
    pub frames_tx: broadcast::Sender<Arc<TickFrames>>,
    /// Latest serialized snapshot for lag recovery.
    pub latest_tx: watch::Sender<Arc<LatestSnapshot>>,
    shutdown: Arc<Notify>,
}

impl ArenaHandle {
    /// Stops the world task after its current tick.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Builds the world and spawns its task.
pub fn spawn_arena(settings: ArenaSettings) -> ArenaHandle {
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(settings.input_channel_capacity);
    let (tick_tx, _tick_rx) = broadcast::channel::<TickOutput>(settings.world_broadcast_capacity);
    let (frames_tx, _frames_rx) =
        broadcast::channel::<Arc<TickFrames>>(settings.world_broadcast_capacity);
    let (latest_tx, _latest_rx) = watch::channel(Arc::new(LatestSnapshot::empty()));
    let shutdown = Arc::new(Notify::new());

    let world = World::new(settings.tuning, settings.seed);
    info!(
        seed = settings.seed,
        width = settings.tuning.arena.width,
        height = settings.tuning.arena.height,
        islands = world.islands.len(),
        pickups = world.pickups.len(),
        tick_ms = settings.tick_interval.as_millis() as u64,
        "arena created"
    );

    tokio::spawn(world_task(
        world,
        input_rx,
        tick_tx.clone(),
        settings.tick_interval,
        shutdown.clone(),
    ));

    ArenaHandle {
        input_tx,
        tick_tx,
        frames_tx,
        latest_tx,
        shutdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    fn settings() -> ArenaSettings {
        ArenaSettings {
            input_channel_capacity: 16,
            world_broadcast_capacity: 16,
            tick_interval: Duration::from_millis(5),
            seed: 1,
            tuning: GameTuning::default(),
        }
    }

    #[tokio::test]
    async fn when_arena_spawns_then_ticks_are_broadcast() {
        let arena = spawn_arena(settings());
        let mut rx = arena.tick_tx.subscribe();

        let out = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("tick in time")
            .expect("channel open");
        assert!(out.update.tick >= 1);
        arena.shutdown();
    }

    #[tokio::test]
    async fn when_arena_shuts_down_then_input_channel_closes() {
        let arena = spawn_arena(settings());
        arena.shutdown();

        let closed = timeout(Duration::from_secs(2), arena.input_tx.closed()).await;
        assert!(closed.is_ok());
    }
}

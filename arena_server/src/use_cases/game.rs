use super::types::{GameEvent, TickOutput, WorldUpdate};
use crate::domain::{World, ZoneSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc};
use tracing::{debug, info};

/// Drives the fixed-step simulation. Sole owner and writer of `world`.
pub async fn world_task(
    mut world: World,
    mut input_rx: mpsc::Receiver<GameEvent>,
    tick_tx: broadcast::Sender<TickOutput>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    let mut interval = tokio::time::interval(tick_interval);
    // A stalled runtime should not trigger a burst of catch-up ticks.
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("world task shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            apply_event(&mut world, ev);
        }

        world.tick(tick_interval);

        let output = TickOutput {
            events: world.drain_events(),
            update: WorldUpdate {
                tick: world.delta,
                players: world.player_snapshots(),
                projectiles: world.projectile_snapshots(),
                pickups: world.pickup_snapshots(),
                islands: world.island_snapshots(),
                zone: ZoneSnapshot::from(&world.zone),
            },
        };
        // Fails only when nobody is subscribed.
        let _ = tick_tx.send(output);
    }
}

fn apply_event(world: &mut World, ev: GameEvent) {
    match ev {
        GameEvent::Join {
            player_id,
            name,
            reply,
        } => {
            info!(player_id, name = name.as_str(), "join requested");
            let result = world.spawn_player(player_id, name.into_inner());
            if reply.send(result).is_err() {
                // Requester vanished before the reply; undo the spawn.
                debug!(player_id, "join reply dropped");
                world.remove_player(player_id);
            }
        }
        GameEvent::Leave { player_id } => {
            world.remove_player(player_id);
        }
        GameEvent::Input { player_id, input } => {
            world.set_input(player_id, input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::GameTuning;
    use crate::domain::{JoinError, ShipInput, Welcome, WorldEvent};
    use crate::use_cases::types::DisplayName;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    const TICK: Duration = Duration::from_millis(5);
    const WAIT: Duration = Duration::from_secs(2);

    struct Harness {
        input_tx: mpsc::Sender<GameEvent>,
        tick_rx: broadcast::Receiver<TickOutput>,
        shutdown: Arc<Notify>,
    }

    fn start() -> Harness {
        start_with(GameTuning::default())
    }

    fn start_with(tuning: GameTuning) -> Harness {
        let (input_tx, input_rx) = mpsc::channel(64);
        let (tick_tx, tick_rx) = broadcast::channel(256);
        let shutdown = Arc::new(Notify::new());
        let world = World::new(tuning, 42);
        tokio::spawn(world_task(
            world,
            input_rx,
            tick_tx,
            TICK,
            shutdown.clone(),
        ));
        Harness {
            input_tx,
            tick_rx,
            shutdown,
        }
    }

    async fn join(h: &Harness, player_id: u64, name: &str) -> Result<Welcome, JoinError> {
        let (reply, rx) = oneshot::channel();
        h.input_tx
            .send(GameEvent::Join {
                player_id,
                name: DisplayName::parse(name).expect("valid name"),
                reply,
            })
            .await
            .expect("world task alive");
        timeout(WAIT, rx)
            .await
            .expect("join reply in time")
            .expect("reply sender kept")
    }

    /// Reads ticks until `pred` matches an event or the wait runs out.
    async fn wait_for_event(
        rx: &mut broadcast::Receiver<TickOutput>,
        pred: impl Fn(&WorldEvent) -> bool,
    ) -> bool {
        timeout(WAIT, async {
            loop {
                match rx.recv().await {
                    Ok(out) if out.events.iter().any(&pred) => return true,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return false,
                }
            }
        })
        .await
        .unwrap_or(false)
    }

    #[tokio::test]
    async fn when_player_joins_then_welcome_and_created_event_follow() {
        let mut h = start();

        let welcome = join(&h, 7, "Pilot").await.expect("join accepted");
        assert_eq!(welcome.player.id, 7);
        assert_eq!(welcome.player.name, "Pilot");
        assert_eq!(welcome.islands.len(), 10);

        assert!(
            wait_for_event(&mut h.tick_rx, |e| {
                matches!(e, WorldEvent::PlayerCreated(p) if p.id == 7)
            })
            .await
        );
        h.shutdown.notify_one();
    }

    #[tokio::test]
    async fn when_player_joins_twice_then_second_reply_is_an_error() {
        let h = start();
        join(&h, 7, "Pilot").await.expect("first join");
        assert_eq!(
            join(&h, 7, "Pilot").await.err(),
            Some(JoinError::AlreadyPlaying)
        );
        h.shutdown.notify_one();
    }

    #[tokio::test]
    async fn when_input_arrives_then_snapshot_reflects_movement() {
        // Open water, so the ship cannot run aground while the test watches.
        let mut tuning = GameTuning::default();
        tuning.arena.max_islands = 0;
        let mut h = start_with(tuning);
        let welcome = join(&h, 7, "Pilot").await.expect("join accepted");
        h.input_tx
            .send(GameEvent::Input {
                player_id: 7,
                input: ShipInput {
                    move_forward: true,
                    ..ShipInput::default()
                },
            })
            .await
            .expect("world task alive");

        let moved = timeout(WAIT, async {
            loop {
                if let Ok(out) = h.tick_rx.recv().await {
                    let Some(p) = out.update.players.iter().find(|p| p.id == 7) else {
                        continue;
                    };
                    if p.y > welcome.player.y + 1.0 {
                        return true;
                    }
                }
            }
        })
        .await
        .unwrap_or(false);
        assert!(moved);
        h.shutdown.notify_one();
    }

    #[tokio::test]
    async fn when_player_leaves_then_left_event_is_broadcast() {
        let mut h = start();
        join(&h, 7, "Pilot").await.expect("join accepted");
        h.input_tx
            .send(GameEvent::Leave { player_id: 7 })
            .await
            .expect("world task alive");

        assert!(
            wait_for_event(&mut h.tick_rx, |e| {
                matches!(e, WorldEvent::PlayerLeft { id } if *id == 7)
            })
            .await
        );
        h.shutdown.notify_one();
    }
}

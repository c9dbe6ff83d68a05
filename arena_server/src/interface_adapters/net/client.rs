use crate::domain::{JoinError, ShipInput, WorldEvent};
use crate::interface_adapters::protocol::{
    ClientMessage, ResyncDto, ServerMessage, WelcomeDto, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::ids::next_player_id;
use crate::use_cases::{
    ArenaHandle, DisplayName, GameEvent, LatestSnapshot, TickFrames, TickOutput,
};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::timeout;
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    InputClosed,
    FramesClosed,
    JoinTimeout,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

fn to_frame(msg: &ServerMessage) -> Result<Utf8Bytes, serde_json::Error> {
    Ok(Utf8Bytes::from(serde_json::to_string(msg)?))
}

/// Turns tick outputs into shared frames and the lag-recovery resync.
#[derive(Debug, Default)]
struct TickSerializer {
    // Ticks were lost since the last serialized one.
    gap: bool,
}

impl TickSerializer {
    fn missed(&mut self) {
        self.gap = true;
    }

    fn serialize(
        &mut self,
        output: TickOutput,
    ) -> Result<(TickFrames, LatestSnapshot), serde_json::Error> {
        let tick = output.update.tick;
        let players: Vec<u64> = output.update.players.iter().map(|p| p.id).collect();
        let mut messages = Vec::with_capacity(output.events.len() + 1);
        let mut killed = Vec::new();

        for event in output.events {
            if let WorldEvent::PlayerRemoved(p) = &event {
                killed.push(p.id);
            }
            messages.push(to_frame(&ServerMessage::from(event))?);
        }

        let resync = to_frame(&ServerMessage::Resync(ResyncDto::from(&output.update)))?;
        let alive = if self.gap {
            // Notifications from the lost ticks are gone; replace client state instead.
            messages.push(resync.clone());
            Some(players.clone())
        } else {
            let update = ServerMessage::WorldUpdate(WorldUpdateDto::from(&output.update));
            messages.push(to_frame(&update)?);
            None
        };
        self.gap = false;

        let latest = LatestSnapshot {
            tick,
            resync,
            players,
        };
        Ok((
            TickFrames {
                tick,
                messages,
                killed,
                alive,
            },
            latest,
        ))
    }
}

pub async fn tick_serializer(
    mut tick_rx: broadcast::Receiver<TickOutput>,
    frames_tx: broadcast::Sender<Arc<TickFrames>>,
    latest_tx: watch::Sender<Arc<LatestSnapshot>>,
) {
    // Serialize each tick once and broadcast the shared frames.
    let mut serializer = TickSerializer::default();
    loop {
        match tick_rx.recv().await {
            Ok(output) => {
                let (frames, latest) = match serializer.serialize(output) {
                    Ok(out) => out,
                    Err(e) => {
                        error!(error = ?e, "failed to serialize tick");
                        serializer.missed();
                        continue;
                    }
                };
                // Store the latest resync for lag recovery.
                let _ = latest_tx.send(Arc::new(latest));
                let _ = frames_tx.send(Arc::new(frames));
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "tick serializer lagged; next frames carry a resync");
                serializer.missed();
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("tick channel closed; serializer exiting");
                break;
            }
        }
    }
}

pub fn spawn_arena_serializer(arena: &ArenaHandle) {
    tokio::spawn(tick_serializer(
        arena.tick_tx.subscribe(),
        arena.frames_tx.clone(),
        arena.latest_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let arena = state.arena.clone();
    ws.on_upgrade(move |socket| {
        let player_id = next_player_id();
        let span = info_span!("conn", player_id);
        handle_socket(socket, arena, player_id).instrument(span)
    })
}

async fn handle_socket(mut socket: WebSocket, arena: ArenaHandle, player_id: u64) {
    // Subscribe before the first await so no tick is missed.
    let frames_rx = arena.frames_tx.subscribe();
    let latest_rx = arena.latest_tx.subscribe();

    // Tell the client "This is who you are".
    let identity = ServerMessage::Identity {
        player_id: player_id.to_string(),
    };
    if let Err(e) = send_message(&mut socket, &identity).await {
        warn!(error = ?e, "failed to send identity");
        return;
    }
    info!("client connected");

    let now = Instant::now() - LOG_THROTTLE;
    let mut ctx = ConnCtx {
        player_id,
        group: Group::Lobby,
        input_tx: arena.input_tx.clone(),
        frames_rx,
        latest_rx,
        lag_recovery_count: 0,
        msgs_in: 0,
        msgs_out: 1,
        invalid_json: 0,
        last_input_full_log: now,
        last_frames_lag_log: now,
        last_invalid_input_log: now,
        close_frame: None,
    };

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

/// Transport-side membership of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    /// Connected but not playing; receives no game broadcasts.
    Lobby,
    /// Playing; the client already holds everything before `from_tick`.
    Game { from_tick: u64 },
}

impl Group {
    /// Whether frames for `tick` should reach this connection.
    fn receives(self, tick: u64) -> bool {
        matches!(self, Group::Game { from_tick } if tick >= from_tick)
    }

    /// Group after forwarding `frames`.
    fn after_frames(self, player_id: u64, frames: &TickFrames) -> Group {
        let next = match self {
            Group::Game { .. } if frames.killed.contains(&player_id) => Group::Lobby,
            other => other,
        };
        match &frames.alive {
            Some(alive) => next.after_resync(player_id, frames.tick, alive),
            None => next,
        }
    }

    /// Group after the client was handed the full state of `tick`. A ship
    /// missing from it died in ticks the connection never saw.
    fn after_resync(self, player_id: u64, tick: u64, alive: &[u64]) -> Group {
        match self {
            Group::Game { from_tick } if tick >= from_tick => {
                if alive.contains(&player_id) {
                    Group::Game { from_tick: tick + 1 }
                } else {
                    Group::Lobby
                }
            }
            other => other,
        }
    }
}

struct ConnCtx {
    pub player_id: u64,
    pub group: Group,
    pub input_tx: mpsc::Sender<GameEvent>,
    pub frames_rx: broadcast::Receiver<Arc<TickFrames>>,
    pub latest_rx: watch::Receiver<Arc<LatestSnapshot>>,
    // Count lag recovery snapshots sent to this client.
    pub lag_recovery_count: u64,

    pub msgs_in: u64,
    pub msgs_out: u64,

    pub invalid_json: u32,

    pub last_input_full_log: Instant,
    pub last_frames_lag_log: Instant,
    pub last_invalid_input_log: Instant,

    pub close_frame: Option<CloseFrame>,
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;
const JOIN_REPLY_TIMEOUT: Duration = Duration::from_secs(5);

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    let mut fatal: Option<NetError> = None;

    loop {
        let outcome = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => handle_incoming_ws(socket, incoming, ctx).await,

            // Outgoing tick frames
            frames = ctx.frames_rx.recv() => match frames {
                Ok(frames) => forward_frames(socket, ctx, &frames).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    recover_from_lag(socket, ctx, n).await
                }
                Err(broadcast::error::RecvError::Closed) => Err(NetError::FramesClosed),
            },
        };

        let disconnect = match outcome {
            Ok(LoopControl::Continue) => false,
            Ok(LoopControl::Disconnect) => true,
            Err(e) => {
                fatal = Some(e);
                true
            }
        };

        if disconnect {
            if let Some(frame) = ctx.close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Err(e) = disconnect_cleanup(ctx).await {
        warn!(error = ?e, "error during disconnect cleanup");
        if fatal.is_none() {
            fatal = Some(e);
        }
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    ctx: &mut ConnCtx,
) -> Result<LoopControl, NetError> {
    let player_id = ctx.player_id;
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                ctx.msgs_in += 1;

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join(payload)) => {
                        handle_join(socket, ctx, &payload.display_name).await
                    }
                    Ok(ClientMessage::Input(input)) => {
                        Ok(process_input_message(ctx, input.into()))
                    }
                    Err(parse_err) => {
                        ctx.invalid_json += 1;
                        if should_log(&mut ctx.last_invalid_input_log) {
                            warn!(
                                player_id,
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if ctx.invalid_json > MAX_INVALID_JSON {
                            ctx.close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }
                        Ok(LoopControl::Continue)
                    }
                }
            }
            Message::Binary(_) => {
                ctx.close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(player_id, error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!(player_id, "websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn handle_join(
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
    display_name: &str,
) -> Result<LoopControl, NetError> {
    let player_id = ctx.player_id;
    if let Group::Game { .. } = ctx.group {
        // Repeated Join while playing keeps the current ship.
        if should_log(&mut ctx.last_invalid_input_log) {
            warn!(player_id, "duplicate join ignored");
        }
        return Ok(LoopControl::Continue);
    }

    let name = match DisplayName::parse(display_name) {
        Ok(name) => name,
        Err(e) => {
            debug!(player_id, reason = ?e, "join rejected");
            send_join_error(socket, ctx, &e).await?;
            return Ok(LoopControl::Continue);
        }
    };

    // The world task replies while draining the tick's inbound events.
    let (reply, reply_rx) = oneshot::channel();
    ctx.input_tx
        .send(GameEvent::Join {
            player_id,
            name,
            reply,
        })
        .await
        .map_err(|_| NetError::InputClosed)?;

    let result = match timeout(JOIN_REPLY_TIMEOUT, reply_rx).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => {
            // World task dropped the request while shutting down.
            let _ = send_join_error(socket, ctx, &JoinError::Unavailable).await;
            return Err(NetError::InputClosed);
        }
        Err(_) => return Err(NetError::JoinTimeout),
    };

    match result {
        Ok(welcome) => {
            let msg = ServerMessage::Welcome(WelcomeDto::from(&welcome));
            send_message(socket, &msg).await?;
            ctx.msgs_out += 1;
            ctx.group = Group::Game {
                from_tick: welcome.tick,
            };
            info!(player_id, name = %welcome.player.name, "joined game");
        }
        Err(e) => {
            debug!(player_id, reason = ?e, "join refused by world");
            send_join_error(socket, ctx, &e).await?;
        }
    }
    Ok(LoopControl::Continue)
}

async fn send_join_error(
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
    err: &JoinError,
) -> Result<(), NetError> {
    let msg = ServerMessage::Error {
        message: err.message().to_string(),
    };
    send_message(socket, &msg).await?;
    ctx.msgs_out += 1;
    Ok(())
}

fn process_input_message(ctx: &mut ConnCtx, input: ShipInput) -> LoopControl {
    let player_id = ctx.player_id;
    if !matches!(ctx.group, Group::Game { .. }) {
        // No live ship to steer.
        if should_log(&mut ctx.last_invalid_input_log) {
            debug!(player_id, "input ignored outside game");
        }
        return LoopControl::Continue;
    }

    match ctx.input_tx.try_send(GameEvent::Input { player_id, input }) {
        Ok(()) => LoopControl::Continue,
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(&mut ctx.last_input_full_log) {
                warn!(player_id, "input channel full; dropping input");
            }
            LoopControl::Continue
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => {
            warn!(player_id, "input channel closed; disconnecting");
            LoopControl::Disconnect
        }
    }
}

async fn forward_frames(
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
    frames: &TickFrames,
) -> Result<LoopControl, NetError> {
    if !ctx.group.receives(frames.tick) {
        return Ok(LoopControl::Continue);
    }

    for msg in &frames.messages {
        if let LoopControl::Disconnect = forward_bytes(socket, ctx, msg.clone()).await {
            return Ok(LoopControl::Disconnect);
        }
    }

    let next = ctx.group.after_frames(ctx.player_id, frames);
    if next == Group::Lobby {
        info!(player_id = ctx.player_id, "player killed; back in lobby");
    }
    ctx.group = next;
    Ok(LoopControl::Continue)
}

async fn recover_from_lag(
    socket: &mut WebSocket,
    ctx: &mut ConnCtx,
    missed: u64,
) -> Result<LoopControl, NetError> {
    let latest = ctx.latest_rx.borrow().clone();
    if !ctx.group.receives(latest.tick) {
        // Lobby, or nothing newer than what the client already holds.
        return Ok(LoopControl::Continue);
    }
    if should_log(&mut ctx.last_frames_lag_log) {
        warn!(missed, "tick frames lagged; sending resync");
    }

    // Frames still queued up to `latest.tick` are skipped after this.
    ctx.group = ctx.group.after_resync(ctx.player_id, latest.tick, &latest.players);
    if ctx.group == Group::Lobby {
        info!(player_id = ctx.player_id, "player died while lagging; back in lobby");
        return Ok(LoopControl::Continue);
    }

    ctx.lag_recovery_count += 1;
    debug!(
        bytes = latest.resync.len(),
        count = ctx.lag_recovery_count,
        "sent lag recovery resync"
    );
    Ok(forward_bytes(socket, ctx, latest.resync.clone()).await)
}

async fn forward_bytes(socket: &mut WebSocket, ctx: &mut ConnCtx, msg: Utf8Bytes) -> LoopControl {
    match socket.send(Message::Text(msg)).await.map_err(NetError::Ws) {
        Ok(()) => {
            ctx.msgs_out += 1;
            LoopControl::Continue
        }
        Err(err) => {
            // Disconnect follows immediately.
            warn!(error = ?err, "failed to send frame");
            LoopControl::Disconnect
        }
    }
}

async fn disconnect_cleanup(ctx: &ConnCtx) -> Result<(), NetError> {
    let player_id = ctx.player_id;
    // The world ignores Leave for players that are not in game.
    ctx.input_tx
        .send(GameEvent::Leave { player_id })
        .await
        .map_err(|_| NetError::InputClosed)?;

    debug!(
        player_id,
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        invalid_json = ctx.invalid_json,
        lag_recovery_count = ctx.lag_recovery_count,
        "connection stats"
    );
    info!(player_id, "client disconnected");
    Ok(())
}

// Use-case level inputs/outputs for the game loop.

use crate::domain::{
    IslandSnapshot, JoinError, PickupSnapshot, PlayerSnapshot, ProjectileSnapshot, ShipInput,
    Welcome, WorldEvent, ZoneSnapshot,
};
use axum::extract::ws::Utf8Bytes;
use tokio::sync::oneshot;

/// Requests from connection tasks, drained by the world task at the start of a tick.
#[derive(Debug)]
pub enum GameEvent {
    Join {
        player_id: u64,
        name: DisplayName,
        reply: oneshot::Sender<Result<Welcome, JoinError>>,
    },
    Leave {
        player_id: u64,
    },
    Input {
        player_id: u64,
        input: ShipInput,
    },
}

/// Display name that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub const MAX_CHARS: usize = 14;

    pub fn parse(value: &str) -> Result<Self, JoinError> {
        match value.chars().count() {
            0 => Err(JoinError::EmptyName),
            n if n > Self::MAX_CHARS => Err(JoinError::NameTooLong),
            _ => Ok(Self(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// World state after a tick. Pickups and islands only feed full resyncs.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub players: Vec<PlayerSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
    pub islands: Vec<IslandSnapshot>,
    pub zone: ZoneSnapshot,
}

/// Everything one tick produced: notifications in emission order, then the snapshot.
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub events: Vec<WorldEvent>,
    pub update: WorldUpdate,
}

/// One tick serialized once for every connection.
#[derive(Debug, Clone)]
pub struct TickFrames {
    pub tick: u64,
    pub messages: Vec<Utf8Bytes>,
    /// Players killed this tick; their connections drop back to the lobby group.
    pub killed: Vec<u64>,
    /// Set when ticks were lost before this one. The last message is then a
    /// full resync and these are the players alive in it.
    pub alive: Option<Vec<u64>>,
}

/// Latest full resync, kept for connections that fell behind.
#[derive(Debug, Clone)]
pub struct LatestSnapshot {
    pub tick: u64,
    pub resync: Utf8Bytes,
    /// Ids of the players alive in this snapshot.
    pub players: Vec<u64>,
}

impl LatestSnapshot {
    /// Placeholder published before the first tick is serialized.
    pub fn empty() -> Self {
        Self {
            tick: 0,
            resync: Utf8Bytes::from_static(""),
            players: Vec::new(),
        }
    }
}

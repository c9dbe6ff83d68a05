// Wire protocol DTOs and conversions for public arena messages.

use crate::domain::{
    IslandKind, IslandSnapshot, PickupSnapshot, PlayerSnapshot, ProjectileSnapshot, ShipInput,
    Welcome, WorldEvent, ZoneSnapshot,
};
use crate::use_cases::WorldUpdate;
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Assigned identity for the connection, sent on connect.
    Identity { player_id: String },
    // Directed reply to an accepted Join.
    Welcome(WelcomeDto),
    PlayerCreated(PlayerDto),
    // Player died; the connection is back in the lobby.
    PlayerRemoved(PlayerDto),
    PlayerLeft { player_id: String },
    ProjectileCreated(ProjectileDto),
    ProjectileRemoved(ProjectileDto),
    PickupCreated(PickupDto),
    PickupRemoved(PickupDto),
    IslandCreated(IslandDto),
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // Full state replacing whatever the client holds; sent after missed ticks.
    Resync(ResyncDto),
    // Rejected request, sent only to the requester.
    Error { message: String },
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Join(JoinPayload),
    // Latest intent flags; only honored while playing.
    Input(ShipInputDto),
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinPayload {
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShipInputDto {
    #[serde(default)]
    pub move_forward: bool,
    #[serde(default)]
    pub turn_left: bool,
    #[serde(default)]
    pub turn_right: bool,
    #[serde(default)]
    pub charge_left: bool,
    #[serde(default)]
    pub charge_right: bool,
}

impl From<ShipInputDto> for ShipInput {
    fn from(input: ShipInputDto) -> Self {
        Self {
            move_forward: input.move_forward,
            turn_left: input.turn_left,
            turn_right: input.turn_right,
            charge_left: input.charge_left,
            charge_right: input.charge_right,
        }
    }
}

impl From<WorldEvent> for ServerMessage {
    fn from(event: WorldEvent) -> Self {
        match event {
            WorldEvent::PlayerCreated(p) => ServerMessage::PlayerCreated(PlayerDto::from(&p)),
            WorldEvent::PlayerRemoved(p) => ServerMessage::PlayerRemoved(PlayerDto::from(&p)),
            WorldEvent::PlayerLeft { id } => ServerMessage::PlayerLeft {
                player_id: id.to_string(),
            },
            WorldEvent::ProjectileCreated(p) => {
                ServerMessage::ProjectileCreated(ProjectileDto::from(&p))
            }
            WorldEvent::ProjectileRemoved(p) => {
                ServerMessage::ProjectileRemoved(ProjectileDto::from(&p))
            }
            WorldEvent::PickupCreated(p) => ServerMessage::PickupCreated(PickupDto::from(&p)),
            WorldEvent::PickupRemoved(p) => ServerMessage::PickupRemoved(PickupDto::from(&p)),
            WorldEvent::IslandCreated(i) => ServerMessage::IslandCreated(IslandDto::from(&i)),
        }
    }
}

/// Everything a client needs to render the arena after joining.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeDto {
    pub player: PlayerDto,
    pub players: Vec<PlayerDto>,
    pub projectiles: Vec<ProjectileDto>,
    pub pickups: Vec<PickupDto>,
    pub islands: Vec<IslandDto>,
}

impl From<&Welcome> for WelcomeDto {
    fn from(welcome: &Welcome) -> Self {
        Self {
            player: PlayerDto::from(&welcome.player),
            players: welcome.players.iter().map(PlayerDto::from).collect(),
            projectiles: welcome.projectiles.iter().map(ProjectileDto::from).collect(),
            pickups: welcome.pickups.iter().map(PickupDto::from).collect(),
            islands: welcome.islands.iter().map(IslandDto::from).collect(),
        }
    }
}

/// Snapshot of the world sent to playing clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub players: Vec<PlayerDto>,
    pub projectiles: Vec<ProjectileDto>,
    pub zone: ZoneDto,
}

impl From<&WorldUpdate> for WorldUpdateDto {
    fn from(update: &WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            players: update.players.iter().map(PlayerDto::from).collect(),
            projectiles: update.projectiles.iter().map(ProjectileDto::from).collect(),
            zone: ZoneDto::from(&update.zone),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResyncDto {
    pub tick: u64,
    pub players: Vec<PlayerDto>,
    pub projectiles: Vec<ProjectileDto>,
    pub pickups: Vec<PickupDto>,
    pub islands: Vec<IslandDto>,
    pub zone: ZoneDto,
}

impl From<&WorldUpdate> for ResyncDto {
    fn from(update: &WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            players: update.players.iter().map(PlayerDto::from).collect(),
            projectiles: update.projectiles.iter().map(ProjectileDto::from).collect(),
            pickups: update.pickups.iter().map(PickupDto::from).collect(),
            islands: update.islands.iter().map(IslandDto::from).collect(),
            zone: ZoneDto::from(&update.zone),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub heading: f32,
    pub health: u32,
    pub ammo: u32,
}

impl From<&PlayerSnapshot> for PlayerDto {
    fn from(p: &PlayerSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            x: p.x,
            y: p.y,
            heading: p.heading,
            health: p.health,
            ammo: p.ammo,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileDto {
    pub id: String,
    pub creator_id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<&ProjectileSnapshot> for ProjectileDto {
    fn from(p: &ProjectileSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            creator_id: p.creator_id.to_string(),
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub ammo: u32,
}

impl From<&PickupSnapshot> for PickupDto {
    fn from(p: &PickupSnapshot) -> Self {
        Self {
            id: p.id.to_string(),
            x: p.x,
            y: p.y,
            ammo: p.ammo,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum IslandKindDto {
    Ammo,
    Health,
}

impl From<IslandKind> for IslandKindDto {
    fn from(kind: IslandKind) -> Self {
        match kind {
            IslandKind::Ammo => IslandKindDto::Ammo,
            IslandKind::Health => IslandKindDto::Health,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IslandDto {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub restore_radius: f32,
    pub kind: IslandKindDto,
}

impl From<&IslandSnapshot> for IslandDto {
    fn from(i: &IslandSnapshot) -> Self {
        Self {
            id: i.id.to_string(),
            x: i.x,
            y: i.y,
            radius: i.radius,
            restore_radius: i.restore_radius,
            kind: i.kind.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneDto {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl From<&ZoneSnapshot> for ZoneDto {
    fn from(z: &ZoneSnapshot) -> Self {
        Self {
            x: z.x,
            y: z.y,
            radius: z.radius,
        }
    }
}

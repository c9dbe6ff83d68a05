// Authoritative world aggregate. Owned by the world task; the only writer.

use super::errors::JoinError;
use super::events::WorldEvent;
use super::safe_zone::SafeZone;
use super::state::{
    Island, IslandSnapshot, Pickup, PickupSnapshot, Player, PlayerSnapshot, Projectile,
    ProjectileSnapshot, ShipInput,
};
use super::systems::{collision, combat, movement, projectiles, spawn};
use super::tuning::GameTuning;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// Everything a freshly joined client needs to render the arena.
#[derive(Debug, Clone)]
pub struct Welcome {
    /// First tick whose snapshot includes the new player.
    pub tick: u64,
    pub player: PlayerSnapshot,
    pub players: Vec<PlayerSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
    pub islands: Vec<IslandSnapshot>,
}

pub struct World {
    pub tuning: GameTuning,

    // Registries keyed by id; BTreeMap keeps iteration order deterministic.
    pub players: BTreeMap<u64, Player>,
    pub projectiles: BTreeMap<u64, Projectile>,
    pub pickups: BTreeMap<u64, Pickup>,
    pub islands: BTreeMap<u64, Island>,

    pub zone: SafeZone,

    /// Ticks simulated so far.
    pub delta: u64,
    /// Simulated milliseconds; charge timestamps use this clock.
    pub clock_ms: u64,

    pub rng: Pcg32,
    next_entity_id: u64,
    events: Vec<WorldEvent>,
}

impl World {
    /// Builds the world and fills the island and pickup pools.
    pub fn new(tuning: GameTuning, seed: u64) -> Self {
        let bounds = Vec2::new(tuning.arena.width, tuning.arena.height);
        let mut world = Self {
            tuning,
            players: BTreeMap::new(),
            projectiles: BTreeMap::new(),
            pickups: BTreeMap::new(),
            islands: BTreeMap::new(),
            zone: SafeZone::new(tuning.arena.zone, bounds),
            delta: 0,
            clock_ms: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_entity_id: 1,
            events: Vec::new(),
        };
        world.fill_islands();
        world.refill_pickups();
        world
    }

    pub fn alloc_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn emit(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Takes every event buffered since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// True on the ticks where periodic damage and regeneration apply.
    pub fn on_period_boundary(&self) -> bool {
        self.delta % self.tuning.arena.damage_period_ticks.max(1) == 0
    }

    /// Advances the simulation by one fixed step.
    pub fn tick(&mut self, dt: Duration) {
        self.delta += 1;
        self.clock_ms += dt.as_millis() as u64;
        self.zone.update(self.delta);

        let dt = dt.as_secs_f32();
        movement::tick_players(self, dt);
        combat::tick_players(self);
        projectiles::tick_projectiles(self, dt);
        collision::resolve(self);
    }

    pub fn spawn_player(&mut self, id: u64, name: String) -> Result<Welcome, JoinError> {
        if self.players.contains_key(&id) {
            debug!(player_id = id, "player already exists");
            return Err(JoinError::AlreadyPlaying);
        }

        let pos = spawn::find_player_spawn(self);
        let player = Player::new(id, name, pos, std::f32::consts::FRAC_PI_2, &self.tuning.player);
        let snapshot = PlayerSnapshot::from(&player);

        // Existing state is collected before the new ship is registered.
        let welcome = Welcome {
            tick: self.delta + 1,
            player: snapshot.clone(),
            players: self.player_snapshots(),
            projectiles: self.projectile_snapshots(),
            pickups: self.pickup_snapshots(),
            islands: self.island_snapshots(),
        };

        info!(player_id = id, name = %player.name, x = pos.x, y = pos.y, "player spawned");
        self.players.insert(id, player);
        self.emit(WorldEvent::PlayerCreated(snapshot));
        Ok(welcome)
    }

    /// Overwrites intent flags; unknown or dead players are ignored.
    pub fn set_input(&mut self, id: u64, input: ShipInput) {
        if let Some(player) = self.players.get_mut(&id).filter(|p| !p.dead) {
            player.input = input;
        }
    }

    /// Silent removal on disconnect.
    pub fn remove_player(&mut self, id: u64) {
        if self.players.remove(&id).is_some() {
            info!(player_id = id, "player left");
            self.emit(WorldEvent::PlayerLeft { id });
        }
    }

    /// Shared terminal action for every way of dying. Idempotent.
    pub fn player_killed(&mut self, id: u64) {
        if let Some(mut player) = self.players.remove(&id) {
            player.dead = true;
            info!(player_id = id, name = %player.name, "player killed");
            self.emit(WorldEvent::PlayerRemoved(PlayerSnapshot::from(&player)));
        }
    }

    pub fn remove_projectile(&mut self, id: u64) {
        if let Some(projectile) = self.projectiles.remove(&id) {
            self.emit(WorldEvent::ProjectileRemoved(ProjectileSnapshot::from(&projectile)));
        }
    }

    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.emit(WorldEvent::ProjectileCreated(ProjectileSnapshot::from(&projectile)));
        self.projectiles.insert(projectile.id, projectile);
    }

    /// Tops the pickup pool up to its configured size.
    pub fn refill_pickups(&mut self) {
        while self.pickups.len() < self.tuning.arena.max_pickups {
            let id = self.alloc_id();
            let pickup = spawn::place_pickup(self, id);
            self.emit(WorldEvent::PickupCreated(PickupSnapshot::from(&pickup)));
            self.pickups.insert(id, pickup);
        }
    }

    fn fill_islands(&mut self) {
        while self.islands.len() < self.tuning.arena.max_islands {
            let id = self.alloc_id();
            let island = spawn::place_island(self, id);
            self.emit(WorldEvent::IslandCreated(IslandSnapshot::from(&island)));
            self.islands.insert(id, island);
        }
    }

    pub fn player_snapshots(&self) -> Vec<PlayerSnapshot> {
        self.players.values().map(PlayerSnapshot::from).collect()
    }

    pub fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        self.projectiles.values().map(ProjectileSnapshot::from).collect()
    }

    pub fn pickup_snapshots(&self) -> Vec<PickupSnapshot> {
        self.pickups.values().map(PickupSnapshot::from).collect()
    }

    pub fn island_snapshots(&self) -> Vec<IslandSnapshot> {
        self.islands.values().map(IslandSnapshot::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::{empty_world, place_player};

    #[test]
    fn when_world_starts_then_pools_are_full_and_announced() {
        let mut world = World::new(GameTuning::default(), 7);
        assert_eq!(world.pickups.len(), 15);
        assert_eq!(world.islands.len(), 10);

        let events = world.drain_events();
        let islands = events
            .iter()
            .filter(|e| matches!(e, WorldEvent::IslandCreated(_)))
            .count();
        let pickups = events
            .iter()
            .filter(|e| matches!(e, WorldEvent::PickupCreated(_)))
            .count();
        assert_eq!((islands, pickups), (10, 15));
    }

    #[test]
    fn when_same_seed_then_worlds_match() {
        let a = World::new(GameTuning::default(), 99);
        let b = World::new(GameTuning::default(), 99);
        let pa: Vec<_> = a.pickups.values().map(|p| p.pos).collect();
        let pb: Vec<_> = b.pickups.values().map(|p| p.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn when_player_spawns_then_created_event_and_welcome_lists_others() {
        let mut world = World::new(GameTuning::default(), 3);
        world.drain_events();
        world.spawn_player(1, "first".into()).expect("first join");
        let welcome = world.spawn_player(2, "second".into()).expect("second join");

        assert_eq!(welcome.player.id, 2);
        assert_eq!(welcome.players.len(), 1);
        assert_eq!(welcome.pickups.len(), 15);
        assert_eq!(welcome.islands.len(), 10);

        let created = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, WorldEvent::PlayerCreated(_)))
            .count();
        assert_eq!(created, 2);
    }

    #[test]
    fn when_player_joins_twice_then_second_join_is_rejected() {
        let mut world = empty_world();
        world.spawn_player(1, "dup".into()).expect("first join");
        assert_eq!(
            world.spawn_player(1, "dup".into()).err(),
            Some(JoinError::AlreadyPlaying)
        );
    }

    #[test]
    fn when_player_killed_twice_then_one_removal_is_emitted() {
        let mut world = empty_world();
        place_player(&mut world, 1, Vec2::new(500.0, 500.0), 0.0);

        world.player_killed(1);
        world.player_killed(1);

        let removed = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, WorldEvent::PlayerRemoved(_)))
            .count();
        assert_eq!(removed, 1);
        assert!(world.players.is_empty());
    }

    #[test]
    fn when_player_disconnects_then_left_is_emitted_without_removal() {
        let mut world = empty_world();
        place_player(&mut world, 1, Vec2::new(500.0, 500.0), 0.0);

        world.remove_player(1);

        let events = world.drain_events();
        assert_eq!(events, vec![WorldEvent::PlayerLeft { id: 1 }]);
    }

    #[test]
    fn when_input_targets_unknown_player_then_it_is_ignored() {
        let mut world = empty_world();
        world.set_input(
            42,
            ShipInput {
                move_forward: true,
                ..ShipInput::default()
            },
        );
        assert!(world.players.is_empty());
    }
}

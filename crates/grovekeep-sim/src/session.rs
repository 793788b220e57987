//! Play-session driver. Owns the [`World`], installs the built-in systems in
//! pipeline order and exposes the per-frame tick.

use crate::components::{Enemy, Inventory};
use crate::config::{ConfigError, SimConfig};
use crate::entity::Entity;
use crate::factory::{EntityFactory, StandardFactory};
use crate::input::{GameState, Intents};
use crate::systems::{
    BlockStreamer, CameraSystem, ChaseSystem, CollisionSystem, CombatSystem, DeathSystem,
    EnemySpawnSystem, MovementSystem, PickupSystem, PlayerInputSystem, ResourceSpawnSystem,
};
use crate::world::World;
use grovekeep_core::math::tile_center;
use grovekeep_world::{RegionType, StreamingPolicy, WorldMap};
use glam::Vec2;

// Distinct streams for the two spawners.
const ENEMY_RNG_SALT: u64 = 0x9E37_79B9_7F4A_7C15;
const RESOURCE_RNG_SALT: u64 = 0xC2B2_AE3D_27D4_EB4F;

pub struct Session {
    world: World,
    config: SimConfig,
    seed: u64,
    initial_map: WorldMap,
    player: Option<Entity>,
}

impl Session {
    /// Start a session on `map`. Fails only if `config` does not validate.
    pub fn new(map: WorldMap, config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let initial_map = map.clone();
        let (world, player) = Self::build(map, &config, seed);
        log::info!(
            "Session started: {}x{} map, {} regions, seed {}",
            world.map().width(),
            world.map().height(),
            world.map().all_regions().len(),
            seed
        );
        Ok(Self {
            world,
            config,
            seed,
            initial_map,
            player,
        })
    }

    fn build(map: WorldMap, config: &SimConfig, seed: u64) -> (World, Option<Entity>) {
        let factory = StandardFactory::new(config);
        let mut world = World::new(map);
        world.resources.seed = seed;

        world.add_system(PlayerInputSystem);
        world.add_system(ChaseSystem);
        world.add_system(MovementSystem);
        world.add_system(CollisionSystem);
        world.add_system(CombatSystem);
        world.add_system(PickupSystem::new(factory.clone(), config.player.pickup_radius));
        world.add_system(DeathSystem::new(factory.clone()));
        world.add_system(CameraSystem);
        world.add_system(BlockStreamer::new(
            StreamingPolicy::new(config.streaming.buffer_chunks),
            factory.clone(),
        ));
        world.add_system(EnemySpawnSystem::new(
            config.enemy_spawn.clone(),
            config.difficulty.clone(),
            factory.clone(),
            seed ^ ENEMY_RNG_SALT,
        ));
        world.add_system(ResourceSpawnSystem::new(
            config.resource_spawn.clone(),
            factory.clone(),
            seed ^ RESOURCE_RNG_SALT,
        ));

        let spawn = Self::player_spawn_point(world.map());
        let player = factory.create_player(&mut world, spawn);
        let bounds = world.map().world_bounds();
        world.resources.camera.follow(spawn, bounds);

        let ts = world.map().tile_size();
        let placed = world.map().placed_items().to_vec();
        for item in placed {
            if !world.map().in_bounds(item.tile.x, item.tile.y) {
                log::warn!("Placed item '{}' lies outside the map; not spawned", item.id);
                continue;
            }
            factory.create_pickup(
                &mut world,
                tile_center(item.tile, ts),
                item.item,
                item.amount,
                Some(item.id),
            );
        }
        (world, Some(player))
    }

    /// Centre of the PlayerSpawn region, or of the map if there is none.
    pub fn player_spawn_point(map: &WorldMap) -> Vec2 {
        match map.regions().of_type(RegionType::PlayerSpawn).next() {
            Some(region) => region.area.to_world(map.tile_size()).center(),
            None => map.world_bounds().center(),
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, dt: f32) {
        let was_playing = self.world.resources.state == GameState::Playing;
        self.world.update(dt);
        if was_playing && self.world.resources.state == GameState::GameOver {
            log::info!("Game over at frame {}", self.world.frame());
        }
    }

    pub fn set_intents(&mut self, intents: Intents) {
        self.world.resources.intents = intents;
    }

    /// Polled once per frame by the owner.
    pub fn game_state(&self) -> GameState {
        self.world.resources.state
    }

    /// Restart on the map as it was when the session began.
    pub fn reset(&mut self) {
        let (world, player) = Self::build(self.initial_map.clone(), &self.config, self.seed);
        self.world = world;
        self.player = player;
        log::info!("Session reset");
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn map(&self) -> &WorldMap {
        self.world.map()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|&p| self.world.is_active(p))
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.world.get::<Inventory>(self.player()?)
    }

    pub fn enemy_count(&self) -> usize {
        self.world.count::<Enemy>()
    }

    pub fn streamed_count(&self) -> usize {
        self.world.resources.streamed.len()
    }
}

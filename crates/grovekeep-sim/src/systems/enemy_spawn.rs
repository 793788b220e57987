//! Region-governed enemy spawning.
//!
//! A spawn timer and the session clock advance every frame. When the timer
//! reaches the current interval and the live-enemy count is under the cap,
//! one EnemySpawn region is picked at random and up to `attempts` points in
//! it are sampled; the first point allowed by the biome lookup and outside
//! every exclusion zone gets an enemy. Exhausting the budget skips the tick.

use crate::components::{Enemy, Spawned};
use crate::config::{DifficultyConfig, EnemySpawnConfig};
use crate::difficulty;
use crate::factory::{EntityFactory, StandardFactory};
use crate::system::System;
use crate::world::World;
use crate::zones::{BiomeClassifier, ExclusionZoneProvider, RegionZones};
use grovekeep_core::rect::TileRect;
use grovekeep_world::RegionType;
use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::player_position;

// Keeps sampled points clear of tile edges so they map back to their tile.
const TILE_MARGIN: f32 = 0.05;

/// Running totals, mostly for tests and the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnStats {
    pub spawned: u32,
    /// Ticks where every sampled point was rejected.
    pub exhausted: u32,
    pub capped: u32,
}

pub struct EnemySpawnSystem<F: EntityFactory = StandardFactory> {
    config: EnemySpawnConfig,
    difficulty: DifficultyConfig,
    factory: F,
    rng: StdRng,
    spawn_timer: f32,
    elapsed: f32,
    extra_exclusions: Vec<Box<dyn ExclusionZoneProvider>>,
    stats: SpawnStats,
}

impl<F: EntityFactory> EnemySpawnSystem<F> {
    pub fn new(config: EnemySpawnConfig, difficulty: DifficultyConfig, factory: F, seed: u64) -> Self {
        Self {
            config,
            difficulty,
            factory,
            rng: StdRng::seed_from_u64(seed),
            spawn_timer: 0.0,
            elapsed: 0.0,
            extra_exclusions: Vec::new(),
            stats: SpawnStats::default(),
        }
    }

    /// Register exclusion rectangles in addition to the map's safe zones.
    pub fn add_exclusions(&mut self, provider: impl ExclusionZoneProvider + 'static) {
        self.extra_exclusions.push(Box::new(provider));
    }

    pub fn stats(&self) -> SpawnStats {
        self.stats
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    fn player_accelerated(&self, world: &World) -> bool {
        let Some((_, pos)) = player_position(world) else {
            return false;
        };
        let map = world.map();
        let tile = map.world_to_tile(pos.x, pos.y);
        map.regions().at(tile, RegionType::Biome).any(|r| {
            let biome = r.meta("biome").unwrap_or(r.id.as_str());
            self.config.accelerated_biomes.iter().any(|b| b == biome)
        })
    }

    /// Current interval in seconds.
    pub fn interval(&self, accelerated: bool) -> f32 {
        let mut interval = self.config.base_interval_secs
            * difficulty::interval_factor(&self.difficulty, self.elapsed);
        if accelerated {
            interval *= self.config.accelerated_interval_factor;
        }
        interval
    }

    /// Live-enemy cap: the largest `maxEnemies` among EnemySpawn regions.
    pub fn cap(&self, world: &World, accelerated: bool) -> u32 {
        let cap = world
            .map()
            .regions()
            .of_type(RegionType::EnemySpawn)
            .map(|r| r.meta_parse::<u32>("maxEnemies").unwrap_or(self.config.default_max_enemies))
            .max()
            .unwrap_or(0);
        if accelerated {
            cap + self.config.accelerated_cap_bonus
        } else {
            cap
        }
    }

    fn point_allowed(&self, world: &World, point: Vec2) -> bool {
        let zones = RegionZones::new(world.map());
        zones.allows_spawn_at(point)
            && !zones.is_excluded(point)
            && !self.extra_exclusions.iter().any(|z| z.is_excluded(point))
    }

    /// Sample a tile of the on-map part of `area`, then a point inside it.
    fn find_point(&mut self, world: &World, area: TileRect) -> Option<Vec2> {
        let map = world.map();
        let area = area.intersection(&map.bounds());
        if area.is_empty() {
            return None;
        }
        let ts = map.tile_size() as f32;
        for _ in 0..self.config.attempts {
            let tile = IVec2::new(
                self.rng.gen_range(area.x..area.x + area.width),
                self.rng.gen_range(area.y..area.y + area.height),
            );
            let offset = Vec2::new(
                self.rng.gen_range(TILE_MARGIN..1.0 - TILE_MARGIN),
                self.rng.gen_range(TILE_MARGIN..1.0 - TILE_MARGIN),
            );
            let point = map.tile_to_world(tile.x, tile.y) + offset * ts;
            if self.point_allowed(world, point) {
                return Some(point);
            }
        }
        None
    }

    fn try_spawn(&mut self, world: &mut World) {
        let regions: Vec<(String, TileRect)> = world
            .map()
            .regions()
            .of_type(RegionType::EnemySpawn)
            .map(|r| (r.id.clone(), r.area))
            .collect();
        if regions.is_empty() {
            return;
        }
        let (region_id, area) = &regions[self.rng.gen_range(0..regions.len())];

        let Some(point) = self.find_point(world, *area) else {
            self.stats.exhausted += 1;
            log::debug!("no valid spawn point in '{region_id}' after {} attempts", self.config.attempts);
            return;
        };

        let strength = difficulty::strength(&self.difficulty, self.elapsed);
        let e = self.factory.create_enemy(world, point, strength);
        world.insert(
            e,
            Spawned {
                region_id: region_id.clone(),
            },
        );
        self.stats.spawned += 1;
        log::debug!(
            "enemy spawned in '{region_id}' at ({:.0}, {:.0}), strength {strength:.2}",
            point.x,
            point.y
        );
    }
}

impl<F: EntityFactory> System for EnemySpawnSystem<F> {
    fn name(&self) -> &'static str {
        "enemy_spawn"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.spawn_timer += dt;
        self.elapsed += dt;

        let accelerated = self.player_accelerated(world);
        let interval = self.interval(accelerated);
        if self.spawn_timer < interval {
            return;
        }
        let live = world.count::<Enemy>() as u32;
        if live >= self.cap(world, accelerated) {
            self.stats.capped += 1;
            return;
        }
        self.spawn_timer = 0.0;
        self.try_spawn(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovekeep_world::{Region, WorldMap};

    fn system() -> EnemySpawnSystem {
        EnemySpawnSystem::new(
            EnemySpawnConfig::default(),
            DifficultyConfig::default(),
            StandardFactory::default(),
            7,
        )
    }

    fn world_with_spawn(max: Option<&str>) -> World {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        let mut region = Region::new("spawn_1", RegionType::EnemySpawn, TileRect::new(20, 20, 10, 10));
        if let Some(m) = max {
            region = region.with_meta("maxEnemies", m);
        }
        map.add_region(region).expect("region");
        World::new(map)
    }

    #[test]
    fn test_no_regions_no_spawns() {
        let mut world = World::new(WorldMap::with_default_layers(64, 64, 32, 32));
        let mut s = system();
        for _ in 0..100 {
            s.update(&mut world, 1.0);
        }
        assert_eq!(world.count::<Enemy>(), 0);
    }

    #[test]
    fn test_spawns_after_interval_inside_region() {
        let mut world = world_with_spawn(Some("3"));
        let mut s = system();
        s.update(&mut world, 3.0);
        assert_eq!(world.count::<Enemy>(), 0);
        s.update(&mut world, 1.0);
        let enemies = world.query::<Enemy>();
        assert_eq!(enemies.len(), 1);
        let pos = world.get::<crate::components::Position>(enemies[0]).expect("pos").0;
        assert!(TileRect::new(20, 20, 10, 10).to_world(32).contains(pos));
        assert_eq!(
            world.get::<Spawned>(enemies[0]).map(|s| s.region_id.as_str()),
            Some("spawn_1")
        );
    }

    #[test]
    fn test_cap_uses_largest_region_meta() {
        let mut world = world_with_spawn(Some("2"));
        world
            .map_mut()
            .add_region(
                Region::new("spawn_2", RegionType::EnemySpawn, TileRect::new(0, 0, 5, 5))
                    .with_meta("maxEnemies", "6"),
            )
            .expect("region");
        let s = system();
        assert_eq!(s.cap(&world, false), 6);
        assert_eq!(s.cap(&world, true), 9);
    }

    #[test]
    fn test_accelerated_biome_shortens_interval() {
        let s = system();
        assert_eq!(s.interval(true), s.interval(false) * 0.5);
    }

    #[test]
    fn test_off_map_region_skips_without_spawning() {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.add_region(Region::new(
            "far",
            RegionType::EnemySpawn,
            TileRect::new(1_000_000_000, 0, 1, 1),
        ))
        .expect("region");
        let mut world = World::new(map);
        let mut s = system();
        for _ in 0..600 {
            s.update(&mut world, 0.5);
        }
        assert_eq!(world.count::<Enemy>(), 0);
        assert!(s.stats().exhausted > 0);
    }

    #[test]
    fn test_partly_off_map_region_spawns_on_map() {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.add_region(Region::new(
            "edge",
            RegionType::EnemySpawn,
            TileRect::new(60, 60, 100, 100),
        ))
        .expect("region");
        let mut world = World::new(map);
        let mut s = system();
        for _ in 0..40 {
            s.update(&mut world, 1.0);
        }
        let enemies = world.query::<Enemy>();
        assert!(!enemies.is_empty());
        for e in enemies {
            let pos = world.get::<crate::components::Position>(e).expect("pos").0;
            assert!(TileRect::new(60, 60, 4, 4).to_world(32).contains(pos), "{pos:?}");
        }
    }

    #[test]
    fn test_overlapping_cave_biome_accelerates() {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.add_region(
            Region::new("forest", RegionType::Biome, TileRect::new(0, 0, 64, 64))
                .with_meta("biome", "forest"),
        )
        .expect("forest");
        map.add_region(
            Region::new("cave_1", RegionType::Biome, TileRect::new(10, 10, 5, 5))
                .with_meta("biome", "cave"),
        )
        .expect("cave");
        let mut world = World::new(map);
        let factory = StandardFactory::default();
        let player = factory.create_player(&mut world, Vec2::new(12.5 * 32.0, 12.5 * 32.0));
        let s = system();
        assert!(s.player_accelerated(&world));

        world.insert(player, crate::components::Position(Vec2::new(40.0 * 32.0, 40.0 * 32.0)));
        assert!(!s.player_accelerated(&world));
    }

    #[test]
    fn test_blocked_region_exhausts_silently() {
        let mut world = world_with_spawn(None);
        world
            .map_mut()
            .fill_blocks(TileRect::new(20, 20, 10, 10), grovekeep_core::types::BlockType::Wall, 0);
        let mut s = system();
        for _ in 0..10 {
            s.update(&mut world, 5.0);
        }
        assert_eq!(world.count::<Enemy>(), 0);
        assert!(s.stats().exhausted > 0);
    }
}

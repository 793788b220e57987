use crate::components::{Pickup, Spawned};
use crate::config::ResourceSpawnConfig;
use crate::factory::{EntityFactory, StandardFactory};
use crate::system::System;
use crate::world::World;
use crate::zones::{BiomeClassifier, ExclusionZoneProvider, RegionZones};
use grovekeep_core::math::tile_center;
use grovekeep_core::rect::TileRect;
use grovekeep_core::types::{BlockType, ItemType, TileCoord};
use grovekeep_world::{Region, RegionType};
use glam::{IVec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

/// What a resource region produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Yield {
    Item(ItemType),
    Trees,
}

fn region_yield(region: &Region) -> Option<Yield> {
    match region.kind {
        RegionType::WoodSpawn => Some(Yield::Item(ItemType::Wood)),
        RegionType::GoldSpawn => Some(Yield::Item(ItemType::Gold)),
        RegionType::AppleSpawn => Some(Yield::Item(ItemType::Apple)),
        RegionType::ItemSpawn => region
            .meta("item")
            .and_then(ItemType::from_name)
            .filter(|i| !i.is_empty())
            .map(Yield::Item),
        RegionType::TreeSpawn => Some(Yield::Trees),
        _ => None,
    }
}

/// Periodically fills resource regions with pickups, and TreeSpawn regions
/// with Tree blocks.
///
/// Region meta: `intervalSeconds`, `maxCount` (`maxTrees` for TreeSpawn),
/// `respawn=false` to stop once the region has produced `maxCount` in
/// total, and `item` naming the item of an ItemSpawn region.
pub struct ResourceSpawnSystem<F: EntityFactory = StandardFactory> {
    config: ResourceSpawnConfig,
    factory: F,
    rng: StdRng,
    timers: HashMap<String, f32>,
    produced: HashMap<String, u32>,
    warned: HashSet<String>,
}

impl<F: EntityFactory> ResourceSpawnSystem<F> {
    pub fn new(config: ResourceSpawnConfig, factory: F, seed: u64) -> Self {
        Self {
            config,
            factory,
            rng: StdRng::seed_from_u64(seed),
            timers: HashMap::new(),
            produced: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    /// Total produced by a region so far.
    pub fn produced(&self, region_id: &str) -> u32 {
        self.produced.get(region_id).copied().unwrap_or(0)
    }

    fn sample_tile(&mut self, world: &World, area: TileRect) -> Option<TileCoord> {
        let area = area.intersection(&world.map().bounds());
        if area.is_empty() {
            return None;
        }
        let zones = RegionZones::new(world.map());
        let ts = world.map().tile_size();
        for _ in 0..self.config.attempts {
            let tile = IVec2::new(
                self.rng.gen_range(area.x..area.x + area.width),
                self.rng.gen_range(area.y..area.y + area.height),
            );
            let center = tile_center(tile, ts);
            if zones.allows_spawn_at(center) && !zones.is_excluded(center) {
                return Some(tile);
            }
        }
        None
    }

    fn live_pickups(world: &World, region_id: &str) -> u32 {
        world
            .query::<Pickup>()
            .into_iter()
            .filter(|&e| world.get::<Spawned>(e).is_some_and(|s| s.region_id == region_id))
            .count() as u32
    }

    fn live_trees(world: &World, area: TileRect) -> u32 {
        let map = world.map();
        map.collision_layers()
            .first()
            .map_or(0, |&layer| {
                map.blocks_in_tile_rect(area, layer)
                    .iter()
                    .filter(|(_, b)| *b == BlockType::Tree)
                    .count() as u32
            })
    }

    fn produce(&mut self, world: &mut World, region: &Region, what: Yield) {
        let max_key = match what {
            Yield::Trees => "maxTrees",
            Yield::Item(_) => "maxCount",
        };
        let max = region.meta_parse::<u32>(max_key).unwrap_or(self.config.default_max);
        let respawn = region.meta_flag("respawn").unwrap_or(true);
        if !respawn && self.produced(&region.id) >= max {
            return;
        }
        let live = match what {
            Yield::Trees => Self::live_trees(world, region.area),
            Yield::Item(_) => Self::live_pickups(world, &region.id),
        };
        if live >= max {
            return;
        }

        let Some(tile) = self.sample_tile(world, region.area) else {
            log::debug!("no free tile in resource region '{}'", region.id);
            return;
        };
        match what {
            Yield::Trees => {
                let Some(&layer) = world.map().collision_layers().first() else {
                    return;
                };
                world.map_mut().set_block(tile.x, tile.y, BlockType::Tree, layer);
            }
            Yield::Item(item) => {
                let pos: Vec2 = tile_center(tile, world.map().tile_size());
                let e = self.factory.create_pickup(world, pos, item, 1, None);
                world.insert(
                    e,
                    Spawned {
                        region_id: region.id.clone(),
                    },
                );
            }
        }
        *self.produced.entry(region.id.clone()).or_insert(0) += 1;
        log::debug!("resource region '{}' produced {:?} at {}", region.id, what, tile);
    }
}

impl<F: EntityFactory> System for ResourceSpawnSystem<F> {
    fn name(&self) -> &'static str {
        "resource_spawn"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        let mut regions: Vec<(Region, Yield)> = Vec::new();
        for r in world.map().all_regions() {
            match region_yield(r) {
                Some(y) => regions.push((r.clone(), y)),
                None if r.kind == RegionType::ItemSpawn => {
                    if self.warned.insert(r.id.clone()) {
                        log::warn!(
                            "ItemSpawn region '{}' has no valid 'item' meta ({:?})",
                            r.id,
                            r.meta("item")
                        );
                    }
                }
                None => {}
            }
        }

        for (region, what) in regions {
            let interval = region
                .meta_parse::<f32>("intervalSeconds")
                .filter(|s| *s > 0.0)
                .unwrap_or(self.config.default_interval_secs);
            let timer = self.timers.entry(region.id.clone()).or_insert(0.0);
            *timer += dt;
            if *timer < interval {
                continue;
            }
            *timer = 0.0;
            self.produce(world, &region, what);
        }
    }
}

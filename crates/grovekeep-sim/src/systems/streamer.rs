//! Block entity streamer: keeps one live entity per non-empty collision
//! block inside the streaming window, and none outside it.
//!
//! Every frame is a full reconciliation. The desired set is recomputed from
//! the map, diffed against the index, and the difference applied, so map
//! edits made by anyone are picked up without invalidation hooks.

use crate::components::BlockRef;
use crate::entity::Entity;
use crate::factory::{EntityFactory, StandardFactory};
use crate::system::System;
use crate::world::World;
use grovekeep_core::rect::TileRect;
use grovekeep_core::types::{BlockType, TileCoord};
use grovekeep_world::StreamingPolicy;
use glam::IVec2;
use std::collections::{BTreeMap, HashMap};

/// Identity of a streamed block: collision layer index plus tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockKey {
    pub layer: usize,
    pub tile: TileCoord,
}

impl BlockKey {
    pub fn new(layer: usize, x: i32, y: i32) -> Self {
        Self {
            layer,
            tile: IVec2::new(x, y),
        }
    }

    fn sort_key(&self) -> (usize, i32, i32) {
        (self.layer, self.tile.y, self.tile.x)
    }
}

/// Runtime index from block key to its live entity. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct StreamedBlocks {
    entries: HashMap<BlockKey, Entity>,
}

impl StreamedBlocks {
    pub fn get(&self, key: &BlockKey) -> Option<Entity> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &BlockKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tracked keys sorted by (layer, y, x).
    pub fn keys(&self) -> Vec<BlockKey> {
        let mut keys: Vec<BlockKey> = self.entries.keys().copied().collect();
        keys.sort_unstable_by_key(BlockKey::sort_key);
        keys
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, key: BlockKey, e: Entity) {
        self.entries.insert(key, e);
    }

    fn remove(&mut self, key: &BlockKey) -> Option<Entity> {
        self.entries.remove(key)
    }
}

/// Churn produced by one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamStats {
    pub created: usize,
    pub destroyed: usize,
    pub tracked: usize,
}

pub struct BlockStreamer<F: EntityFactory = StandardFactory> {
    policy: StreamingPolicy,
    factory: F,
    last: StreamStats,
}

impl<F: EntityFactory> BlockStreamer<F> {
    pub fn new(policy: StreamingPolicy, factory: F) -> Self {
        Self {
            policy,
            factory,
            last: StreamStats::default(),
        }
    }

    pub fn policy(&self) -> StreamingPolicy {
        self.policy
    }

    /// Stats of the most recent reconciliation.
    pub fn last_stats(&self) -> StreamStats {
        self.last
    }

    /// Reconcile against the camera's visible area plus the buffer.
    pub fn reconcile(&mut self, world: &mut World) -> StreamStats {
        let visible = world.resources.camera.visible_rect();
        let window = self.policy.window(world.map(), visible);
        self.reconcile_window(world, window)
    }

    /// Reconcile against an explicit tile window (clamped to the map).
    pub fn reconcile_window(&mut self, world: &mut World, window: TileRect) -> StreamStats {
        let map = world.map();
        let window = window.intersection(&map.bounds());
        let mut wanted: BTreeMap<(usize, i32, i32), (BlockKey, BlockType)> = BTreeMap::new();
        for layer in map.collision_layers() {
            for (tile, block) in map.blocks_in_tile_rect(window, layer) {
                let key = BlockKey { layer, tile };
                wanted.insert(key.sort_key(), (key, block));
            }
        }

        let mut index = std::mem::take(&mut world.resources.streamed);
        let mut stats = StreamStats::default();

        for key in index.keys() {
            let Some(e) = index.get(&key) else { continue };
            let keep = wanted.get(&key.sort_key()).is_some_and(|(_, block)| {
                world.is_active(e) && world.get::<BlockRef>(e).is_some_and(|r| r.block == *block)
            });
            if !keep {
                index.remove(&key);
                world.remove_entity(e);
                stats.destroyed += 1;
            }
        }

        for (key, block) in wanted.into_values() {
            if index.contains(&key) {
                continue;
            }
            let e = self.factory.create_block(world, key.layer, key.tile, block);
            index.insert(key, e);
            stats.created += 1;
        }

        stats.tracked = index.len();
        world.resources.streamed = index;

        log::trace!(
            "streamer: +{} -{} ({} tracked)",
            stats.created,
            stats.destroyed,
            stats.tracked
        );
        if stats.created + stats.destroyed > 0 {
            log::debug!(
                "streamed blocks changed: {} created, {} destroyed, {} tracked",
                stats.created,
                stats.destroyed,
                stats.tracked
            );
        }
        self.last = stats;
        stats
    }
}

impl<F: EntityFactory> System for BlockStreamer<F> {
    fn name(&self) -> &'static str {
        "block_streamer"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        self.reconcile(world);
    }
}

/// Clear a map block and destroy its tracked entity in one step.
/// Returns true if either the map cell or the index changed.
pub fn remove_block(world: &mut World, layer: usize, tile: TileCoord) -> bool {
    let had_block = !world.map().get_block(tile.x, tile.y, layer).is_empty();
    if had_block {
        world.map_mut().set_block(tile.x, tile.y, BlockType::Empty, layer);
    }
    let tracked = world.resources.streamed.remove(&BlockKey { layer, tile });
    if let Some(e) = tracked {
        world.remove_entity(e);
    }
    had_block || tracked.is_some()
}

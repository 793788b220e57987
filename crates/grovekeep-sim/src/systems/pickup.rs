use crate::components::{Inventory, Pickup, Position};
use crate::factory::{EntityFactory, StandardFactory};
use crate::system::System;
use crate::world::World;
use grovekeep_core::math::tile_center;
use grovekeep_core::types::ItemType;
use grovekeep_world::ItemLayerKind;

use super::player_position;

#[derive(Debug, Clone, PartialEq)]
struct PendingRespawn {
    placed_id: String,
    remaining: f32,
}

/// Collects pickups and ground items under the player, and brings back
/// respawning placed items after their interval.
pub struct PickupSystem<F: EntityFactory = StandardFactory> {
    factory: F,
    radius: f32,
    pending: Vec<PendingRespawn>,
}

impl<F: EntityFactory> PickupSystem<F> {
    pub fn new(factory: F, radius: f32) -> Self {
        Self {
            factory,
            radius,
            pending: Vec::new(),
        }
    }

    /// Placed items waiting to reappear.
    pub fn pending_respawns(&self) -> usize {
        self.pending.len()
    }

    fn tick_respawns(&mut self, world: &mut World, dt: f32) {
        for p in &mut self.pending {
            p.remaining -= dt;
        }
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.remaining <= 0.0);
        self.pending = waiting;

        for p in due {
            let Some(placed) = world
                .map()
                .placed_items()
                .iter()
                .find(|item| item.id == p.placed_id)
                .cloned()
            else {
                continue;
            };
            let pos = tile_center(placed.tile, world.map().tile_size());
            self.factory
                .create_pickup(world, pos, placed.item, placed.amount, Some(placed.id.clone()));
            log::debug!("placed item '{}' respawned", placed.id);
        }
    }

    fn collect(&mut self, world: &mut World) {
        let Some((player, at)) = player_position(world) else {
            return;
        };
        let mut gained: Vec<(ItemType, u32)> = Vec::new();

        for e in world.query::<Pickup>() {
            let in_reach = world
                .get::<Position>(e)
                .is_some_and(|p| p.0.distance(at) <= self.radius);
            if !in_reach {
                continue;
            }
            let Some(pickup) = world.remove::<Pickup>(e) else {
                continue;
            };
            world.remove_entity(e);
            gained.push((pickup.item, pickup.amount));

            if let Some(id) = pickup.placed_id {
                let respawn = world
                    .map()
                    .placed_items()
                    .iter()
                    .find(|p| p.id == id && p.respawns)
                    .map(|p| p.respawn_interval_secs);
                if let Some(secs) = respawn {
                    self.pending.push(PendingRespawn {
                        placed_id: id,
                        remaining: secs,
                    });
                }
            }
        }

        let tile = world.map().world_to_tile(at.x, at.y);
        let ground = world.map().get_item(tile.x, tile.y, ItemLayerKind::Low);
        if !ground.is_empty() {
            world
                .map_mut()
                .set_item(tile.x, tile.y, ItemType::Empty, ItemLayerKind::Low);
            gained.push((ground, 1));
        }

        if gained.is_empty() {
            return;
        }
        if let Some(inv) = world.get_mut::<Inventory>(player) {
            for (item, amount) in gained {
                inv.add(item, amount);
                log::trace!("picked up {} x{}", item.name(), amount);
            }
        }
    }
}

impl<F: EntityFactory> System for PickupSystem<F> {
    fn name(&self) -> &'static str {
        "pickup"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.tick_respawns(world, dt);
        self.collect(world);
    }
}

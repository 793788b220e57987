use crate::components::{BlockRef, Harvestable, Health, Player, Position};
use crate::factory::{EntityFactory, StandardFactory};
use crate::input::GameState;
use crate::system::System;
use crate::world::World;

use super::streamer::remove_block;

/// Handles entities at zero health. A dead player ends the game, a dead
/// block is cleared from the map and drops its harvest, anything else is
/// removed.
pub struct DeathSystem<F: EntityFactory = StandardFactory> {
    factory: F,
}

impl<F: EntityFactory> DeathSystem<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F: EntityFactory> System for DeathSystem<F> {
    fn name(&self) -> &'static str {
        "death"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let dead: Vec<_> = world
            .query::<Health>()
            .into_iter()
            .filter(|&e| world.get::<Health>(e).is_some_and(Health::is_dead))
            .collect();

        for e in dead {
            if world.has::<Player>(e) {
                if world.resources.state != GameState::GameOver {
                    world.resources.state = GameState::GameOver;
                    log::info!("Player died after {:.1}s, game over", world.resources.elapsed);
                }
                continue;
            }

            let block = world.get::<BlockRef>(e).copied();
            let harvest = world.get::<Harvestable>(e).copied();
            let pos = world.get::<Position>(e).map(|p| p.0);

            match block {
                Some(b) => {
                    remove_block(world, b.layer, b.tile);
                    // The index may not have been tracking this entity.
                    world.remove_entity(e);
                }
                None => {
                    world.remove_entity(e);
                }
            }

            if let (Some(h), Some(pos)) = (harvest, pos) {
                self.factory.create_pickup(world, pos, h.drop, h.amount, None);
            }
        }
    }
}

//! Built-in systems, listed in their canonical pipeline order.

pub mod input;
pub mod ai;
pub mod movement;
pub mod collision;
pub mod combat;
pub mod pickup;
pub mod death;
pub mod camera;
pub mod streamer;
pub mod enemy_spawn;
pub mod resource_spawn;

pub use ai::ChaseSystem;
pub use camera::CameraSystem;
pub use collision::CollisionSystem;
pub use combat::CombatSystem;
pub use death::DeathSystem;
pub use enemy_spawn::EnemySpawnSystem;
pub use input::PlayerInputSystem;
pub use movement::MovementSystem;
pub use pickup::PickupSystem;
pub use resource_spawn::ResourceSpawnSystem;
pub use streamer::{remove_block, BlockKey, BlockStreamer, StreamStats, StreamedBlocks};

use crate::components::{Player, Position};
use crate::entity::Entity;
use crate::world::World;
use glam::Vec2;

/// The player entity, if one is alive.
pub(crate) fn find_player(world: &World) -> Option<Entity> {
    world.query::<Player>().into_iter().next()
}

pub(crate) fn player_position(world: &World) -> Option<(Entity, Vec2)> {
    let player = find_player(world)?;
    let pos = world.get::<Position>(player)?;
    Some((player, pos.0))
}

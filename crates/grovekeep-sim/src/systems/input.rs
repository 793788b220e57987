use crate::components::{Player, Velocity};
use crate::input::GameState;
use crate::system::System;
use crate::world::World;
use glam::Vec2;

use super::find_player;

/// Turns the frame's movement intent into player velocity.
#[derive(Debug, Default)]
pub struct PlayerInputSystem;

impl System for PlayerInputSystem {
    fn name(&self) -> &'static str {
        "player_input"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let Some(player) = find_player(world) else {
            return;
        };
        let Some(speed) = world.get::<Player>(player).map(|p| p.speed) else {
            return;
        };
        let velocity = match world.resources.state {
            GameState::Playing => world.resources.intents.move_dir.normalize_or_zero() * speed,
            GameState::GameOver => Vec2::ZERO,
        };
        if let Some(v) = world.get_mut::<Velocity>(player) {
            v.0 = velocity;
        }
    }
}

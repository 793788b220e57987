use crate::system::System;
use crate::world::World;

use super::player_position;

/// Keeps the camera on the player.
#[derive(Debug, Default)]
pub struct CameraSystem;

impl System for CameraSystem {
    fn name(&self) -> &'static str {
        "camera_follow"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let Some((_, pos)) = player_position(world) else {
            return;
        };
        let bounds = world.map().world_bounds();
        world.resources.camera.follow(pos, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::components::Position;
    use crate::components::Player;
    use glam::Vec2;
    use grovekeep_world::WorldMap;

    #[test]
    fn test_follows_player() {
        let mut world = World::new(WorldMap::with_default_layers(100, 100, 32, 32));
        world.resources.camera = Camera::new(Vec2::ZERO, Vec2::new(320.0, 320.0));
        let p = world.create_entity("player");
        world.insert(p, Position(Vec2::new(1000.0, 1200.0)));
        world.insert(
            p,
            Player {
                speed: 1.0,
                attack_damage: 1.0,
                attack_range: 1.0,
                attack_cooldown_secs: 1.0,
            },
        );
        CameraSystem.update(&mut world, 0.016);
        assert_eq!(world.resources.camera.center, Vec2::new(1000.0, 1200.0));
    }
}

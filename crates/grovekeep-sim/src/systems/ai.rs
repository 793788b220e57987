use crate::components::{Enemy, Position, Velocity};
use crate::system::System;
use crate::world::World;
use glam::Vec2;

use super::player_position;

/// Enemies walk straight at the player while inside their aggro radius.
#[derive(Debug, Default)]
pub struct ChaseSystem;

impl System for ChaseSystem {
    fn name(&self) -> &'static str {
        "chase_ai"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let target = player_position(world).map(|(_, pos)| pos);
        for e in world.query::<Enemy>() {
            let (Some(enemy), Some(pos)) = (world.get::<Enemy>(e), world.get::<Position>(e)) else {
                continue;
            };
            let velocity = match target {
                Some(t) if t.distance(pos.0) <= enemy.aggro_radius => {
                    (t - pos.0).normalize_or_zero() * enemy.speed
                }
                _ => Vec2::ZERO,
            };
            if let Some(v) = world.get_mut::<Velocity>(e) {
                v.0 = velocity;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::factory::{EntityFactory, StandardFactory};

    #[test]
    fn test_chases_only_within_aggro_radius() {
        let mut world = World::default();
        let factory = StandardFactory::new(&SimConfig::default());
        factory.create_player(&mut world, Vec2::ZERO);
        let near = factory.create_enemy(&mut world, Vec2::new(100.0, 0.0), 1.0);
        let far = factory.create_enemy(&mut world, Vec2::new(1000.0, 0.0), 1.0);
        ChaseSystem.update(&mut world, 0.016);
        assert_eq!(world.get::<Velocity>(near).map(|v| v.0), Some(Vec2::new(-90.0, 0.0)));
        assert_eq!(world.get::<Velocity>(far).map(|v| v.0), Some(Vec2::ZERO));
    }
}

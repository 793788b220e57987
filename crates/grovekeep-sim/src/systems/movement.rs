use crate::components::{Position, Velocity};
use crate::system::System;
use crate::world::World;

/// Integrates velocity into position.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        for e in world.query::<Velocity>() {
            let Some(v) = world.get::<Velocity>(e).map(|v| v.0) else {
                continue;
            };
            if let Some(p) = world.get_mut::<Position>(e) {
                p.0 += v * dt;
            }
        }
    }
}

use crate::components::{Collider, Position, Velocity};
use crate::entity::Entity;
use crate::system::System;
use crate::world::World;
use grovekeep_core::rect::WorldRect;
use glam::Vec2;

/// Pushes moving bodies out of solid map tiles and static solid colliders,
/// then clamps them to the map.
#[derive(Debug, Default)]
pub struct CollisionSystem;

/// Smallest translation that moves `a` out of `b`, or None if they don't overlap.
pub fn separation(a: &WorldRect, b: &WorldRect) -> Option<Vec2> {
    if !a.overlaps(b) {
        return None;
    }
    let left = a.max().x - b.min.x;
    let right = b.max().x - a.min.x;
    let up = a.max().y - b.min.y;
    let down = b.max().y - a.min.y;
    let dx = if left < right { -left } else { right };
    let dy = if up < down { -up } else { down };
    if dx.abs() < dy.abs() {
        Some(Vec2::new(dx, 0.0))
    } else {
        Some(Vec2::new(0.0, dy))
    }
}

impl CollisionSystem {
    fn static_obstacles(world: &World) -> Vec<WorldRect> {
        world
            .query::<Collider>()
            .into_iter()
            .filter(|&e| !world.has::<Velocity>(e))
            .filter_map(|e| {
                let c = world.get::<Collider>(e)?;
                let p = world.get::<Position>(e)?;
                c.solid.then(|| c.aabb(p.0))
            })
            .collect()
    }

    fn resolve(world: &World, e: Entity, obstacles: &[WorldRect]) -> Option<Vec2> {
        let collider = world.get::<Collider>(e)?;
        if !collider.solid {
            return None;
        }
        let mut pos = world.get::<Position>(e)?.0;
        let map = world.map();
        let ts = map.tile_size();

        let tile_area = collider.aabb(pos).to_tile_rect(ts);
        for tile in tile_area.tiles() {
            if !map.is_solid(tile.x, tile.y) {
                continue;
            }
            let cell = WorldRect::new(map.tile_to_world(tile.x, tile.y), Vec2::splat(ts as f32));
            if let Some(push) = separation(&collider.aabb(pos), &cell) {
                pos += push;
            }
        }
        for ob in obstacles {
            if let Some(push) = separation(&collider.aabb(pos), ob) {
                pos += push;
            }
        }

        let bounds = map.world_bounds();
        let lo = bounds.min + collider.half_extents;
        let hi = bounds.max() - collider.half_extents;
        if lo.x <= hi.x && lo.y <= hi.y {
            pos = pos.clamp(lo, hi);
        }
        Some(pos)
    }
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let obstacles = Self::static_obstacles(world);
        let resolved: Vec<(Entity, Vec2)> = world
            .query::<Velocity>()
            .into_iter()
            .filter_map(|e| Self::resolve(world, e, &obstacles).map(|p| (e, p)))
            .collect();
        for (e, p) in resolved {
            if let Some(pos) = world.get_mut::<Position>(e) {
                pos.0 = p;
            }
        }
    }
}

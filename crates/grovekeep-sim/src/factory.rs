//! Entity factories. Systems only see the [`EntityFactory`] signature, so an
//! embedding application can swap in its own shapes.

use crate::components::{
    AttackCooldown, BlockRef, Collider, Enemy, Harvestable, Health, Inventory, Pickup, Player,
    Position, Sprite, Velocity,
};
use crate::config::{BlockConfig, EnemyConfig, PlayerConfig, SimConfig, VariantsConfig};
use crate::entity::Entity;
use crate::world::World;
use grovekeep_core::math::tile_center;
use grovekeep_core::types::{BlockType, ItemType, TileCoord};
use glam::Vec2;

const PICKUP_HALF_EXTENT: f32 = 8.0;

const PLAYER_COLOR: [f32; 4] = [0.25, 0.55, 0.95, 1.0];
const ENEMY_COLOR: [f32; 4] = [0.85, 0.2, 0.2, 1.0];

/// Flat fallback colour when no sprite variant is registered.
pub fn block_color(block: BlockType) -> [f32; 4] {
    match block {
        BlockType::Empty => [0.0, 0.0, 0.0, 0.0],
        BlockType::Wall => [0.45, 0.45, 0.5, 1.0],
        BlockType::Crate => [0.6, 0.42, 0.22, 1.0],
        BlockType::Tree => [0.18, 0.5, 0.2, 1.0],
        BlockType::Rock => [0.55, 0.55, 0.55, 1.0],
        BlockType::GoldOre => [0.9, 0.75, 0.2, 1.0],
    }
}

pub fn item_color(item: ItemType) -> [f32; 4] {
    match item {
        ItemType::Empty => [0.0, 0.0, 0.0, 0.0],
        ItemType::Wood => [0.55, 0.35, 0.15, 1.0],
        ItemType::Stone => [0.6, 0.6, 0.6, 1.0],
        ItemType::Gold => [1.0, 0.85, 0.1, 1.0],
        ItemType::Apple => [0.9, 0.1, 0.1, 1.0],
        ItemType::Mushroom => [0.8, 0.7, 0.6, 1.0],
        ItemType::Torch => [1.0, 0.6, 0.1, 1.0],
    }
}

/// Materialises simulation entities.
pub trait EntityFactory {
    /// Entity mirroring a map block at `tile` of block layer `layer`.
    fn create_block(&self, world: &mut World, layer: usize, tile: TileCoord, block: BlockType) -> Entity;

    /// Enemy whose health and damage are scaled by `strength`.
    fn create_enemy(&self, world: &mut World, position: Vec2, strength: f32) -> Entity;

    fn create_pickup(
        &self,
        world: &mut World,
        position: Vec2,
        item: ItemType,
        amount: u32,
        placed_id: Option<String>,
    ) -> Entity;

    fn create_player(&self, world: &mut World, position: Vec2) -> Entity;
}

/// Factory driven by [`SimConfig`] stat blocks.
#[derive(Debug, Clone, Default)]
pub struct StandardFactory {
    player: PlayerConfig,
    enemy: EnemyConfig,
    blocks: BlockConfig,
    variants: VariantsConfig,
}

impl StandardFactory {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            player: config.player.clone(),
            enemy: config.enemy.clone(),
            blocks: config.blocks.clone(),
            variants: config.variants.clone(),
        }
    }
}

impl EntityFactory for StandardFactory {
    fn create_block(&self, world: &mut World, layer: usize, tile: TileCoord, block: BlockType) -> Entity {
        let ts = world.map().tile_size();
        let seed = world.resources.seed;
        let base_id = block.as_u8() as u32;
        let variant = self
            .variants
            .blocks
            .resolve(base_id, tile.x, tile.y, layer as u32, seed);

        let e = world.create_entity(format!("block_{:?}_{}_{}", block, tile.x, tile.y));
        world.insert(e, Position(tile_center(tile, ts)));
        world.insert(e, Collider::solid(Vec2::splat(ts as f32 * 0.5)));
        world.insert(e, BlockRef { layer, tile, block });
        world.insert(
            e,
            Sprite {
                base_id,
                variant,
                color: block_color(block),
            },
        );
        if let (Some(hp), Some(drop)) = (self.blocks.health_of(block), block.drop_item()) {
            world.insert(e, Health::full(hp));
            world.insert(
                e,
                Harvestable {
                    drop,
                    amount: self.blocks.drop_amount,
                },
            );
        }
        e
    }

    fn create_enemy(&self, world: &mut World, position: Vec2, strength: f32) -> Entity {
        let cfg = &self.enemy;
        let e = world.create_entity("enemy");
        world.insert(e, Position(position));
        world.insert(e, Velocity(Vec2::ZERO));
        world.insert(e, Collider::solid(Vec2::splat(cfg.half_extent)));
        world.insert(e, Health::full(cfg.max_health * strength));
        world.insert(
            e,
            Enemy {
                speed: cfg.speed,
                contact_damage: cfg.contact_damage * strength,
                contact_cooldown_secs: cfg.contact_cooldown_secs,
                aggro_radius: cfg.aggro_radius,
            },
        );
        world.insert(e, AttackCooldown(0.0));
        world.insert(
            e,
            Sprite {
                base_id: 0,
                variant: None,
                color: ENEMY_COLOR,
            },
        );
        e
    }

    fn create_pickup(
        &self,
        world: &mut World,
        position: Vec2,
        item: ItemType,
        amount: u32,
        placed_id: Option<String>,
    ) -> Entity {
        let e = world.create_entity(format!("pickup_{}", item.name()));
        world.insert(e, Position(position));
        world.insert(e, Collider::trigger(Vec2::splat(PICKUP_HALF_EXTENT)));
        world.insert(
            e,
            Pickup {
                item,
                amount,
                placed_id,
            },
        );
        world.insert(
            e,
            Sprite {
                base_id: item.as_u8() as u32,
                variant: None,
                color: item_color(item),
            },
        );
        e
    }

    fn create_player(&self, world: &mut World, position: Vec2) -> Entity {
        let cfg = &self.player;
        let e = world.create_entity("player");
        world.insert(e, Position(position));
        world.insert(e, Velocity(Vec2::ZERO));
        world.insert(e, Collider::solid(Vec2::splat(cfg.half_extent)));
        world.insert(e, Health::full(cfg.max_health));
        world.insert(
            e,
            Player {
                speed: cfg.speed,
                attack_damage: cfg.attack_damage,
                attack_range: cfg.attack_range,
                attack_cooldown_secs: cfg.attack_cooldown_secs,
            },
        );
        world.insert(e, Inventory::default());
        world.insert(e, AttackCooldown(0.0));
        world.insert(
            e,
            Sprite {
                base_id: 0,
                variant: None,
                color: PLAYER_COLOR,
            },
        );
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_breakable_block_gets_health_and_drop() {
        let mut world = World::default();
        let factory = StandardFactory::new(&SimConfig::default());
        let e = factory.create_block(&mut world, 0, IVec2::new(3, 4), BlockType::Tree);
        assert_eq!(world.get::<Position>(e), Some(&Position(Vec2::new(112.0, 144.0))));
        assert_eq!(world.get::<Health>(e).map(|h| h.max), Some(50.0));
        assert_eq!(
            world.get::<Harvestable>(e),
            Some(&Harvestable {
                drop: ItemType::Wood,
                amount: 1
            })
        );
        let sprite = world.get::<Sprite>(e).expect("sprite");
        assert!(sprite.variant.is_some());
    }

    #[test]
    fn test_wall_is_permanent_and_crate_falls_back_to_color() {
        let mut world = World::default();
        let factory = StandardFactory::new(&SimConfig::default());
        let wall = factory.create_block(&mut world, 0, IVec2::ZERO, BlockType::Wall);
        assert!(!world.has::<Health>(wall));
        let crate_e = factory.create_block(&mut world, 0, IVec2::ONE, BlockType::Crate);
        let sprite = world.get::<Sprite>(crate_e).expect("sprite");
        assert_eq!(sprite.variant, None);
        assert_eq!(sprite.color, block_color(BlockType::Crate));
    }

    #[test]
    fn test_enemy_scaled_by_strength() {
        let mut world = World::default();
        let factory = StandardFactory::new(&SimConfig::default());
        let e = factory.create_enemy(&mut world, Vec2::ZERO, 2.0);
        assert_eq!(world.get::<Health>(e).map(|h| h.max), Some(80.0));
        assert_eq!(world.get::<Enemy>(e).map(|en| en.contact_damage), Some(20.0));
    }
}

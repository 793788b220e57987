use crate::components::{AttackCooldown, Collider, Enemy, Harvestable, Health, Player, Position};
use crate::entity::Entity;
use crate::input::GameState;
use crate::system::System;
use crate::world::World;
use glam::Vec2;

use super::player_position;

/// Extra reach for enemy contact checks, in world units.
const CONTACT_SLACK: f32 = 2.0;

/// Player melee and enemy contact damage, both gated by [`AttackCooldown`].
#[derive(Debug, Default)]
pub struct CombatSystem;

impl CombatSystem {
    fn tick_cooldowns(world: &mut World, dt: f32) {
        for e in world.query::<AttackCooldown>() {
            if let Some(cd) = world.get_mut::<AttackCooldown>(e) {
                cd.0 = (cd.0 - dt).max(0.0);
            }
        }
    }

    fn half_extent(world: &World, e: Entity) -> Vec2 {
        world
            .get::<Collider>(e)
            .map(|c| c.half_extents)
            .unwrap_or(Vec2::ZERO)
    }

    /// Closest enemy or harvestable block within reach of the player.
    fn melee_target(world: &World, player: Entity, from: Vec2, range: f32) -> Option<Entity> {
        world
            .query::<Health>()
            .into_iter()
            .filter(|&e| e != player)
            .filter(|&e| world.has::<Enemy>(e) || world.has::<Harvestable>(e))
            .filter_map(|e| {
                let pos = world.get::<Position>(e)?.0;
                let reach = range + Self::half_extent(world, e).max_element();
                let dist = pos.distance(from);
                (dist <= reach).then_some((e, dist))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    fn player_attack(world: &mut World, player: Entity, from: Vec2) {
        let Some(stats) = world.get::<Player>(player).copied() else {
            return;
        };
        let ready = world.get::<AttackCooldown>(player).map_or(true, |c| c.0 <= 0.0);
        if !ready {
            return;
        }
        if let Some(target) = Self::melee_target(world, player, from, stats.attack_range) {
            if let Some(h) = world.get_mut::<Health>(target) {
                h.damage(stats.attack_damage);
            }
            log::trace!("player hit {:?} for {}", target, stats.attack_damage);
        }
        world.insert(player, AttackCooldown(stats.attack_cooldown_secs));
    }

    fn enemy_contacts(world: &mut World, player: Entity, player_pos: Vec2) {
        let player_half = Self::half_extent(world, player);
        let mut total = 0.0;
        for e in world.query::<Enemy>() {
            let (Some(enemy), Some(pos)) = (world.get::<Enemy>(e).copied(), world.get::<Position>(e)) else {
                continue;
            };
            let reach = player_half + Self::half_extent(world, e) + Vec2::splat(CONTACT_SLACK);
            let delta = (pos.0 - player_pos).abs();
            if delta.x > reach.x || delta.y > reach.y {
                continue;
            }
            if world.get::<AttackCooldown>(e).is_some_and(|c| c.0 > 0.0) {
                continue;
            }
            total += enemy.contact_damage;
            world.insert(e, AttackCooldown(enemy.contact_cooldown_secs));
        }
        if total > 0.0 {
            if let Some(h) = world.get_mut::<Health>(player) {
                h.damage(total);
            }
        }
    }
}

impl System for CombatSystem {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        Self::tick_cooldowns(world, dt);
        if world.resources.state == GameState::GameOver {
            return;
        }
        let Some((player, pos)) = player_position(world) else {
            return;
        };
        if world.resources.intents.attack {
            Self::player_attack(world, player, pos);
        }
        Self::enemy_contacts(world, player, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::factory::{EntityFactory, StandardFactory};
    use grovekeep_core::types::BlockType;
    use glam::IVec2;

    fn setup() -> (World, StandardFactory, Entity) {
        let mut world = World::default();
        let factory = StandardFactory::new(&SimConfig::default());
        let player = factory.create_player(&mut world, Vec2::new(100.0, 100.0));
        (world, factory, player)
    }

    #[test]
    fn test_attack_hits_nearest_target_once_per_cooldown() {
        let (mut world, factory, _) = setup();
        let near = factory.create_enemy(&mut world, Vec2::new(130.0, 100.0), 1.0);
        let far = factory.create_enemy(&mut world, Vec2::new(150.0, 100.0), 1.0);
        world.resources.intents.attack = true;

        let mut combat = CombatSystem;
        combat.update(&mut world, 0.01);
        combat.update(&mut world, 0.01);
        assert_eq!(world.get::<Health>(near).map(|h| h.current), Some(15.0));
        assert_eq!(world.get::<Health>(far).map(|h| h.current), Some(40.0));
    }

    #[test]
    fn test_attack_damages_harvestable_block() {
        let (mut world, factory, _) = setup();
        // Tile (4,3) centre is (144,112), about 46 units from the player.
        let tree = factory.create_block(&mut world, 0, IVec2::new(4, 3), BlockType::Tree);
        let wall = factory.create_block(&mut world, 0, IVec2::new(2, 3), BlockType::Wall);
        world.resources.intents.attack = true;
        CombatSystem.update(&mut world, 0.01);
        assert_eq!(world.get::<Health>(tree).map(|h| h.current), Some(25.0));
        assert!(world.get::<Health>(wall).is_none());
    }

    #[test]
    fn test_enemy_contact_respects_cooldown() {
        let (mut world, factory, player) = setup();
        factory.create_enemy(&mut world, Vec2::new(110.0, 100.0), 1.0);
        let mut combat = CombatSystem;
        combat.update(&mut world, 0.1);
        combat.update(&mut world, 0.1);
        assert_eq!(world.get::<Health>(player).map(|h| h.current), Some(90.0));
        for _ in 0..10 {
            combat.update(&mut world, 0.1);
        }
        assert_eq!(world.get::<Health>(player).map(|h| h.current), Some(80.0));
    }
}

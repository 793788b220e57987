/// Whole-pipeline scenario tests. Each one drives a `World` or `Session`
/// for many frames and checks properties that must hold at every frame.

#[cfg(test)]
mod tests {
    use crate::components::{Enemy, Position};
    use crate::config::{DifficultyConfig, EnemySpawnConfig, SimConfig};
    use crate::factory::{EntityFactory, StandardFactory};
    use crate::input::{GameState, Intents};
    use crate::session::Session;
    use crate::system::System;
    use crate::systems::{BlockKey, BlockStreamer, EnemySpawnSystem};
    use crate::world::World;
    use crate::zones::StaticZones;
    use grovekeep_core::rect::{TileRect, WorldRect};
    use grovekeep_core::types::{BlockType, ItemType};
    use grovekeep_world::{Region, RegionType, StreamingPolicy, WorldMap};
    use glam::{IVec2, Vec2};

    fn spawn_world(max_enemies: &str) -> World {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.add_region(
            Region::new("spawn_1", RegionType::EnemySpawn, TileRect::from_corners(IVec2::ZERO, IVec2::splat(10)))
                .with_meta("maxEnemies", max_enemies),
        )
        .expect("region");
        World::new(map)
    }

    fn spawner(seed: u64) -> EnemySpawnSystem {
        EnemySpawnSystem::new(
            EnemySpawnConfig::default(),
            DifficultyConfig::default(),
            StandardFactory::default(),
            seed,
        )
    }

    #[test]
    fn test_streamer_window_scenario() {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.set_block(10, 10, BlockType::Wall, 0);
        let mut world = World::new(map);
        let mut streamer =
            BlockStreamer::new(StreamingPolicy::default(), StandardFactory::default());

        streamer.reconcile_window(&mut world, TileRect::from_corners(IVec2::ZERO, IVec2::splat(20)));
        assert_eq!(world.resources.streamed.keys(), vec![BlockKey::new(0, 10, 10)]);
        let e = world.resources.streamed.get(&BlockKey::new(0, 10, 10)).expect("tracked");

        streamer.reconcile_window(
            &mut world,
            TileRect::from_corners(IVec2::splat(40), IVec2::splat(60)),
        );
        assert!(!world.is_active(e));
        assert!(world.resources.streamed.is_empty());
    }

    #[test]
    fn test_streamer_idempotent_under_session_updates() {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.fill_blocks(TileRect::new(5, 5, 6, 2), BlockType::Wall, 0);
        map.set_block(12, 12, BlockType::Tree, 0);
        let mut session = Session::new(map, SimConfig::default(), 3).expect("session");
        session.update(1.0 / 60.0);
        let first: Vec<_> = session
            .world()
            .resources
            .streamed
            .keys()
            .into_iter()
            .filter_map(|k| session.world().resources.streamed.get(&k))
            .collect();
        assert_eq!(first.len(), 13);
        for _ in 0..10 {
            session.update(1.0 / 60.0);
        }
        let later: Vec<_> = session
            .world()
            .resources
            .streamed
            .keys()
            .into_iter()
            .filter_map(|k| session.world().resources.streamed.get(&k))
            .collect();
        assert_eq!(first, later);
    }

    #[test]
    fn test_spawn_cap_never_exceeded() {
        let mut world = spawn_world("5");
        let mut s = spawner(42);
        // 200 simulated seconds: enough time for well over 20 spawns.
        for _ in 0..2000 {
            s.update(&mut world, 0.1);
            assert!(world.count::<Enemy>() <= 5);
        }
        assert_eq!(world.count::<Enemy>(), 5);
        assert_eq!(s.stats().spawned, 5);
        assert!(s.stats().capped > 0);
    }

    #[test]
    fn test_spawn_cap_refills_after_kills() {
        let mut world = spawn_world("5");
        let mut s = spawner(9);
        for round in 0..5 {
            for _ in 0..600 {
                s.update(&mut world, 0.1);
                assert!(world.count::<Enemy>() <= 5, "round {round}");
            }
            for e in world.query::<Enemy>().into_iter().take(3) {
                world.remove_entity(e);
            }
        }
        assert!(s.stats().spawned > 5);
    }

    #[test]
    fn test_accelerated_zone_raises_cap() {
        let mut world = spawn_world("5");
        world
            .map_mut()
            .add_region(
                Region::new("cave_1", RegionType::Biome, TileRect::new(40, 40, 10, 10))
                    .with_meta("biome", "cave"),
            )
            .expect("biome");
        StandardFactory::default().create_player(&mut world, Vec2::new(45.0 * 32.0, 45.0 * 32.0));
        let mut s = spawner(5);
        for _ in 0..3000 {
            s.update(&mut world, 0.1);
            assert!(world.count::<Enemy>() <= 8);
        }
        assert_eq!(world.count::<Enemy>(), 8);
    }

    #[test]
    fn test_session_spawn_cap() {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.add_region(
            Region::new("spawn_1", RegionType::EnemySpawn, TileRect::from_corners(IVec2::ZERO, IVec2::splat(10)))
                .with_meta("maxEnemies", "5"),
        )
        .expect("region");
        map.add_region(Region::new("start", RegionType::PlayerSpawn, TileRect::new(55, 55, 2, 2)))
            .expect("spawn");
        let mut session = Session::new(map, SimConfig::default(), 17).expect("session");
        for _ in 0..3000 {
            session.update(1.0 / 30.0);
            assert!(session.enemy_count() <= 5);
        }
    }

    #[test]
    fn test_exclusion_zones_respected() {
        let safe = TileRect::new(0, 0, 6, 11);
        let extra = WorldRect::new(Vec2::new(0.0, 0.0), Vec2::new(352.0, 96.0));
        let safe_world = safe.to_world(32);

        let mut total = 0;
        for seed in 0..20 {
            let mut world = spawn_world("5");
            world
                .map_mut()
                .add_region(Region::new("safe", RegionType::SafeZone, safe))
                .expect("safe");
            let mut s = spawner(seed);
            s.add_exclusions(StaticZones { zones: vec![extra] });
            for _ in 0..100 {
                s.update(&mut world, 5.0);
                for e in world.query::<Enemy>() {
                    let pos = world.get::<Position>(e).expect("position").0;
                    assert!(!safe_world.contains(pos), "spawned in safe zone at {pos}");
                    assert!(!extra.contains(pos), "spawned in static zone at {pos}");
                    world.remove_entity(e);
                    total += 1;
                }
            }
        }
        assert!(total > 0, "some spawns must succeed outside the zones");
    }

    #[test]
    fn test_harvest_tree_and_collect_wood() {
        let mut map = WorldMap::with_default_layers(32, 32, 16, 32);
        map.add_region(Region::new("start", RegionType::PlayerSpawn, TileRect::new(4, 4, 1, 1)))
            .expect("spawn");
        map.set_block(5, 4, BlockType::Tree, 0);
        let mut session = Session::new(map, SimConfig::default(), 1).expect("session");

        session.set_intents(Intents {
            move_dir: Vec2::ZERO,
            attack: true,
        });
        for _ in 0..40 {
            session.update(0.05);
        }
        assert_eq!(session.map().get_block(5, 4, 0), BlockType::Empty);

        session.set_intents(Intents {
            move_dir: Vec2::X,
            attack: false,
        });
        for _ in 0..5 {
            session.update(0.05);
        }
        let wood = session.inventory().map_or(0, |i| i.count(ItemType::Wood));
        assert_eq!(wood, 1);
    }

    #[test]
    fn test_walls_block_the_player() {
        let mut map = WorldMap::with_default_layers(32, 32, 16, 32);
        map.add_region(Region::new("start", RegionType::PlayerSpawn, TileRect::new(4, 4, 1, 1)))
            .expect("spawn");
        map.fill_blocks(TileRect::new(6, 0, 1, 32), BlockType::Wall, 0);
        let mut session = Session::new(map, SimConfig::default(), 1).expect("session");
        session.set_intents(Intents {
            move_dir: Vec2::X,
            attack: false,
        });
        for _ in 0..60 {
            session.update(1.0 / 30.0);
        }
        let player = session.player().expect("player");
        let x = session.world().get::<Position>(player).expect("position").0.x;
        // Wall starts at x = 192; player half extent is 12.
        assert!(x <= 180.0 + 1e-3, "player passed through wall: x = {x}");
    }

    #[test]
    fn test_player_death_is_polled_not_signalled() {
        let mut session = Session::new(WorldMap::default(), SimConfig::default(), 1).expect("session");
        let player = session.player().expect("player");
        let at = session.world().get::<Position>(player).expect("position").0;
        let factory = StandardFactory::new(session.config());
        factory.create_enemy(session.world_mut(), at + Vec2::new(20.0, 0.0), 100.0);

        assert_eq!(session.game_state(), GameState::Playing);
        session.update(1.0 / 60.0);
        assert_eq!(session.game_state(), GameState::GameOver);

        session.reset();
        assert_eq!(session.game_state(), GameState::Playing);
        assert_eq!(session.enemy_count(), 0);
    }
}

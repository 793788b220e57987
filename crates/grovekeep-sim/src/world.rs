use crate::camera::Camera;
use crate::components::{Component, ComponentKind, Components};
use crate::entity::{Entity, EntityAllocator, EntityMeta};
use crate::input::{GameState, Intents};
use crate::system::System;
use crate::systems::streamer::StreamedBlocks;
use grovekeep_world::WorldMap;
use std::collections::HashMap;

/// Session-wide state shared by every system.
#[derive(Debug, Default)]
pub struct Resources {
    pub map: WorldMap,
    pub camera: Camera,
    pub intents: Intents,
    pub state: GameState,
    /// Live block entities, keyed by map cell. Runtime only.
    pub streamed: StreamedBlocks,
    /// Seconds simulated since the session started.
    pub elapsed: f32,
    /// Seed for deterministic visual variants.
    pub seed: u64,
}

/// Entity-component scheduler. Owns all live entities and an ordered
/// pipeline of systems.
#[derive(Default)]
pub struct World {
    allocator: EntityAllocator,
    entities: HashMap<Entity, EntityMeta>,
    components: Components,
    systems: Vec<Box<dyn System>>,
    pub resources: Resources,
    frame: u64,
}

impl World {
    pub fn new(map: WorldMap) -> Self {
        Self {
            resources: Resources {
                map,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    // -- entities ---------------------------------------------------------

    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        let e = self.allocator.alloc();
        self.entities.insert(
            e,
            EntityMeta {
                name: name.into(),
                active: true,
            },
        );
        e
    }

    /// Deactivate an entity and drop it from every component store.
    /// Returns false if it was already gone.
    pub fn remove_entity(&mut self, e: Entity) -> bool {
        match self.entities.remove(&e) {
            Some(_) => {
                self.components.remove_all(e);
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, e: Entity) -> bool {
        self.entities.get(&e).is_some_and(|m| m.active)
    }

    pub fn name(&self, e: Entity) -> Option<&str> {
        self.entities.get(&e).map(|m| m.name.as_str())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Snapshot of all live entities, sorted by id.
    pub fn entities(&self) -> Vec<Entity> {
        let mut out: Vec<Entity> = self.entities.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Remove every entity. Systems and resources are kept.
    pub fn clear(&mut self) {
        let count = self.entities.len();
        self.entities.clear();
        self.components.clear();
        self.resources.streamed.clear();
        log::debug!("World cleared ({count} entities removed)");
    }

    // -- components -------------------------------------------------------

    /// Snapshot of entities holding a component kind, sorted by id.
    /// Later mutation of the world does not affect the returned list.
    pub fn entities_with(&self, kind: ComponentKind) -> Vec<Entity> {
        self.components.entities_of_kind(kind)
    }

    /// Typed form of [`entities_with`](Self::entities_with).
    pub fn query<T: Component>(&self) -> Vec<Entity> {
        T::store(&self.components).entities()
    }

    /// Attach a component, replacing any previous one of the same kind.
    /// Ignored (returns false) for entities that are not active.
    pub fn insert<T: Component>(&mut self, e: Entity, component: T) -> bool {
        if !self.is_active(e) {
            return false;
        }
        T::store_mut(&mut self.components).insert(e, component);
        true
    }

    pub fn get<T: Component>(&self, e: Entity) -> Option<&T> {
        T::store(&self.components).get(e)
    }

    pub fn get_mut<T: Component>(&mut self, e: Entity) -> Option<&mut T> {
        T::store_mut(&mut self.components).get_mut(e)
    }

    pub fn has<T: Component>(&self, e: Entity) -> bool {
        T::store(&self.components).contains(e)
    }

    pub fn remove<T: Component>(&mut self, e: Entity) -> Option<T> {
        T::store_mut(&mut self.components).remove(e)
    }

    /// Number of entities holding a component kind.
    pub fn count<T: Component>(&self) -> usize {
        T::store(&self.components).len()
    }

    // -- systems ----------------------------------------------------------

    pub fn add_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run every system once, in registration order.
    pub fn update(&mut self, dt: f32) {
        let mut systems = std::mem::take(&mut self.systems);
        for system in systems.iter_mut() {
            system.update(self, dt);
        }
        // Systems registered during this frame run from the next one.
        systems.append(&mut self.systems);
        self.systems = systems;
        self.resources.elapsed += dt;
        self.frame += 1;
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // -- shortcuts --------------------------------------------------------

    pub fn map(&self) -> &WorldMap {
        &self.resources.map
    }

    pub fn map_mut(&mut self) -> &mut WorldMap {
        &mut self.resources.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Position, Velocity};
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }
        fn update(&mut self, _world: &mut World, _dt: f32) {
            self.log.borrow_mut().push(self.label);
        }
    }

    /// Removes every entity with Health, then reads them back.
    struct Reaper;

    impl System for Reaper {
        fn name(&self) -> &'static str {
            "reaper"
        }
        fn update(&mut self, world: &mut World, _dt: f32) {
            let snapshot = world.entities_with(ComponentKind::Health);
            for e in &snapshot {
                world.remove_entity(*e);
            }
            for e in snapshot {
                assert!(world.get::<Health>(e).is_none());
            }
        }
    }

    #[test]
    fn test_create_and_remove_entity() {
        let mut world = World::default();
        let e = world.create_entity("crate");
        assert!(world.is_active(e));
        assert_eq!(world.name(e), Some("crate"));
        assert!(world.insert(e, Position(Vec2::ONE)));
        assert!(world.insert(e, Velocity(Vec2::X)));

        assert!(world.remove_entity(e));
        assert!(!world.is_active(e));
        assert!(world.get::<Position>(e).is_none());
        assert!(world.entities_with(ComponentKind::Velocity).is_empty());
        assert!(!world.remove_entity(e), "second removal is a no-op");
        assert!(!world.insert(e, Position(Vec2::ZERO)), "dead entities take no components");
    }

    #[test]
    fn test_ids_not_reused() {
        let mut world = World::default();
        let a = world.create_entity("a");
        world.remove_entity(a);
        let b = world.create_entity("b");
        assert_ne!(a, b);
        assert!(!world.is_active(a));
    }

    #[test]
    fn test_snapshot_unaffected_by_mutation() {
        let mut world = World::default();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        world.insert(a, Health::full(1.0));
        world.insert(b, Health::full(1.0));

        let snapshot = world.entities_with(ComponentKind::Health);
        world.remove_entity(a);
        let c = world.create_entity("c");
        world.insert(c, Health::full(1.0));
        assert_eq!(snapshot, vec![a, b]);
        assert_eq!(world.query::<Health>(), vec![b, c]);
    }

    #[test]
    fn test_component_removal_keeps_siblings() {
        let mut world = World::default();
        let e = world.create_entity("e");
        world.insert(e, Position(Vec2::ZERO));
        world.insert(e, Health::full(5.0));
        assert_eq!(world.remove::<Health>(e), Some(Health::full(5.0)));
        assert!(world.has::<Position>(e));
        assert!(!world.entities_with(ComponentKind::Health).contains(&e));
        assert!(world.remove::<Health>(e).is_none());
    }

    #[test]
    fn test_systems_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut world = World::default();
        for label in ["input", "movement", "collision", "death"] {
            world.add_system(Recorder {
                label,
                log: Rc::clone(&log),
            });
        }
        world.update(0.016);
        world.update(0.016);
        assert_eq!(
            *log.borrow(),
            vec!["input", "movement", "collision", "death", "input", "movement", "collision", "death"]
        );
        assert_eq!(world.frame(), 2);
        assert!((world.resources.elapsed - 0.032).abs() < 1e-6);
        assert_eq!(world.system_names().len(), 4);
    }

    #[test]
    fn test_removed_components_read_absent_in_same_frame() {
        let mut world = World::default();
        for i in 0..5 {
            let e = world.create_entity(format!("e{i}"));
            world.insert(e, Health::full(1.0));
        }
        world.add_system(Reaper);
        world.update(0.1);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut world = World::default();
        let e = world.create_entity("e");
        world.insert(e, Position(Vec2::ZERO));
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.count::<Position>(), 0);
    }
}

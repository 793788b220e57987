//! Plain-data components. One store per kind, keyed by entity.

use crate::entity::Entity;
use grovekeep_core::rect::WorldRect;
use grovekeep_core::types::{BlockType, ItemType, TileCoord};
use grovekeep_world::Variant;
use glam::Vec2;
use std::collections::HashMap;

/// Sparse entity → component map for one component kind.
#[derive(Debug)]
pub struct ComponentStore<T> {
    items: HashMap<Entity, T>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<T> ComponentStore<T> {
    pub fn get(&self, e: Entity) -> Option<&T> {
        self.items.get(&e)
    }

    pub fn get_mut(&mut self, e: Entity) -> Option<&mut T> {
        self.items.get_mut(&e)
    }

    pub fn contains(&self, e: Entity) -> bool {
        self.items.contains_key(&e)
    }

    pub fn insert(&mut self, e: Entity, value: T) -> Option<T> {
        self.items.insert(e, value)
    }

    pub fn remove(&mut self, e: Entity) -> Option<T> {
        self.items.remove(&e)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of owning entities, sorted by id.
    pub fn entities(&self) -> Vec<Entity> {
        let mut out: Vec<Entity> = self.items.keys().copied().collect();
        out.sort_unstable();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entity, &T)> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// A component type with a dedicated store in [`Components`].
pub trait Component: Sized + 'static {
    const KIND: ComponentKind;
    fn store(components: &Components) -> &ComponentStore<Self>;
    fn store_mut(components: &mut Components) -> &mut ComponentStore<Self>;
}

macro_rules! component_set {
    ($($field:ident: $ty:ty => $kind:ident),* $(,)?) => {
        /// Every component kind the simulation knows about.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ComponentKind {
            $($kind),*
        }

        impl ComponentKind {
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$kind),*];
        }

        /// All component stores.
        #[derive(Debug, Default)]
        pub struct Components {
            $($field: ComponentStore<$ty>),*
        }

        impl Components {
            pub(crate) fn remove_all(&mut self, e: Entity) {
                $(self.$field.remove(e);)*
            }

            pub(crate) fn entities_of_kind(&self, kind: ComponentKind) -> Vec<Entity> {
                match kind {
                    $(ComponentKind::$kind => self.$field.entities()),*
                }
            }

            pub(crate) fn clear(&mut self) {
                $(self.$field.clear();)*
            }
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;
                fn store(components: &Components) -> &ComponentStore<Self> {
                    &components.$field
                }
                fn store_mut(components: &mut Components) -> &mut ComponentStore<Self> {
                    &mut components.$field
                }
            }
        )*
    };
}

component_set! {
    positions: Position => Position,
    velocities: Velocity => Velocity,
    colliders: Collider => Collider,
    healths: Health => Health,
    sprites: Sprite => Sprite,
    players: Player => Player,
    enemies: Enemy => Enemy,
    block_refs: BlockRef => BlockRef,
    harvestables: Harvestable => Harvestable,
    pickups: Pickup => Pickup,
    inventories: Inventory => Inventory,
    spawned: Spawned => Spawned,
    cooldowns: AttackCooldown => AttackCooldown,
}

/// Centre of the entity in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

/// World units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

/// Axis-aligned box centred on the entity's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub half_extents: Vec2,
    /// Solid colliders block movers; non-solid ones only report overlap.
    pub solid: bool,
}

impl Collider {
    pub fn solid(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            solid: true,
        }
    }

    pub fn trigger(half_extents: Vec2) -> Self {
        Self {
            half_extents,
            solid: false,
        }
    }

    pub fn aabb(&self, center: Vec2) -> WorldRect {
        WorldRect::from_center(center, self.half_extents * 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }
}

/// Visual description handed to the renderer. `variant` is None when no
/// variant is registered, in which case `color` is drawn flat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub base_id: u32,
    pub variant: Option<Variant>,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub speed: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_cooldown_secs: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub speed: f32,
    pub contact_damage: f32,
    pub contact_cooldown_secs: f32,
    pub aggro_radius: f32,
}

/// Back-reference from a streamed block entity to its map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub layer: usize,
    pub tile: TileCoord,
    pub block: BlockType,
}

/// Breakable thing that drops an item when destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Harvestable {
    pub drop: ItemType,
    pub amount: u32,
}

/// Collectible item lying in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickup {
    pub item: ItemType,
    pub amount: u32,
    /// Id of the placed item this pickup mirrors, if any.
    pub placed_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: HashMap<ItemType, u32>,
}

impl Inventory {
    pub fn add(&mut self, item: ItemType, amount: u32) {
        if item.is_empty() || amount == 0 {
            return;
        }
        *self.items.entry(item).or_insert(0) += amount;
    }

    pub fn count(&self, item: ItemType) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }
}

/// Records which region spawned an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawned {
    pub region_id: String,
}

/// Seconds until the entity may attack again.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttackCooldown(pub f32);

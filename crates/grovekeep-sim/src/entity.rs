/// Opaque entity handle. Ids are never reused within a [`World`](crate::World),
/// so a stale handle simply reads as "no longer active".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Monotonic id source.
#[derive(Debug)]
pub(crate) struct EntityAllocator {
    next: u64,
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityAllocator {
    pub(crate) fn alloc(&mut self) -> Entity {
        let e = Entity(self.next);
        self.next += 1;
        e
    }
}

/// Bookkeeping kept per live entity.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    pub name: String,
    pub active: bool,
}

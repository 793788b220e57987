//! Deterministic visual variant selection.
//!
//! Pure function of (base id, tile, layer, seed). No state, so re-streamed
//! chunks always get the same variants back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const HASH_PRIME_X: i64 = 73_856_093;
const HASH_PRIME_Y: i64 = 19_349_663;
const HASH_PRIME_LAYER: i64 = 83_492_791;

/// Quarter-turn rotation applied to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    pub fn radians(self) -> f32 {
        (self.degrees() as f32).to_radians()
    }
}

/// Catalog entry for one visual category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantEntry {
    /// Number of interchangeable variants. Zero means nothing registered yet.
    pub variants: u32,
    /// Whether variants may be rotated in quarter turns.
    #[serde(default)]
    pub rotatable: bool,
}

/// Chosen variant for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    pub index: u32,
    pub rotation: Rotation,
}

/// Per-category variant counts keyed by base id (tile id or block/item grid value).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantCatalog {
    entries: BTreeMap<u32, VariantEntry>,
}

impl VariantCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, base_id: u32, variants: u32, rotatable: bool) {
        self.entries.insert(
            base_id,
            VariantEntry {
                variants,
                rotatable,
            },
        );
    }

    pub fn entry(&self, base_id: u32) -> Option<&VariantEntry> {
        self.entries.get(&base_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the variant for a cell. None if the category is unknown or has
    /// no variants; callers fall back to a flat default look.
    pub fn resolve(
        &self,
        base_id: u32,
        tile_x: i32,
        tile_y: i32,
        layer: u32,
        seed: u64,
    ) -> Option<Variant> {
        let entry = self.entry(base_id)?;
        resolve_with(entry, tile_x, tile_y, layer, seed)
    }
}

/// Spatial hash of a cell. Wrapping arithmetic; identical inputs always agree.
pub fn variant_hash(tile_x: i32, tile_y: i32, layer: u32, seed: u64) -> i64 {
    (tile_x as i64).wrapping_mul(HASH_PRIME_X)
        ^ (tile_y as i64).wrapping_mul(HASH_PRIME_Y)
        ^ (layer as i64).wrapping_mul(HASH_PRIME_LAYER)
        ^ (seed as i64)
}

/// Resolve against a single entry.
pub fn resolve_with(
    entry: &VariantEntry,
    tile_x: i32,
    tile_y: i32,
    layer: u32,
    seed: u64,
) -> Option<Variant> {
    if entry.variants == 0 {
        return None;
    }
    let hash = variant_hash(tile_x, tile_y, layer, seed);
    let index = (hash.unsigned_abs() % entry.variants as u64) as u32;
    let rotation = if entry.rotatable {
        Rotation::ALL[((hash / 7).unsigned_abs() % 4) as usize]
    } else {
        Rotation::Deg0
    };
    Some(Variant { index, rotation })
}

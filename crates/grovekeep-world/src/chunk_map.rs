use crate::chunk::{Cell, Chunk};
use grovekeep_core::math::{tile_to_chunk, tile_to_local};
use grovekeep_core::rect::TileRect;
use grovekeep_core::types::{ChunkCoord, TileCoord};
use glam::IVec2;
use std::collections::HashMap;

/// Inclusive range of chunk coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub min: ChunkCoord,
    pub max: ChunkCoord,
}

impl ChunkRange {
    /// Chunks touched by a tile rectangle. Empty rectangles give an empty range.
    pub fn covering(rect: &TileRect, chunk_size: i32) -> Self {
        if rect.is_empty() {
            return Self {
                min: IVec2::ZERO,
                max: IVec2::splat(-1),
            };
        }
        Self {
            min: tile_to_chunk(rect.min(), chunk_size),
            max: tile_to_chunk(rect.max_inclusive(), chunk_size),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.min.x && coord.x <= self.max.x && coord.y >= self.min.y && coord.y <= self.max.y
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            let w = (self.max.x as i64 - self.min.x as i64 + 1) as u64;
            let h = (self.max.y as i64 - self.min.y as i64 + 1) as u64;
            usize::try_from(w.saturating_mul(h)).unwrap_or(usize::MAX)
        }
    }
}

/// One sparse layer: chunks allocated on first non-empty write.
/// A missing chunk reads as all-empty.
#[derive(Debug, Clone)]
pub struct ChunkMap<T: Cell> {
    pub name: String,
    /// Only meaningful for block layers.
    pub is_collision: bool,
    chunk_size: i32,
    chunks: HashMap<ChunkCoord, Chunk<T>>,
}

impl<T: Cell> ChunkMap<T> {
    pub fn new(name: impl Into<String>, chunk_size: i32, is_collision: bool) -> Self {
        Self {
            name: name.into(),
            is_collision,
            chunk_size,
            chunks: HashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Read one cell. Never allocates.
    pub fn get(&self, tile: TileCoord) -> T {
        let coord = tile_to_chunk(tile, self.chunk_size);
        self.chunks
            .get(&coord)
            .map(|c| c.get(tile_to_local(tile, self.chunk_size)))
            .unwrap_or_default()
    }

    /// Write one cell, allocating the owning chunk if needed.
    /// Writing empty into a missing chunk leaves it missing.
    pub fn set(&mut self, tile: TileCoord, value: T) {
        let coord = tile_to_chunk(tile, self.chunk_size);
        let local = tile_to_local(tile, self.chunk_size);
        match self.chunks.get_mut(&coord) {
            Some(chunk) => chunk.set(local, value),
            None if value.is_empty() => {}
            None => {
                let mut chunk = Chunk::new(coord, self.chunk_size);
                chunk.set(local, value);
                self.chunks.insert(coord, chunk);
            }
        }
    }

    /// Get a chunk by coordinate.
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk<T>> {
        self.chunks.get(&coord)
    }

    /// Insert a pre-built chunk, replacing any existing one at its coordinate.
    pub fn insert_chunk(&mut self, chunk: Chunk<T>) {
        self.chunks.insert(chunk.coord, chunk);
    }

    /// Drop a chunk entirely. Returns true if one existed.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> bool {
        self.chunks.remove(&coord).is_some()
    }

    /// Allocated chunks inside an inclusive range, sorted by (y, x).
    pub fn chunks_in(&self, range: ChunkRange) -> Vec<&Chunk<T>> {
        let mut found: Vec<&Chunk<T>> = if range.len() < self.chunks.len() {
            let mut out = Vec::new();
            for cy in range.min.y..=range.max.y {
                for cx in range.min.x..=range.max.x {
                    if let Some(chunk) = self.chunks.get(&IVec2::new(cx, cy)) {
                        out.push(chunk);
                    }
                }
            }
            out
        } else {
            self.chunks
                .values()
                .filter(|c| range.contains(c.coord))
                .collect()
        };
        found.sort_by_key(|c| (c.coord.y, c.coord.x));
        found
    }

    /// Non-empty cells inside a tile rectangle, as (tile, value).
    pub fn filled_in(&self, rect: &TileRect) -> Vec<(TileCoord, T)> {
        let range = ChunkRange::covering(rect, self.chunk_size);
        let mut out = Vec::new();
        for chunk in self.chunks_in(range) {
            let origin = chunk.coord * self.chunk_size;
            for (local, value) in chunk.iter_filled() {
                let tile = origin + local;
                if rect.contains(tile) {
                    out.push((tile, value));
                }
            }
        }
        out
    }

    /// Iterator over all allocated chunks.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk<T>)> {
        self.chunks.iter()
    }

    /// Number of allocated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grovekeep_core::types::BlockType;

    #[test]
    fn test_read_never_allocates() {
        let layer: ChunkMap<u32> = ChunkMap::new("ground", 32, false);
        assert_eq!(layer.get(IVec2::new(100, 100)), 0);
        assert_eq!(layer.get(IVec2::new(-5, 3)), 0);
        assert_eq!(layer.chunk_count(), 0);
    }

    #[test]
    fn test_set_allocates_lazily() {
        let mut layer: ChunkMap<BlockType> = ChunkMap::new("blocks", 32, true);
        layer.set(IVec2::new(10, 10), BlockType::Empty);
        assert_eq!(layer.chunk_count(), 0, "empty write must not allocate");

        layer.set(IVec2::new(10, 10), BlockType::Wall);
        layer.set(IVec2::new(11, 10), BlockType::Crate);
        assert_eq!(layer.chunk_count(), 1);
        layer.set(IVec2::new(40, 10), BlockType::Rock);
        assert_eq!(layer.chunk_count(), 2);
        assert_eq!(layer.get(IVec2::new(40, 10)), BlockType::Rock);
    }

    #[test]
    fn test_negative_tiles_land_in_negative_chunks() {
        let mut layer: ChunkMap<u32> = ChunkMap::new("ground", 16, false);
        layer.set(IVec2::new(-1, -1), 5);
        assert!(layer.chunk(IVec2::new(-1, -1)).is_some());
        assert!(layer.chunk(IVec2::new(0, 0)).is_none());
        assert_eq!(layer.get(IVec2::new(-1, -1)), 5);
    }

    #[test]
    fn test_chunk_range_covering() {
        let range = ChunkRange::covering(&TileRect::new(0, 0, 21, 21), 32);
        assert_eq!(range.min, IVec2::new(0, 0));
        assert_eq!(range.max, IVec2::new(0, 0));
        assert_eq!(range.len(), 1);

        let range = ChunkRange::covering(&TileRect::new(30, 30, 40, 4), 32);
        assert_eq!(range.min, IVec2::new(0, 0));
        assert_eq!(range.max, IVec2::new(2, 1));
        assert_eq!(range.len(), 6);

        assert!(ChunkRange::covering(&TileRect::new(0, 0, 0, 0), 32).is_empty());
    }

    #[test]
    fn test_huge_range_queries_allocated_chunks_only() {
        let mut layer: ChunkMap<u32> = ChunkMap::new("ground", 1, false);
        layer.set(IVec2::new(5, 5), 9);
        let everything = TileRect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert!(ChunkRange::covering(&everything, 1).len() > 1 << 40);
        assert_eq!(layer.filled_in(&everything), vec![]);
        let wide = TileRect::new(-10, -10, i32::MAX, i32::MAX);
        assert_eq!(layer.filled_in(&wide), vec![(IVec2::new(5, 5), 9)]);
    }

    #[test]
    fn test_filled_in_respects_rect() {
        let mut layer: ChunkMap<BlockType> = ChunkMap::new("blocks", 8, true);
        layer.set(IVec2::new(1, 1), BlockType::Wall);
        layer.set(IVec2::new(6, 6), BlockType::Tree);
        layer.set(IVec2::new(9, 1), BlockType::Rock);

        let found = layer.filled_in(&TileRect::new(0, 0, 5, 5));
        assert_eq!(found, vec![(IVec2::new(1, 1), BlockType::Wall)]);

        let mut all = layer.filled_in(&TileRect::new(0, 0, 16, 16));
        all.sort_by_key(|(t, _)| (t.y, t.x));
        assert_eq!(all.len(), 3);
    }
}

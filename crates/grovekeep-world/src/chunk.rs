use grovekeep_core::types::{BlockType, ChunkCoord, ItemType};
use glam::IVec2;

/// A value that can live in a chunk cell. The default value is "empty".
pub trait Cell: Copy + Default + PartialEq {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Cell for u32 {}
impl Cell for BlockType {}
impl Cell for ItemType {}

/// Dense `size × size` grid of cells for one chunk of one layer, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T: Cell> {
    pub coord: ChunkCoord,
    size: i32,
    cells: Vec<T>,
    /// Number of non-empty cells, kept in step with writes.
    filled: u32,
}

impl<T: Cell> Chunk<T> {
    /// Create an all-empty chunk.
    pub fn new(coord: ChunkCoord, size: i32) -> Self {
        let side = size.max(0) as usize;
        Self {
            coord,
            size,
            cells: vec![T::default(); side * side],
            filled: 0,
        }
    }

    /// Build a chunk from row-major cells. Returns None if the cell count is not `size²`.
    pub fn from_cells(coord: ChunkCoord, size: i32, cells: Vec<T>) -> Option<Self> {
        let side = size.max(0) as usize;
        if cells.len() != side * side {
            return None;
        }
        let filled = cells.iter().filter(|c| !c.is_empty()).count() as u32;
        Some(Self {
            coord,
            size,
            cells,
            filled,
        })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    fn index(&self, local: IVec2) -> Option<usize> {
        if local.x < 0 || local.y < 0 || local.x >= self.size || local.y >= self.size {
            return None;
        }
        Some((local.y * self.size + local.x) as usize)
    }

    /// Read a cell by local offset. Out-of-range offsets read as empty.
    pub fn get(&self, local: IVec2) -> T {
        self.index(local)
            .map(|i| self.cells[i])
            .unwrap_or_default()
    }

    /// Write a cell by local offset. Out-of-range offsets are ignored.
    pub fn set(&mut self, local: IVec2, value: T) {
        let Some(i) = self.index(local) else {
            return;
        };
        let was_empty = self.cells[i].is_empty();
        self.cells[i] = value;
        match (was_empty, value.is_empty()) {
            (true, false) => self.filled += 1,
            (false, true) => self.filled -= 1,
            _ => {}
        }
    }

    /// Whether every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.filled == 0
    }

    pub fn filled_count(&self) -> u32 {
        self.filled
    }

    /// Iterate non-empty cells as (local offset, value).
    pub fn iter_filled(&self) -> impl Iterator<Item = (IVec2, T)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_empty())
            .map(move |(i, c)| (IVec2::new(i as i32 % size, i as i32 / size), *c))
    }

    /// Rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.size.max(1) as usize)
    }
}

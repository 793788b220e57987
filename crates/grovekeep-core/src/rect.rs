use crate::math::world_to_tile;
use crate::types::TileCoord;
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in tile units. `x`/`y` is the top-left tile, size in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl TileRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two inclusive corner tiles.
    pub fn from_corners(min: TileCoord, max_inclusive: TileCoord) -> Self {
        Self::new(
            min.x,
            min.y,
            max_inclusive.x.saturating_sub(min.x).saturating_add(1),
            max_inclusive.y.saturating_sub(min.y).saturating_add(1),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn min(&self) -> TileCoord {
        IVec2::new(self.x, self.y)
    }

    /// Exclusive right edge. Widened so far-off rectangles cannot overflow.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Last tile inside the rectangle (inclusive), saturated to the i32 range.
    pub fn max_inclusive(&self) -> TileCoord {
        IVec2::new(saturate(self.right() - 1), saturate(self.bottom() - 1))
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.width as i64 * self.height as i64
        }
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= self.x
            && tile.y >= self.y
            && (tile.x as i64) < self.right()
            && (tile.y as i64) < self.bottom()
    }

    /// Overlapping part of two rectangles; empty (zero-sized) if they do not overlap.
    pub fn intersection(&self, other: &TileRect) -> TileRect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        TileRect::new(
            x0,
            y0,
            saturate((x1 - x0 as i64).max(0)),
            saturate((y1 - y0 as i64).max(0)),
        )
    }

    /// Grow by `amount` tiles on every side.
    pub fn expand(&self, amount: i32) -> TileRect {
        TileRect::new(
            self.x.saturating_sub(amount),
            self.y.saturating_sub(amount),
            self.width.saturating_add(amount.saturating_mul(2)),
            self.height.saturating_add(amount.saturating_mul(2)),
        )
    }

    /// Iterate all tiles, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let (x0, x1) = (self.x, self.x.saturating_add(self.width.max(0)));
        (self.y..self.y.saturating_add(self.height.max(0)))
            .flat_map(move |y| (x0..x1).map(move |x| IVec2::new(x, y)))
    }

    /// The same area in world units.
    pub fn to_world(&self, tile_size: i32) -> WorldRect {
        let ts = tile_size as f32;
        WorldRect::new(
            Vec2::new(self.x as f32 * ts, self.y as f32 * ts),
            Vec2::new(self.width as f32 * ts, self.height as f32 * ts),
        )
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Axis-aligned rectangle in world units (top-left origin plus size).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl WorldRect {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.y >= self.min.y && point.x < max.x && point.y < max.y
    }

    /// Strict overlap test; touching edges do not count.
    pub fn overlaps(&self, other: &WorldRect) -> bool {
        let a = self.max();
        let b = other.max();
        self.min.x < b.x && other.min.x < a.x && self.min.y < b.y && other.min.y < a.y
    }

    /// Smallest tile rectangle covering this area. A point on the far edge
    /// does not pull in the next tile.
    pub fn to_tile_rect(&self, tile_size: i32) -> TileRect {
        let ts = tile_size as f32;
        let min = world_to_tile(self.min, tile_size);
        let max = self.max();
        let max = IVec2::new(
            ((max.x / ts).ceil() as i32).saturating_sub(1),
            ((max.y / ts).ceil() as i32).saturating_sub(1),
        );
        TileRect::from_corners(min, max)
    }
}

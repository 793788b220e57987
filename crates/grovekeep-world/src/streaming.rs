use crate::map::WorldMap;
use grovekeep_core::constants::DEFAULT_STREAM_BUFFER_CHUNKS;
use grovekeep_core::rect::{TileRect, WorldRect};

/// Policy deciding which part of the map should have live block entities,
/// based on what the camera can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingPolicy {
    /// Whole chunks added on every side of the visible area.
    pub buffer_chunks: i32,
}

impl Default for StreamingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_STREAM_BUFFER_CHUNKS)
    }
}

impl StreamingPolicy {
    pub fn new(buffer_chunks: i32) -> Self {
        Self {
            buffer_chunks: buffer_chunks.max(0),
        }
    }

    /// Streaming rectangle in tiles: the visible area grown by the buffer,
    /// clamped to the map. May be empty if the camera is entirely off-map.
    pub fn window(&self, map: &WorldMap, visible: WorldRect) -> TileRect {
        self.window_for_tiles(map, visible.to_tile_rect(map.tile_size()))
    }

    /// Same as [`window`](Self::window) for an already tile-aligned view.
    pub fn window_for_tiles(&self, map: &WorldMap, visible: TileRect) -> TileRect {
        if visible.is_empty() {
            return TileRect::default();
        }
        visible
            .expand(self.buffer_chunks.saturating_mul(map.chunk_size()))
            .intersection(&map.bounds())
    }
}

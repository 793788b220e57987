use crate::types::{ChunkCoord, TileCoord};
use glam::{IVec2, Vec2};

/// Convert a tile coordinate to its containing chunk coordinate.
///
/// Floor division, so tile -1 lives in chunk -1, not chunk 0.
pub fn tile_to_chunk(tile: TileCoord, chunk_size: i32) -> ChunkCoord {
    IVec2::new(tile.x.div_euclid(chunk_size), tile.y.div_euclid(chunk_size))
}

/// Convert a tile coordinate to its local offset within its chunk. Always in [0, chunk_size).
pub fn tile_to_local(tile: TileCoord, chunk_size: i32) -> IVec2 {
    IVec2::new(tile.x.rem_euclid(chunk_size), tile.y.rem_euclid(chunk_size))
}

/// Convert a chunk coordinate and local offset back to tile-space.
pub fn chunk_local_to_tile(chunk: ChunkCoord, local: IVec2, chunk_size: i32) -> TileCoord {
    IVec2::new(chunk.x * chunk_size + local.x, chunk.y * chunk_size + local.y)
}

/// Top-left corner of a tile in world units.
pub fn tile_to_world(tile: TileCoord, tile_size: i32) -> Vec2 {
    let ts = tile_size as f32;
    Vec2::new(tile.x as f32 * ts, tile.y as f32 * ts)
}

/// Centre of a tile in world units.
pub fn tile_center(tile: TileCoord, tile_size: i32) -> Vec2 {
    tile_to_world(tile, tile_size) + Vec2::splat(tile_size as f32 * 0.5)
}

/// Tile containing a world-space point.
pub fn world_to_tile(world: Vec2, tile_size: i32) -> TileCoord {
    let ts = tile_size as f32;
    IVec2::new((world.x / ts).floor() as i32, (world.y / ts).floor() as i32)
}

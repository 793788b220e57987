//! Shared defaults for map geometry and streaming.
//! Every value here can be overridden per map or per session; these are
//! the values a freshly constructed map or config starts from.

/// Default side length of a chunk in tiles.
pub const DEFAULT_CHUNK_SIZE: i32 = 32;

/// Default edge length of a tile in world units.
pub const DEFAULT_TILE_SIZE: i32 = 32;

/// Default map width in tiles.
pub const DEFAULT_MAP_WIDTH: i32 = 128;

/// Default map height in tiles.
pub const DEFAULT_MAP_HEIGHT: i32 = 128;

/// Tile id meaning "no tile".
pub const EMPTY_TILE: u32 = 0;

/// Number of item layers. Always exactly two: Low (below blocks) and High (above).
pub const ITEM_LAYER_COUNT: usize = 2;

/// Whole chunks added around the visible area when streaming block entities.
pub const DEFAULT_STREAM_BUFFER_CHUNKS: i32 = 1;

/// Placement attempts per spawn before giving up for the tick.
pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 10;

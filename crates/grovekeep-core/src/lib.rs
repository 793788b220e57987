pub mod constants;
pub mod math;
pub mod rect;
pub mod types;

pub use rect::{TileRect, WorldRect};
pub use types::{BlockType, ChunkCoord, ItemType, TileCoord};

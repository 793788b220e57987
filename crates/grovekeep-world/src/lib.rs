pub mod chunk;
pub mod chunk_map;
pub mod map;
pub mod region;
pub mod streaming;
pub mod variant;

pub use chunk::{Cell, Chunk};
pub use chunk_map::{ChunkMap, ChunkRange};
pub use map::{ItemLayerKind, LayerRef, PlacedItem, WorldMap};
pub use region::{Region, RegionError, RegionSet, RegionType};
pub use streaming::StreamingPolicy;
pub use variant::{Rotation, Variant, VariantCatalog, VariantEntry};

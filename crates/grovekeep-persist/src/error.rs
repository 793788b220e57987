use grovekeep_world::RegionError;

/// Errors that can occur while loading or saving a map file.
/// A failed load never yields a partial map.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("malformed map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("map file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("LZ4 decompression failed: {0}")]
    Decompress(String),

    #[error("unsupported map format version {0}")]
    UnsupportedVersion(u32),

    #[error("invalid map dimensions: {width}x{height} tiles, chunk size {chunk_size}, tile size {tile_size}")]
    InvalidDimensions {
        width: i32,
        height: i32,
        chunk_size: i32,
        tile_size: i32,
    },

    #[error("expected exactly 2 item layers, found {0}")]
    ItemLayerCount(usize),

    #[error("layer '{layer}': malformed chunk key '{key}' (expected \"cx,cy\")")]
    InvalidChunkKey { layer: String, key: String },

    #[error("layer '{layer}' chunk '{key}': expected a {expected}x{expected} grid")]
    ChunkShape {
        layer: String,
        key: String,
        expected: i32,
    },

    #[error("layer '{layer}' chunk '{key}': {value} is not a valid {kind} value")]
    InvalidCellValue {
        layer: String,
        key: String,
        value: i64,
        kind: &'static str,
    },

    #[error("region '{0}' extends past the representable tile range")]
    RegionOverflow(String),

    #[error("invalid region: {0}")]
    Region(#[from] RegionError),
}

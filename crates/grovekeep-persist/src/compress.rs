//! LZ4-compressed map snapshots. Same schema as the JSON map file, written
//! compactly and compressed with the uncompressed size prepended.

use std::path::Path;

use grovekeep_world::map::WorldMap;

use crate::error::PersistError;
use crate::load::{from_file, LoadedMap};
use crate::save::to_file;

/// Serialize and compress a map.
pub fn compress_map(map: &WorldMap) -> Result<Vec<u8>, PersistError> {
    let json = serde_json::to_vec(&to_file(map))?;
    Ok(lz4_flex::compress_prepend_size(&json))
}

/// Decompress and parse a map. Fails as a whole like [`crate::load`].
pub fn decompress_map(compressed: &[u8]) -> Result<LoadedMap, PersistError> {
    let json = lz4_flex::decompress_size_prepended(compressed)
        .map_err(|e| PersistError::Decompress(e.to_string()))?;
    from_file(serde_json::from_slice(&json)?)
}

/// Write a compressed snapshot and mark the map clean.
pub fn save_compressed_file(path: &Path, map: &mut WorldMap) -> Result<(), PersistError> {
    let bytes = compress_map(map)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, &bytes)?;
    map.mark_clean();
    log::info!("Saved compressed map to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub fn load_compressed_file(path: &Path) -> Result<LoadedMap, PersistError> {
    let bytes = std::fs::read(path)?;
    let loaded = decompress_map(&bytes)?;
    log::info!(
        "Loaded compressed map {} ({}x{} tiles)",
        path.display(),
        loaded.map.width(),
        loaded.map.height()
    );
    Ok(loaded)
}

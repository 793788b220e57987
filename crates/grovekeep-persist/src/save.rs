use std::path::Path;

use grovekeep_world::chunk::Cell;
use grovekeep_world::chunk_map::ChunkMap;
use grovekeep_world::map::WorldMap;

use crate::error::PersistError;
use crate::format::*;

/// Convert a map to its file representation. Blank chunks are skipped.
pub fn to_file(map: &WorldMap) -> MapFile {
    MapFile {
        version: FORMAT_VERSION,
        map_width: map.width(),
        map_height: map.height(),
        chunk_size: map.chunk_size(),
        tile_size: map.tile_size(),
        tile_layers: map
            .tile_layers
            .iter()
            .map(|l| encode_layer(l, |v| v as i64))
            .collect(),
        block_layers: map
            .block_layers
            .iter()
            .map(|l| encode_layer(l, |v| v.as_u8() as i64))
            .collect(),
        item_layers: map
            .item_layers
            .iter()
            .map(|l| encode_layer(l, |v| v.as_u8() as i64))
            .collect(),
        regions: map.all_regions().to_vec(),
        placed_items: map
            .placed_items()
            .iter()
            .map(|p| PlacedItemFile {
                id: p.id.clone(),
                item_id: p.item,
                tile: TilePos {
                    x: p.tile.x,
                    y: p.tile.y,
                },
                amount: p.amount,
                respawns: p.respawns,
                respawn_interval_seconds: p.respawn_interval_secs,
            })
            .collect(),
    }
}

/// Serialize a map to pretty-printed JSON.
pub fn save(map: &WorldMap) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&to_file(map))?)
}

/// Write a map to disk and mark it clean.
pub fn save_file(path: &Path, map: &mut WorldMap) -> Result<(), PersistError> {
    let json = save(map)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, json)?;
    map.mark_clean();
    log::info!(
        "Saved map to {} ({} chunks)",
        path.display(),
        map.allocated_chunks()
    );
    Ok(())
}

fn encode_layer<T: Cell>(layer: &ChunkMap<T>, encode: impl Fn(T) -> i64) -> LayerFile {
    let chunks = layer
        .iter()
        .filter(|(_, chunk)| !chunk.is_blank())
        .map(|(coord, chunk)| {
            let values = chunk
                .rows()
                .map(|row| row.iter().map(|&v| encode(v)).collect())
                .collect();
            (chunk_key(coord.x, coord.y), ChunkFile { values })
        })
        .collect();
    LayerFile {
        name: layer.name.clone(),
        is_collision_layer: layer.is_collision,
        chunks,
    }
}

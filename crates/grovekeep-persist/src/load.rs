use std::path::Path;

use grovekeep_core::types::{BlockType, ItemType};
use grovekeep_world::chunk::{Cell, Chunk};
use grovekeep_world::chunk_map::ChunkMap;
use grovekeep_world::map::{PlacedItem, WorldMap};
use glam::IVec2;

use crate::compat;
use crate::error::PersistError;
use crate::format::*;

/// Parsed map ready for a session, plus non-fatal warnings.
#[derive(Debug)]
pub struct LoadedMap {
    pub map: WorldMap,
    pub warnings: Vec<String>,
}

/// Parse a map from JSON text. Fails as a whole on any malformed part.
pub fn load(json: &str) -> Result<LoadedMap, PersistError> {
    let file: MapFile = serde_json::from_str(json)?;
    from_file(file)
}

/// Read and parse a map file from disk.
pub fn load_file(path: &Path) -> Result<LoadedMap, PersistError> {
    let text = std::fs::read_to_string(path)?;
    let loaded = load(&text)?;
    log::info!(
        "Loaded map {} ({}x{} tiles, {} chunks, {} regions)",
        path.display(),
        loaded.map.width(),
        loaded.map.height(),
        loaded.map.allocated_chunks(),
        loaded.map.all_regions().len()
    );
    Ok(loaded)
}

/// Build a [`WorldMap`] from an already-deserialized file.
pub fn from_file(file: MapFile) -> Result<LoadedMap, PersistError> {
    let mut warnings = compat::validate_header(&file)?;
    let mut map = WorldMap::new(file.map_width, file.map_height, file.chunk_size, file.tile_size);
    let bounds_chunks = IVec2::new(
        (file.map_width - 1).div_euclid(file.chunk_size),
        (file.map_height - 1).div_euclid(file.chunk_size),
    );

    for layer in &file.tile_layers {
        let decoded = decode_layer(layer, file.chunk_size, bounds_chunks, "tile", &mut warnings, |v| {
            u32::try_from(v).ok()
        })?;
        map.tile_layers.push(decoded);
    }

    for layer in &file.block_layers {
        let decoded = decode_layer(layer, file.chunk_size, bounds_chunks, "block", &mut warnings, |v| {
            u8::try_from(v).ok().and_then(BlockType::from_u8)
        })?;
        map.block_layers.push(decoded);
    }

    for (slot, layer) in file.item_layers.iter().enumerate() {
        let decoded = decode_layer(layer, file.chunk_size, bounds_chunks, "item", &mut warnings, |v| {
            u8::try_from(v).ok().and_then(ItemType::from_u8)
        })?;
        map.item_layers[slot] = decoded;
    }

    for region in file.regions {
        map.add_region(region)?;
    }

    let bounds = map.bounds();
    for item in file.placed_items {
        if !bounds.contains(IVec2::new(item.tile.x, item.tile.y)) {
            continue;
        }
        map.add_placed_item(PlacedItem {
            id: item.id,
            item: item.item_id,
            tile: IVec2::new(item.tile.x, item.tile.y),
            amount: item.amount,
            respawns: item.respawns,
            respawn_interval_secs: item.respawn_interval_seconds.max(0.0),
        });
    }

    for warning in &warnings {
        log::warn!("{warning}");
    }

    map.mark_clean();
    Ok(LoadedMap { map, warnings })
}

fn decode_layer<T: Cell>(
    layer: &LayerFile,
    chunk_size: i32,
    max_chunk: IVec2,
    kind: &'static str,
    warnings: &mut Vec<String>,
    decode: impl Fn(i64) -> Option<T>,
) -> Result<ChunkMap<T>, PersistError> {
    let mut out = ChunkMap::new(layer.name.clone(), chunk_size, layer.is_collision_layer);

    for (key, chunk_file) in &layer.chunks {
        let (cx, cy) = parse_chunk_key(key).ok_or_else(|| PersistError::InvalidChunkKey {
            layer: layer.name.clone(),
            key: key.clone(),
        })?;

        let shape_ok = chunk_file.values.len() == chunk_size as usize
            && chunk_file.values.iter().all(|row| row.len() == chunk_size as usize);
        if !shape_ok {
            return Err(PersistError::ChunkShape {
                layer: layer.name.clone(),
                key: key.clone(),
                expected: chunk_size,
            });
        }

        let mut cells = Vec::with_capacity((chunk_size * chunk_size) as usize);
        for &value in chunk_file.values.iter().flatten() {
            let cell = decode(value).ok_or_else(|| PersistError::InvalidCellValue {
                layer: layer.name.clone(),
                key: key.clone(),
                value,
                kind,
            })?;
            cells.push(cell);
        }

        if cx < 0 || cy < 0 || cx > max_chunk.x || cy > max_chunk.y {
            warnings.push(format!(
                "Layer '{}': chunk {key} lies outside the map and was dropped",
                layer.name
            ));
            continue;
        }

        // Shape was checked above, so this cannot fail.
        if let Some(chunk) = Chunk::from_cells(IVec2::new(cx, cy), chunk_size, cells) {
            if !chunk.is_blank() {
                out.insert_chunk(chunk);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save;
    use grovekeep_core::rect::TileRect;
    use grovekeep_world::map::ItemLayerKind;
    use grovekeep_world::{Region, RegionType};

    fn sample_map() -> WorldMap {
        let mut map = WorldMap::with_default_layers(64, 64, 32, 32);
        map.set_tile(3, 4, 7, 0);
        map.set_block(10, 10, BlockType::Wall, 0);
        map.set_block(40, 33, BlockType::Tree, 0);
        map.set_item(5, 5, ItemType::Mushroom, ItemLayerKind::Low);
        map.set_item(6, 5, ItemType::Torch, ItemLayerKind::High);
        map.add_region(
            Region::new("spawn", RegionType::PlayerSpawn, TileRect::new(2, 2, 3, 3))
                .with_meta("note", "start"),
        )
        .expect("region");
        map.add_region(
            Region::new("wolves", RegionType::EnemySpawn, TileRect::new(0, 0, 10, 10))
                .with_meta("maxEnemies", "5"),
        )
        .expect("region");
        map.add_placed_item(PlacedItem {
            id: "chest_apple".into(),
            item: ItemType::Apple,
            tile: IVec2::new(8, 9),
            amount: 3,
            respawns: true,
            respawn_interval_secs: 20.0,
        });
        map
    }

    #[test]
    fn test_save_load_preserves_content() {
        let map = sample_map();
        let json = save::save(&map).expect("save");
        let loaded = load(&json).expect("load").map;

        assert_eq!(loaded.width(), 64);
        assert_eq!(loaded.chunk_size(), 32);
        assert_eq!(loaded.get_tile(3, 4, 0), 7);
        assert_eq!(loaded.get_block(10, 10, 0), BlockType::Wall);
        assert_eq!(loaded.get_block(40, 33, 0), BlockType::Tree);
        assert_eq!(loaded.get_item(5, 5, ItemLayerKind::Low), ItemType::Mushroom);
        assert_eq!(loaded.get_item(6, 5, ItemLayerKind::High), ItemType::Torch);
        assert!(loaded.block_layers[0].is_collision);
        assert_eq!(loaded.allocated_chunks(), map.allocated_chunks());
        assert_eq!(loaded.all_regions(), map.all_regions());
        assert_eq!(loaded.placed_items(), map.placed_items());
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn test_load_handwritten_file() {
        let json = r#"{
            "mapWidth": 4, "mapHeight": 4, "chunkSize": 2, "tileSize": 16,
            "tileLayers": [{"name": "ground", "chunks": {"1,1": {"values": [[0, 5], [0, 0]]}}}],
            "blockLayers": [{"name": "walls", "isCollisionLayer": true,
                             "chunks": {"0,0": {"values": [[1, 0], [0, 4]]}}}],
            "itemLayers": [{"name": "low", "chunks": {}}, {"name": "high", "chunks": {}}],
            "regions": [{"id": "s", "type": "SafeZone", "area": {"x": 0, "y": 0, "width": 2, "height": 2}}]
        }"#;
        let loaded = load(json).expect("load");
        let map = loaded.map;
        assert_eq!(map.get_tile(3, 2, 0), 5);
        assert_eq!(map.get_block(0, 0, 0), BlockType::Wall);
        assert_eq!(map.get_block(1, 1, 0), BlockType::Rock);
        assert_eq!(map.region_by_id("s").map(|r| r.kind), Some(RegionType::SafeZone));
        assert_eq!(loaded.warnings.len(), 1, "no PlayerSpawn warning");
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(load("{ not json"), Err(PersistError::Json(_))));
        assert!(matches!(load(r#"{"mapWidth": 4}"#), Err(PersistError::Json(_))));
    }

    #[test]
    fn test_bad_chunk_key_rejected() {
        let json = r#"{"mapWidth": 4, "mapHeight": 4, "chunkSize": 2, "tileSize": 16,
            "tileLayers": [{"name": "g", "chunks": {"zero": {"values": [[0,0],[0,0]]}}}],
            "itemLayers": [{"name": "l"}, {"name": "h"}]}"#;
        assert!(matches!(load(json), Err(PersistError::InvalidChunkKey { .. })));
    }

    #[test]
    fn test_wrong_grid_shape_rejected() {
        let json = r#"{"mapWidth": 4, "mapHeight": 4, "chunkSize": 2, "tileSize": 16,
            "blockLayers": [{"name": "b", "chunks": {"0,0": {"values": [[0,0,0],[0,0]]}}}],
            "itemLayers": [{"name": "l"}, {"name": "h"}]}"#;
        assert!(matches!(load(json), Err(PersistError::ChunkShape { expected: 2, .. })));
    }

    #[test]
    fn test_unknown_block_value_rejected() {
        let json = r#"{"mapWidth": 4, "mapHeight": 4, "chunkSize": 2, "tileSize": 16,
            "blockLayers": [{"name": "b", "chunks": {"0,0": {"values": [[0,99],[0,0]]}}}],
            "itemLayers": [{"name": "l"}, {"name": "h"}]}"#;
        assert!(matches!(
            load(json),
            Err(PersistError::InvalidCellValue { value: 99, kind: "block", .. })
        ));
    }

    #[test]
    fn test_duplicate_player_spawn_rejected() {
        let json = r#"{"mapWidth": 8, "mapHeight": 8, "chunkSize": 4, "tileSize": 16,
            "itemLayers": [{"name": "l"}, {"name": "h"}],
            "regions": [
              {"id": "a", "type": "PlayerSpawn", "area": {"x": 0, "y": 0, "width": 1, "height": 1}},
              {"id": "b", "type": "PlayerSpawn", "area": {"x": 2, "y": 2, "width": 1, "height": 1}}
            ]}"#;
        assert!(matches!(load(json), Err(PersistError::Region(_))));
    }

    #[test]
    fn test_overflowing_region_is_an_error() {
        let json = r#"{"mapWidth": 8, "mapHeight": 8, "chunkSize": 4, "tileSize": 16,
            "itemLayers": [{"name": "l"}, {"name": "h"}],
            "regions": [
              {"id": "edge", "type": "SafeZone",
               "area": {"x": 2147483000, "y": 0, "width": 1000, "height": 1}}
            ]}"#;
        assert!(matches!(load(json), Err(PersistError::RegionOverflow(_))));
    }

    #[test]
    fn test_out_of_map_placed_items_dropped() {
        let json = r#"{"mapWidth": 8, "mapHeight": 8, "chunkSize": 4, "tileSize": 16,
            "itemLayers": [{"name": "l"}, {"name": "h"}],
            "placedItems": [
              {"id": "far", "itemId": "gold", "tile": {"x": 100000000, "y": 0}},
              {"id": "near", "itemId": "apple", "tile": {"x": 3, "y": 3}}
            ]}"#;
        let loaded = load(json).expect("load");
        let ids: Vec<_> = loaded.map.placed_items().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["near"]);
        assert!(loaded.warnings.iter().any(|w| w.contains("'far'")));
    }

    #[test]
    fn test_out_of_map_chunk_dropped_with_warning() {
        let json = r#"{"mapWidth": 4, "mapHeight": 4, "chunkSize": 2, "tileSize": 16,
            "tileLayers": [{"name": "g", "chunks": {"5,5": {"values": [[1,1],[1,1]]}}}],
            "itemLayers": [{"name": "l"}, {"name": "h"}]}"#;
        let loaded = load(json).expect("load");
        assert_eq!(loaded.map.allocated_chunks(), 0);
        assert!(loaded.warnings.iter().any(|w| w.contains("5,5")));
    }
}

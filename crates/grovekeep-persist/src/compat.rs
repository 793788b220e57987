use crate::error::PersistError;
use crate::format::{MapFile, FORMAT_VERSION};
use grovekeep_core::constants::ITEM_LAYER_COUNT;
use grovekeep_core::rect::TileRect;
use grovekeep_world::RegionType;

/// Validate the top-level shape of a map file and return any compatibility warnings.
///
/// Returns Ok(warnings) on success, Err on fatal errors.
/// Regions or placed items outside the map produce warnings, not errors.
pub fn validate_header(file: &MapFile) -> Result<Vec<String>, PersistError> {
    if file.version == 0 || file.version > FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(file.version));
    }

    if file.map_width <= 0 || file.map_height <= 0 || file.chunk_size <= 0 || file.tile_size <= 0
    {
        return Err(PersistError::InvalidDimensions {
            width: file.map_width,
            height: file.map_height,
            chunk_size: file.chunk_size,
            tile_size: file.tile_size,
        });
    }

    if file.item_layers.len() != ITEM_LAYER_COUNT {
        return Err(PersistError::ItemLayerCount(file.item_layers.len()));
    }

    let bounds = TileRect::new(0, 0, file.map_width, file.map_height);
    let mut warnings = Vec::new();

    for region in &file.regions {
        if region.area.right() > i32::MAX as i64 || region.area.bottom() > i32::MAX as i64 {
            return Err(PersistError::RegionOverflow(region.id.clone()));
        }
        if bounds.intersection(&region.area).area() != region.area.area() {
            warnings.push(format!(
                "Region '{}' extends past the {}x{} map bounds",
                region.id, file.map_width, file.map_height
            ));
        }
    }

    for item in &file.placed_items {
        if !bounds.contains(glam::IVec2::new(item.tile.x, item.tile.y)) {
            warnings.push(format!(
                "Placed item '{}' at ({}, {}) is outside the map and was dropped",
                item.id, item.tile.x, item.tile.y
            ));
        }
    }

    if !file.regions.iter().any(|r| r.kind == RegionType::PlayerSpawn) {
        warnings.push("Map has no PlayerSpawn region; the player starts at the map centre".into());
    }

    if !file.block_layers.iter().any(|l| l.is_collision_layer) {
        warnings.push("Map has no collision block layer".into());
    }

    Ok(warnings)
}

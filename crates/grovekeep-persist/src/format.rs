//! On-disk JSON schema. Field names follow the map file's camelCase keys.
//! Grids are nested row-major arrays since JSON has no 2D array type.

use grovekeep_world::Region;
use grovekeep_core::types::ItemType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current map format version. Files without a version are treated as version 1.
pub const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub map_width: i32,
    pub map_height: i32,
    pub chunk_size: i32,
    pub tile_size: i32,
    #[serde(default)]
    pub tile_layers: Vec<LayerFile>,
    #[serde(default)]
    pub block_layers: Vec<LayerFile>,
    #[serde(default)]
    pub item_layers: Vec<LayerFile>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub placed_items: Vec<PlacedItemFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerFile {
    pub name: String,
    #[serde(default)]
    pub is_collision_layer: bool,
    /// Keyed by "cx,cy".
    #[serde(default)]
    pub chunks: BTreeMap<String, ChunkFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkFile {
    pub values: Vec<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedItemFile {
    pub id: String,
    pub item_id: ItemType,
    pub tile: TilePos,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub respawns: bool,
    #[serde(default)]
    pub respawn_interval_seconds: f32,
}

fn default_amount() -> u32 {
    1
}

/// Format a chunk coordinate as a map-file key.
pub fn chunk_key(cx: i32, cy: i32) -> String {
    format!("{cx},{cy}")
}

/// Parse a "cx,cy" key. Whitespace around either number is tolerated.
pub fn parse_chunk_key(key: &str) -> Option<(i32, i32)> {
    let (x, y) = key.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

use grovekeep_core::rect::TileRect;
use grovekeep_core::types::TileCoord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Semantic tag of a region. The region model does not interpret it;
/// consuming systems decide what each type means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionType {
    PlayerSpawn,
    EnemySpawn,
    WoodSpawn,
    GoldSpawn,
    AppleSpawn,
    TreeSpawn,
    ItemSpawn,
    SafeZone,
    Biome,
}

/// Tagged rectangle in tile space with free-form string metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RegionType,
    pub area: TileRect,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Region {
    pub fn new(id: impl Into<String>, kind: RegionType, area: TileRect) -> Self {
        Self {
            id: id.into(),
            kind,
            area,
            meta: BTreeMap::new(),
        }
    }

    /// Builder-style metadata insert.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Parse a metadata value. Missing or unparsable values give None.
    pub fn meta_parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.meta(key).and_then(|v| v.trim().parse().ok())
    }

    /// Boolean metadata: "true"/"1"/"yes" and "false"/"0"/"no", case-insensitive.
    pub fn meta_flag(&self, key: &str) -> Option<bool> {
        match self.meta(key)?.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }

    pub fn contains_tile(&self, tile: TileCoord) -> bool {
        self.area.contains(tile)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    #[error("a PlayerSpawn region already exists ('{0}')")]
    DuplicatePlayerSpawn(String),

    #[error("region id '{0}' is already in use")]
    DuplicateId(String),

    #[error("region '{id}' has non-positive size {width}x{height}")]
    EmptyArea { id: String, width: i32, height: i32 },
}

/// Ordered list of regions with typed lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region, rejecting a second PlayerSpawn, a reused id, or an empty area.
    pub fn add(&mut self, region: Region) -> Result<(), RegionError> {
        if region.area.is_empty() {
            return Err(RegionError::EmptyArea {
                id: region.id,
                width: region.area.width,
                height: region.area.height,
            });
        }
        if self.by_id(&region.id).is_some() {
            return Err(RegionError::DuplicateId(region.id));
        }
        if region.kind == RegionType::PlayerSpawn {
            if let Some(existing) = self.of_type(RegionType::PlayerSpawn).next() {
                return Err(RegionError::DuplicatePlayerSpawn(existing.id.clone()));
            }
        }
        self.regions.push(region);
        Ok(())
    }

    /// Remove a region by id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Region> {
        let idx = self.regions.iter().position(|r| r.id == id)?;
        Some(self.regions.remove(idx))
    }

    pub fn of_type(&self, kind: RegionType) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.kind == kind)
    }

    pub fn by_id(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    /// Regions of the given type containing a tile.
    pub fn at(&self, tile: TileCoord, kind: RegionType) -> impl Iterator<Item = &Region> {
        self.of_type(kind).filter(move |r| r.contains_tile(tile))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

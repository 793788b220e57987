//! Spawn-placement capabilities: exclusion rectangles and biome lookup.

use grovekeep_core::rect::WorldRect;
use grovekeep_world::{RegionType, WorldMap};
use glam::Vec2;

/// Something that can forbid spawning inside rectangles.
pub trait ExclusionZoneProvider {
    fn exclusion_zones(&self) -> Vec<WorldRect>;

    fn is_excluded(&self, point: Vec2) -> bool {
        self.exclusion_zones().iter().any(|z| z.contains(point))
    }
}

/// Biome lookup for a world position.
pub trait BiomeClassifier {
    fn allows_spawn_at(&self, point: Vec2) -> bool;

    /// Biome name at a point, if any Biome region covers it.
    fn classify(&self, point: Vec2) -> Option<String>;
}

/// Zones derived from the map's regions. SafeZone regions exclude; Biome
/// regions classify by their `biome` meta (falling back to the region id)
/// and may forbid spawns with `allowSpawns=false`.
#[derive(Debug, Clone, Copy)]
pub struct RegionZones<'a> {
    map: &'a WorldMap,
}

impl<'a> RegionZones<'a> {
    pub fn new(map: &'a WorldMap) -> Self {
        Self { map }
    }
}

impl ExclusionZoneProvider for RegionZones<'_> {
    fn exclusion_zones(&self) -> Vec<WorldRect> {
        let ts = self.map.tile_size();
        self.map
            .regions()
            .of_type(RegionType::SafeZone)
            .map(|r| r.area.to_world(ts))
            .collect()
    }
}

impl BiomeClassifier for RegionZones<'_> {
    fn allows_spawn_at(&self, point: Vec2) -> bool {
        let tile = self.map.world_to_tile(point.x, point.y);
        if !self.map.in_bounds(tile.x, tile.y) || self.map.is_solid(tile.x, tile.y) {
            return false;
        }
        self.map
            .regions()
            .at(tile, RegionType::Biome)
            .all(|r| r.meta_flag("allowSpawns").unwrap_or(true))
    }

    fn classify(&self, point: Vec2) -> Option<String> {
        let tile = self.map.world_to_tile(point.x, point.y);
        self.map
            .regions()
            .at(tile, RegionType::Biome)
            .next()
            .map(|r| r.meta("biome").unwrap_or(r.id.as_str()).to_string())
    }
}

/// Fixed exclusion rectangles supplied by the embedding application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticZones {
    pub zones: Vec<WorldRect>,
}

impl ExclusionZoneProvider for StaticZones {
    fn exclusion_zones(&self) -> Vec<WorldRect> {
        self.zones.clone()
    }
}

use grovekeep_core::rect::TileRect;
use grovekeep_core::types::BlockType;
use grovekeep_world::{Region, RegionType, WorldMap};

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub width: i32,
    pub height: i32,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Open ground with one spawn region.
    Empty,
    /// Scattered trees, rocks and resource regions.
    Forest,
    /// Wall lattice with several spawn regions.
    Walls,
}

pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "empty",
            width: 128,
            height: 128,
            layout: Layout::Empty,
        },
        SceneConfig {
            name: "forest",
            width: 256,
            height: 256,
            layout: Layout::Forest,
        },
        SceneConfig {
            name: "walls",
            width: 256,
            height: 256,
            layout: Layout::Walls,
        },
    ]
}

/// Cheap deterministic per-tile hash in 0..100.
fn tile_hash(x: i32, y: i32) -> u32 {
    ((x as u32).wrapping_mul(31337) ^ (y as u32).wrapping_mul(7919)).wrapping_mul(2_654_435_761) % 100
}

/// Build the map for a scene. Regions always include a central PlayerSpawn.
pub fn build_map(config: &SceneConfig) -> WorldMap {
    let mut map = WorldMap::with_default_layers(config.width, config.height, 32, 32);
    let (w, h) = (config.width, config.height);
    let mut regions = vec![
        Region::new("player", RegionType::PlayerSpawn, TileRect::new(w / 2 - 1, h / 2 - 1, 2, 2)),
        Region::new("spawn_nw", RegionType::EnemySpawn, TileRect::new(4, 4, 16, 16))
            .with_meta("maxEnemies", "10"),
        Region::new("safe_center", RegionType::SafeZone, TileRect::new(w / 2 - 4, h / 2 - 4, 8, 8)),
    ];

    match config.layout {
        Layout::Empty => {}
        Layout::Forest => {
            for y in 0..h {
                for x in 0..w {
                    let block = match tile_hash(x, y) {
                        0..=7 => BlockType::Tree,
                        8..=9 => BlockType::Rock,
                        10 => BlockType::Crate,
                        _ => continue,
                    };
                    map.set_block(x, y, block, 0);
                }
            }
            regions.push(
                Region::new("grove", RegionType::TreeSpawn, TileRect::new(w / 2 + 8, h / 2, 24, 24))
                    .with_meta("intervalSeconds", "2")
                    .with_meta("maxTrees", "120"),
            );
            regions.push(
                Region::new("wood", RegionType::WoodSpawn, TileRect::new(w / 2 - 20, h / 2 - 20, 12, 12))
                    .with_meta("intervalSeconds", "1")
                    .with_meta("maxCount", "8"),
            );
            regions.push(
                Region::new("cave", RegionType::Biome, TileRect::new(0, 0, w / 4, h / 4))
                    .with_meta("biome", "cave"),
            );
        }
        Layout::Walls => {
            for y in (0..h).step_by(6) {
                for x in 0..w {
                    if tile_hash(x, y) >= 15 {
                        map.set_block(x, y, BlockType::Wall, 0);
                    }
                }
            }
            regions.push(
                Region::new("spawn_se", RegionType::EnemySpawn, TileRect::new(w - 20, h - 20, 16, 16))
                    .with_meta("maxEnemies", "25"),
            );
        }
    }

    // Keep the player's start clear.
    map.fill_blocks(TileRect::new(w / 2 - 3, h / 2 - 3, 6, 6), BlockType::Empty, 0);
    for region in regions {
        if let Err(e) = map.add_region(region) {
            log::warn!("bench scene '{}': {e}", config.name);
        }
    }
    map.mark_clean();
    map
}

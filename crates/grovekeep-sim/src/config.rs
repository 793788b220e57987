//! Tuning values for a play session, loaded from RON.

use grovekeep_core::constants::{DEFAULT_SPAWN_ATTEMPTS, DEFAULT_STREAM_BUFFER_CHUNKS};
use grovekeep_core::types::BlockType;
use grovekeep_world::VariantCatalog;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config RON: {0}")]
    Parse(String),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Whole chunks streamed beyond the visible area on each side.
    pub buffer_chunks: i32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            buffer_chunks: DEFAULT_STREAM_BUFFER_CHUNKS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySpawnConfig {
    pub base_interval_secs: f32,
    /// Cap used when no EnemySpawn region declares `maxEnemies`.
    pub default_max_enemies: u32,
    pub attempts: u32,
    /// Interval multiplier while the player stands in an accelerated biome.
    pub accelerated_interval_factor: f32,
    pub accelerated_cap_bonus: u32,
    /// Biome names that speed up spawning.
    pub accelerated_biomes: Vec<String>,
}

impl Default for EnemySpawnConfig {
    fn default() -> Self {
        Self {
            base_interval_secs: 4.0,
            default_max_enemies: 5,
            attempts: DEFAULT_SPAWN_ATTEMPTS,
            accelerated_interval_factor: 0.5,
            accelerated_cap_bonus: 3,
            accelerated_biomes: vec!["cave".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Seconds for the curve to reach double strength.
    pub ramp_secs: f32,
    pub min_interval_factor: f32,
    pub max_strength: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            ramp_secs: 120.0,
            min_interval_factor: 0.25,
            max_strength: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSpawnConfig {
    pub default_interval_secs: f32,
    /// Live pickups (or planted trees) per region when meta gives no limit.
    pub default_max: u32,
    pub attempts: u32,
}

impl Default for ResourceSpawnConfig {
    fn default() -> Self {
        Self {
            default_interval_secs: 15.0,
            default_max: 3,
            attempts: DEFAULT_SPAWN_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub speed: f32,
    pub half_extent: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_cooldown_secs: f32,
    /// Distance at which pickups are collected.
    pub pickup_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 160.0,
            half_extent: 12.0,
            attack_damage: 25.0,
            attack_range: 48.0,
            attack_cooldown_secs: 0.4,
            pickup_radius: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: f32,
    pub speed: f32,
    pub half_extent: f32,
    pub contact_damage: f32,
    pub contact_cooldown_secs: f32,
    pub aggro_radius: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 40.0,
            speed: 90.0,
            half_extent: 12.0,
            contact_damage: 10.0,
            contact_cooldown_secs: 1.0,
            aggro_radius: 320.0,
        }
    }
}

/// Hit points of breakable blocks. Walls are indestructible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub crate_health: f32,
    pub tree_health: f32,
    pub rock_health: f32,
    pub gold_ore_health: f32,
    pub drop_amount: u32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            crate_health: 30.0,
            tree_health: 50.0,
            rock_health: 80.0,
            gold_ore_health: 120.0,
            drop_amount: 1,
        }
    }
}

impl BlockConfig {
    /// None for block types that cannot be broken.
    pub fn health_of(&self, block: BlockType) -> Option<f32> {
        match block {
            BlockType::Crate => Some(self.crate_health),
            BlockType::Tree => Some(self.tree_health),
            BlockType::Rock => Some(self.rock_health),
            BlockType::GoldOre => Some(self.gold_ore_health),
            BlockType::Empty | BlockType::Wall => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantsConfig {
    pub blocks: VariantCatalog,
    pub tiles: VariantCatalog,
}

impl Default for VariantsConfig {
    fn default() -> Self {
        let mut blocks = VariantCatalog::new();
        blocks.register(BlockType::Wall.as_u8() as u32, 2, false);
        blocks.register(BlockType::Tree.as_u8() as u32, 3, false);
        blocks.register(BlockType::Rock.as_u8() as u32, 4, true);
        let mut tiles = VariantCatalog::new();
        tiles.register(1, 4, true);
        Self { blocks, tiles }
    }
}

/// Everything a [`Session`](crate::Session) needs besides the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub streaming: StreamingConfig,
    pub enemy_spawn: EnemySpawnConfig,
    pub difficulty: DifficultyConfig,
    pub resource_spawn: ResourceSpawnConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub blocks: BlockConfig,
    pub variants: VariantsConfig,
}

impl SimConfig {
    /// Parse and validate RON text. Missing sections take their defaults.
    pub fn from_ron(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: SimConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.streaming.buffer_chunks < 0 {
            return Err(invalid("streaming.buffer_chunks", "must not be negative"));
        }
        positive("enemy_spawn.base_interval_secs", self.enemy_spawn.base_interval_secs)?;
        if self.enemy_spawn.attempts == 0 {
            return Err(invalid("enemy_spawn.attempts", "must be at least 1"));
        }
        let factor = self.enemy_spawn.accelerated_interval_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(invalid(
                "enemy_spawn.accelerated_interval_factor",
                format!("{factor} is outside (0, 1]"),
            ));
        }
        positive("difficulty.ramp_secs", self.difficulty.ramp_secs)?;
        let min = self.difficulty.min_interval_factor;
        if !(min > 0.0 && min <= 1.0) {
            return Err(invalid(
                "difficulty.min_interval_factor",
                format!("{min} is outside (0, 1]"),
            ));
        }
        if self.difficulty.max_strength < 1.0 {
            return Err(invalid("difficulty.max_strength", "must be at least 1"));
        }
        positive(
            "resource_spawn.default_interval_secs",
            self.resource_spawn.default_interval_secs,
        )?;
        if self.resource_spawn.attempts == 0 {
            return Err(invalid("resource_spawn.attempts", "must be at least 1"));
        }
        positive("player.max_health", self.player.max_health)?;
        positive("enemy.max_health", self.enemy.max_health)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be positive")))
    }
}

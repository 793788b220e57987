//! Monotonic difficulty curve over elapsed session time.

use crate::config::DifficultyConfig;

/// Multiplier applied to the spawn interval. Starts at 1 and falls toward
/// `min_interval_factor` as the session goes on.
pub fn interval_factor(config: &DifficultyConfig, elapsed_secs: f32) -> f32 {
    let t = elapsed_secs.max(0.0) / config.ramp_secs;
    (1.0 / (1.0 + t)).max(config.min_interval_factor)
}

/// Health and damage multiplier for newly spawned enemies. Starts at 1 and
/// rises linearly to `max_strength`.
pub fn strength(config: &DifficultyConfig, elapsed_secs: f32) -> f32 {
    let t = elapsed_secs.max(0.0) / config.ramp_secs;
    (1.0 + t).min(config.max_strength)
}

//! Frame-stepped simulation: entity-component scheduler, built-in systems,
//! block streaming and region-governed spawning.

pub mod camera;
pub mod components;
pub mod config;
pub mod difficulty;
pub mod entity;
pub mod factory;
pub mod input;
pub mod session;
pub mod system;
pub mod systems;
pub mod world;
pub mod zones;

mod test_harness;

pub use camera::Camera;
pub use components::{Component, ComponentKind};
pub use config::{ConfigError, SimConfig};
pub use entity::Entity;
pub use factory::{EntityFactory, StandardFactory};
pub use input::{GameState, Intents};
pub use session::Session;
pub use system::System;
pub use systems::{BlockKey, BlockStreamer, StreamStats, StreamedBlocks};
pub use world::{Resources, World};
pub use zones::{BiomeClassifier, ExclusionZoneProvider, RegionZones, StaticZones};

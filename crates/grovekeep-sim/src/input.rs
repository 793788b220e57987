use glam::Vec2;

/// Abstract player intents for the current frame, produced by the embedding
/// application's input layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intents {
    /// Desired movement direction; normalised by the input system.
    pub move_dir: Vec2,
    pub attack: bool,
}

/// Polled once per frame by the owning controller instead of a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Playing,
    GameOver,
}

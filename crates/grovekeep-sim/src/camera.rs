use grovekeep_core::rect::WorldRect;
use glam::Vec2;

/// What the player sees. The streamer and renderer both derive their working
/// area from [`Camera::visible_rect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    /// Visible area size in world units.
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            viewport: Vec2::new(1280.0, 720.0),
        }
    }
}

impl Camera {
    pub fn new(center: Vec2, viewport: Vec2) -> Self {
        Self { center, viewport }
    }

    pub fn visible_rect(&self) -> WorldRect {
        WorldRect::from_center(self.center, self.viewport)
    }

    /// Centre the camera on `target`, keeping the view inside `bounds` when
    /// the bounds are larger than the viewport.
    pub fn follow(&mut self, target: Vec2, bounds: WorldRect) {
        let half = self.viewport * 0.5;
        let lo = bounds.min + half;
        let hi = bounds.max() - half;
        self.center = Vec2::new(
            if lo.x <= hi.x { target.x.clamp(lo.x, hi.x) } else { bounds.center().x },
            if lo.y <= hi.y { target.y.clamp(lo.y, hi.y) } else { bounds.center().y },
        );
    }
}

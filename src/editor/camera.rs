//! Coordinate transformation utilities for the graph canvas.
//!
//! Handles conversions between graph coordinates and screen coordinates,
//! accounting for pan and zoom. The canvas uses a translate-then-scale
//! transform: a point is first shifted by the pan offset (in graph units),
//! then multiplied by the zoom scale.

use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum zoom scale of the canvas.
pub const MIN_SCALE: f32 = 0.1;
/// Maximum zoom scale of the canvas.
pub const MAX_SCALE: f32 = 2.0;

/// Pan/zoom transform of the graph canvas.
///
/// `offset` is expressed in graph units; `scale` is the uniform zoom
/// factor applied after translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Camera {
    /// Convert graph coordinates to screen coordinates.
    pub fn to_screen(&self, pos: Pos2) -> Pos2 {
        ((pos.to_vec2() + self.offset) * self.scale).to_pos2()
    }

    /// Convert screen coordinates to graph coordinates.
    pub fn from_screen(&self, screen_pos: Pos2) -> Pos2 {
        (screen_pos.to_vec2() / self.scale - self.offset).to_pos2()
    }

    /// Project a graph-space rectangle into screen space.
    pub fn project_rect(&self, rect: Rect) -> Rect {
        Rect::from_min_size(self.to_screen(rect.min), rect.size() * self.scale)
    }

    /// Pan the camera by a screen-space delta (e.g. a pointer drag).
    pub fn pan_by_screen(&mut self, delta: Vec2) {
        self.offset += delta / self.scale;
    }

    /// Multiply the zoom scale while keeping the graph point under
    /// `screen_anchor` stationary on screen.
    pub fn zoom_about(&mut self, screen_anchor: Pos2, factor: f32) {
        let graph_anchor = self.from_screen(screen_anchor);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = screen_anchor.to_vec2() / self.scale - graph_anchor.to_vec2();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_round_trip() {
        let camera = Camera {
            scale: 0.7,
            offset: Vec2::new(-120.0, 45.0),
        };
        let pos = Pos2::new(33.0, -7.5);
        let back = camera.from_screen(camera.to_screen(pos));
        assert!((back.x - pos.x).abs() < 1e-3);
        assert!((back.y - pos.y).abs() < 1e-3);
    }

    #[test]
    fn zoom_about_keeps_anchor_fixed() {
        let mut camera = Camera {
            scale: 1.0,
            offset: Vec2::new(50.0, 20.0),
        };
        let anchor = Pos2::new(300.0, 200.0);
        let graph_before = camera.from_screen(anchor);
        camera.zoom_about(anchor, 1.5);
        let graph_after = camera.from_screen(anchor);
        assert!((graph_before.x - graph_after.x).abs() < 1e-2);
        assert!((graph_before.y - graph_after.y).abs() < 1e-2);
    }

    #[test]
    fn zoom_clamps_to_scale_range() {
        let mut camera = Camera::default();
        camera.zoom_about(Pos2::ZERO, 100.0);
        assert_eq!(camera.scale, MAX_SCALE);
        camera.zoom_about(Pos2::ZERO, 0.0001);
        assert_eq!(camera.scale, MIN_SCALE);
    }
}

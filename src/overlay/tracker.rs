//! Screen-space synchronization for floating panels.
//!
//! Each frame a panel's screen rectangle is recomputed from the node's
//! graph-space geometry, the current camera, and the viewport size.
//! The result carries no persisted identity: same inputs, same rectangle.
//! Anything malformed (detached node, non-finite geometry, degenerate
//! camera) resolves to a hidden rectangle rather than an error.

use crate::editor::camera::Camera;
use egui::{Pos2, Rect, Vec2};

/// Height of a node's title strip in graph units. Panels anchored below
/// a node start underneath this strip.
pub const NODE_HEADER_HEIGHT: f32 = 30.0;

/// Horizontal gap between a node and a panel anchored beside it.
pub const BESIDE_GAP: f32 = 10.0;
/// Fixed graph-space width of a panel anchored beside a node.
pub const BESIDE_WIDTH: f32 = 500.0;
/// Minimum graph-space height of a panel anchored beside a node.
pub const BESIDE_MIN_HEIGHT: f32 = 80.0;

/// Graph-space position and size of the node a panel is tracking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
    pub pos: Pos2,
    pub size: Vec2,
    pub collapsed: bool,
}

/// Rule mapping a node's geometry to the panel's graph-space rectangle,
/// applied before camera projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnchorPolicy {
    /// Cover the node body below its title strip.
    Below { header_height: f32 },
    /// Sit to the right of the node with a fixed gap and width.
    Beside {
        gap: f32,
        width: f32,
        min_height: f32,
    },
}

impl AnchorPolicy {
    pub fn below() -> Self {
        Self::Below {
            header_height: NODE_HEADER_HEIGHT,
        }
    }

    pub fn beside() -> Self {
        Self::Beside {
            gap: BESIDE_GAP,
            width: BESIDE_WIDTH,
            min_height: BESIDE_MIN_HEIGHT,
        }
    }

    /// The panel's graph-space rectangle for a node's geometry.
    pub fn anchor_rect(&self, geometry: &NodeGeometry) -> Rect {
        match *self {
            Self::Below { header_height } => Rect::from_min_size(
                Pos2::new(geometry.pos.x, geometry.pos.y + header_height),
                Vec2::new(geometry.size.x, (geometry.size.y - header_height).max(0.0)),
            ),
            Self::Beside {
                gap,
                width,
                min_height,
            } => Rect::from_min_size(
                Pos2::new(geometry.pos.x + geometry.size.x + gap, geometry.pos.y),
                Vec2::new(width, geometry.size.y.max(min_height)),
            ),
        }
    }
}

/// Screen-space placement of a panel, derived once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayRect {
    pub rect: Rect,
    pub visible: bool,
}

impl OverlayRect {
    pub const HIDDEN: Self = Self {
        rect: Rect::ZERO,
        visible: false,
    };
}

/// Project a tracked node into viewport pixel coordinates.
///
/// `geometry` is `None` when the node is no longer attached to a live
/// graph. The viewport rectangle is `[0, 0, viewport.x, viewport.y]` in
/// the same coordinate space as the camera's screen output.
///
/// Hidden when:
/// - the node is detached or collapsed,
/// - any camera/geometry field is non-finite, or the scale is not
///   strictly positive,
/// - the projected rectangle lies entirely outside the viewport
///   (four-sided separating-axis test).
pub fn track(
    camera: &Camera,
    geometry: Option<NodeGeometry>,
    anchor: AnchorPolicy,
    viewport: Vec2,
) -> OverlayRect {
    let Some(geometry) = geometry else {
        return OverlayRect::HIDDEN;
    };
    if geometry.collapsed {
        return OverlayRect::HIDDEN;
    }
    if !camera.scale.is_finite()
        || camera.scale <= 0.0
        || !camera.offset.is_finite()
        || !geometry.pos.is_finite()
        || !geometry.size.is_finite()
    {
        return OverlayRect::HIDDEN;
    }

    let rect = camera.project_rect(anchor.anchor_rect(&geometry));

    let off_screen = rect.min.x > viewport.x
        || rect.min.y > viewport.y
        || rect.max.x < 0.0
        || rect.max.y < 0.0;

    OverlayRect {
        rect,
        visible: !off_screen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(scale: f32, offset: (f32, f32)) -> Camera {
        Camera {
            scale,
            offset: Vec2::new(offset.0, offset.1),
        }
    }

    fn geometry(pos: (f32, f32), size: (f32, f32)) -> NodeGeometry {
        NodeGeometry {
            pos: Pos2::new(pos.0, pos.1),
            size: Vec2::new(size.0, size.1),
            collapsed: false,
        }
    }

    const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

    #[test]
    fn projection_is_affine_for_below_anchor() {
        let result = track(
            &camera(2.0, (10.0, 20.0)),
            Some(geometry((5.0, 5.0), (100.0, 50.0))),
            AnchorPolicy::Below {
                header_height: 30.0,
            },
            VIEWPORT,
        );
        assert!(result.visible);
        assert_eq!(result.rect.min, Pos2::new(30.0, 110.0));
        assert_eq!(result.rect.width(), 200.0);
        assert_eq!(result.rect.height(), 40.0);
    }

    #[test]
    fn beside_anchor_applies_gap_width_and_min_height() {
        let result = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((100.0, 40.0), (180.0, 30.0))),
            AnchorPolicy::beside(),
            VIEWPORT,
        );
        assert!(result.visible);
        // x = 100 + 180 + gap, width fixed, height clamped up to the minimum.
        assert_eq!(result.rect.min, Pos2::new(290.0, 40.0));
        assert_eq!(result.rect.width(), BESIDE_WIDTH);
        assert_eq!(result.rect.height(), BESIDE_MIN_HEIGHT);
    }

    #[test]
    fn beside_anchor_follows_tall_nodes() {
        let result = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((0.0, 0.0), (180.0, 400.0))),
            AnchorPolicy::beside(),
            VIEWPORT,
        );
        assert_eq!(result.rect.height(), 400.0);
    }

    #[test]
    fn collapsed_node_is_hidden_regardless_of_geometry() {
        let mut geo = geometry((5.0, 5.0), (100.0, 50.0));
        geo.collapsed = true;
        let result = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geo),
            AnchorPolicy::below(),
            VIEWPORT,
        );
        assert!(!result.visible);
    }

    #[test]
    fn detached_node_is_hidden() {
        let result = track(&camera(1.0, (0.0, 0.0)), None, AnchorPolicy::below(), VIEWPORT);
        assert_eq!(result, OverlayRect::HIDDEN);
    }

    #[test]
    fn hidden_when_entirely_off_each_side() {
        let anchor = AnchorPolicy::Below {
            header_height: 30.0,
        };
        let size = (100.0, 100.0);

        // Past the right edge.
        let r = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((2000.0, 100.0), size)),
            anchor,
            VIEWPORT,
        );
        assert!(!r.visible);

        // Past the bottom edge.
        let r = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((100.0, 2000.0), size)),
            anchor,
            VIEWPORT,
        );
        assert!(!r.visible);

        // Past the left edge (right edge of the rect < 0).
        let r = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((-500.0, 100.0), size)),
            anchor,
            VIEWPORT,
        );
        assert!(!r.visible);

        // Past the top edge.
        let r = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((100.0, -500.0), size)),
            anchor,
            VIEWPORT,
        );
        assert!(!r.visible);
    }

    #[test]
    fn partially_visible_rect_stays_visible() {
        // Straddles the left edge: right half still inside the viewport.
        let r = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((-50.0, 100.0), (100.0, 100.0))),
            AnchorPolicy::below(),
            VIEWPORT,
        );
        assert!(r.visible);
    }

    #[test]
    fn malformed_inputs_fail_safe_to_hidden() {
        let geo = geometry((5.0, 5.0), (100.0, 50.0));

        let r = track(&camera(0.0, (0.0, 0.0)), Some(geo), AnchorPolicy::below(), VIEWPORT);
        assert!(!r.visible);

        let r = track(
            &camera(f32::NAN, (0.0, 0.0)),
            Some(geo),
            AnchorPolicy::below(),
            VIEWPORT,
        );
        assert!(!r.visible);

        let r = track(
            &camera(1.0, (f32::INFINITY, 0.0)),
            Some(geo),
            AnchorPolicy::below(),
            VIEWPORT,
        );
        assert!(!r.visible);

        let r = track(
            &camera(1.0, (0.0, 0.0)),
            Some(geometry((f32::NAN, 5.0), (100.0, 50.0))),
            AnchorPolicy::below(),
            VIEWPORT,
        );
        assert!(!r.visible);
    }

    #[test]
    fn tracking_is_idempotent() {
        let cam = camera(1.3, (42.0, -17.0));
        let geo = Some(geometry((12.0, 34.0), (220.0, 140.0)));
        let first = track(&cam, geo, AnchorPolicy::beside(), VIEWPORT);
        let second = track(&cam, geo, AnchorPolicy::beside(), VIEWPORT);
        assert_eq!(first, second);
    }
}

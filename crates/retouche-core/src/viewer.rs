//! Wheel-zoom / drag-pan state machine for the result viewers.

use crate::geometry::anchored_translate;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum zoom: the image exactly fills its box.
pub const MIN_SCALE: f64 = 1.0;
/// Maximum zoom.
pub const MAX_SCALE: f64 = 10.0;
/// Scale change per wheel notch.
pub const ZOOM_INTENSITY: f64 = 0.1;

/// The view transform applied to the displayed image.
///
/// `scale == 1` always implies a zero translate: the image fills its box
/// with no headroom to pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: MIN_SCALE,
            translate: Vec2::ZERO,
        }
    }
}

/// Interactive scale/translate controller for one mounted viewer.
///
/// State machine: idle -> dragging -> idle, entered only while zoomed in;
/// the scale ranges over `[MIN_SCALE, MAX_SCALE]` in either state.
#[derive(Debug, Clone, Default)]
pub struct ZoomPan {
    transform: ViewTransform,
    /// Drag anchor: `pointer - translate` captured at pointer-down.
    drag_anchor: Option<Vec2>,
}

impl ZoomPan {
    /// Create a controller at rest (scale 1, no translate).
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view transform.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Current scale factor.
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Current translate in viewer pixels.
    pub fn translate(&self) -> Vec2 {
        self.transform.translate
    }

    /// True while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// True when the viewer is zoomed in (the reset affordance is shown).
    pub fn is_zoomed(&self) -> bool {
        self.transform.scale > MIN_SCALE
    }

    /// Apply one wheel step anchored at `cursor` (viewer-local position).
    /// Positive `delta` zooms in. A step that clamps to the current scale
    /// is a no-op.
    pub fn handle_wheel(&mut self, cursor: Point, delta: f64) {
        let factor = if delta > 0.0 {
            1.0 + ZOOM_INTENSITY
        } else {
            1.0 - ZOOM_INTENSITY
        };
        let new_scale = (self.transform.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.transform.scale).abs() < f64::EPSILON {
            return;
        }

        if new_scale <= MIN_SCALE {
            // Fully zoomed out: snap home so the transform invariant holds.
            self.transform = ViewTransform::default();
            return;
        }

        self.transform.translate = anchored_translate(
            cursor,
            self.transform.translate,
            self.transform.scale,
            new_scale,
        );
        self.transform.scale = new_scale;
    }

    /// Begin a drag. Ignored at scale 1 (nothing to pan).
    pub fn pointer_down(&mut self, pointer: Point) {
        if self.is_zoomed() {
            self.drag_anchor = Some(pointer.to_vec2() - self.transform.translate);
        }
    }

    /// Continue a drag; no-op unless one is in progress.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let Some(anchor) = self.drag_anchor {
            self.transform.translate = pointer.to_vec2() - anchor;
        }
    }

    /// End a drag (pointer-up or pointer-leave).
    pub fn pointer_up(&mut self) {
        self.drag_anchor = None;
    }

    /// Snap back to scale 1 with zero translate, from any state.
    pub fn reset(&mut self) {
        self.transform = ViewTransform::default();
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Image-space point currently under `cursor`.
    fn point_under_cursor(zoom: &ZoomPan, cursor: Point) -> Point {
        let t = zoom.transform();
        Point::new(
            (cursor.x - t.translate.x) / t.scale,
            (cursor.y - t.translate.y) / t.scale,
        )
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_point_stationary() {
        let mut zoom = ZoomPan::new();
        let cursor = Point::new(220.0, 140.0);

        // Arbitrary in/out sequence, always anchored at the same cursor.
        zoom.handle_wheel(cursor, 1.0);
        let anchor = point_under_cursor(&zoom, cursor);
        for delta in [1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0] {
            let before = point_under_cursor(&zoom, cursor);
            let scale_before = zoom.scale();
            zoom.handle_wheel(cursor, delta);
            if (zoom.scale() - scale_before).abs() > f64::EPSILON {
                let after = point_under_cursor(&zoom, cursor);
                assert!((after.x - before.x).abs() < 1e-9);
                assert!((after.y - before.y).abs() < 1e-9);
            }
        }
        let final_point = point_under_cursor(&zoom, cursor);
        assert!((final_point.x - anchor.x).abs() < 1e-9);
        assert!((final_point.y - anchor.y).abs() < 1e-9);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut zoom = ZoomPan::new();
        let cursor = Point::new(100.0, 100.0);

        for _ in 0..200 {
            zoom.handle_wheel(cursor, 1.0);
        }
        assert!(zoom.scale() <= MAX_SCALE + f64::EPSILON);

        for _ in 0..500 {
            zoom.handle_wheel(cursor, -1.0);
        }
        assert!(zoom.scale() >= MIN_SCALE - f64::EPSILON);
    }

    #[test]
    fn test_zoom_out_to_rest_snaps_translate_home() {
        let mut zoom = ZoomPan::new();
        let cursor = Point::new(333.0, 77.0);

        zoom.handle_wheel(cursor, 1.0);
        zoom.handle_wheel(cursor, 1.0);
        assert!(zoom.is_zoomed());

        for _ in 0..50 {
            zoom.handle_wheel(Point::new(10.0, 10.0), -1.0);
        }
        assert!((zoom.scale() - MIN_SCALE).abs() < f64::EPSILON);
        assert_eq!(zoom.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_drag_at_rest_has_no_effect() {
        let mut zoom = ZoomPan::new();

        zoom.pointer_down(Point::new(50.0, 50.0));
        assert!(!zoom.is_dragging());
        zoom.pointer_move(Point::new(150.0, 150.0));
        assert_eq!(zoom.translate(), Vec2::ZERO);
    }

    #[test]
    fn test_drag_pans_while_zoomed() {
        let mut zoom = ZoomPan::new();
        zoom.handle_wheel(Point::new(100.0, 100.0), 1.0);
        let start_translate = zoom.translate();

        zoom.pointer_down(Point::new(50.0, 50.0));
        assert!(zoom.is_dragging());
        zoom.pointer_move(Point::new(80.0, 40.0));
        let moved = zoom.translate() - start_translate;
        assert!((moved.x - 30.0).abs() < 1e-9);
        assert!((moved.y - -10.0).abs() < 1e-9);

        zoom.pointer_up();
        assert!(!zoom.is_dragging());
        // Moves after release do nothing.
        zoom.pointer_move(Point::new(500.0, 500.0));
        let after = zoom.translate() - start_translate;
        assert!((after.x - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut zoom = ZoomPan::new();
        zoom.handle_wheel(Point::new(200.0, 120.0), 1.0);
        zoom.handle_wheel(Point::new(40.0, 300.0), 1.0);
        zoom.pointer_down(Point::new(60.0, 60.0));
        zoom.pointer_move(Point::new(90.0, 10.0));

        zoom.reset();
        assert!((zoom.scale() - MIN_SCALE).abs() < f64::EPSILON);
        assert_eq!(zoom.translate(), Vec2::ZERO);
        assert!(!zoom.is_dragging());
    }

    #[test]
    fn test_wheel_noop_at_max_scale_leaves_translate_alone() {
        let mut zoom = ZoomPan::new();
        let cursor = Point::new(100.0, 100.0);
        for _ in 0..100 {
            zoom.handle_wheel(cursor, 1.0);
        }
        let translate = zoom.translate();
        zoom.handle_wheel(cursor, 1.0);
        assert_eq!(zoom.translate(), translate);
    }
}

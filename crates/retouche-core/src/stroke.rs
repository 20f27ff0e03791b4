//! Freehand stroke capture and application.
//!
//! A stroke exists only between pointer-down and pointer-up; every point is
//! consumed immediately into [`PaintSurface`] pixel mutations, in the exact
//! order the pointer events arrive.

use crate::surface::PaintSurface;
use kurbo::Point;

/// Smallest usable brush diameter in surface pixels.
pub const MIN_BRUSH_WIDTH: f64 = 5.0;
/// Largest usable brush diameter in surface pixels.
pub const MAX_BRUSH_WIDTH: f64 = 100.0;

/// Brush compositing mode.
///
/// `Paint` adds coverage by source-over blending the highlight color;
/// `Erase` removes coverage with destination-out compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMode {
    #[default]
    Paint,
    Erase,
}

/// State of a stroke interaction.
#[derive(Debug, Clone, Default)]
enum StrokeState {
    /// No stroke is open; extend calls are ignored.
    #[default]
    Idle,
    /// A stroke is open between pointer-down and pointer-up.
    Active {
        mode: BrushMode,
        width: f64,
        last: Point,
    },
}

/// Open/closed stroke state machine.
///
/// Invariant: the mode and width of an open stroke never change; the UI
/// only switches tools while no stroke is open, so `begin_stroke` during an
/// active stroke is not a supported transition.
#[derive(Debug, Clone, Default)]
pub struct StrokeEngine {
    state: StrokeState,
}

impl StrokeEngine {
    /// Create an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a stroke is open.
    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Open a stroke and immediately paint a zero-length dot at `start`,
    /// so a single click is visible without any pointer movement.
    ///
    /// `width` is clamped to [`MIN_BRUSH_WIDTH`]..=[`MAX_BRUSH_WIDTH`]
    /// before use.
    pub fn begin_stroke(
        &mut self,
        surface: &mut PaintSurface,
        mode: BrushMode,
        width: f64,
        start: Point,
    ) {
        let width = width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
        apply_segment(surface, mode, width, start, start);
        self.state = StrokeState::Active {
            mode,
            width,
            last: start,
        };
    }

    /// Append a point, painting the straight segment from the previous
    /// point. No-op when no stroke is open.
    pub fn extend_stroke(&mut self, surface: &mut PaintSurface, point: Point) {
        if let StrokeState::Active { mode, width, last } = &mut self.state {
            apply_segment(surface, *mode, *width, *last, point);
            *last = point;
        }
    }

    /// Close the stroke; subsequent extend calls are no-ops until the next
    /// `begin_stroke`.
    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
    }
}

fn apply_segment(surface: &mut PaintSurface, mode: BrushMode, width: f64, from: Point, to: Point) {
    match mode {
        BrushMode::Paint => surface.paint_capsule(from, to, width),
        BrushMode::Erase => surface.erase_capsule(from, to, width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_paints_dot_of_brush_diameter() {
        let mut surface = PaintSurface::new(200, 200);
        let mut engine = StrokeEngine::new();

        engine.begin_stroke(&mut surface, BrushMode::Paint, 40.0, Point::new(100.0, 100.0));
        engine.end_stroke();

        assert!(surface.alpha_at(100, 100) > 0);
        assert!(surface.alpha_at(118, 100) > 0);
        assert_eq!(surface.alpha_at(123, 100), 0);
    }

    #[test]
    fn test_extend_without_begin_is_noop() {
        let mut surface = PaintSurface::new(100, 100);
        let mut engine = StrokeEngine::new();

        engine.extend_stroke(&mut surface, Point::new(50.0, 50.0));
        assert_eq!(surface.alpha_at(50, 50), 0);
    }

    #[test]
    fn test_extend_after_end_is_noop() {
        let mut surface = PaintSurface::new(100, 100);
        let mut engine = StrokeEngine::new();

        engine.begin_stroke(&mut surface, BrushMode::Paint, 10.0, Point::new(20.0, 20.0));
        engine.end_stroke();
        engine.extend_stroke(&mut surface, Point::new(80.0, 80.0));

        assert_eq!(surface.alpha_at(80, 80), 0);
        assert!(!engine.is_active());
    }

    #[test]
    fn test_stroke_covers_path_between_points() {
        let mut surface = PaintSurface::new(300, 300);
        let mut engine = StrokeEngine::new();

        engine.begin_stroke(&mut surface, BrushMode::Paint, 12.0, Point::new(30.0, 30.0));
        engine.extend_stroke(&mut surface, Point::new(150.0, 90.0));
        engine.extend_stroke(&mut surface, Point::new(270.0, 260.0));
        engine.end_stroke();

        // Midpoints of both segments are covered.
        assert!(surface.alpha_at(90, 60) > 0);
        assert!(surface.alpha_at(210, 175) > 0);
        // Far from the path stays clear.
        assert_eq!(surface.alpha_at(270, 30), 0);
    }

    #[test]
    fn test_erase_stroke_clears_painted_region() {
        let mut surface = PaintSurface::new(120, 120);
        let mut engine = StrokeEngine::new();

        engine.begin_stroke(&mut surface, BrushMode::Paint, 100.0, Point::new(60.0, 60.0));
        engine.end_stroke();
        assert!(surface.alpha_at(60, 60) > 0);

        engine.begin_stroke(&mut surface, BrushMode::Erase, 30.0, Point::new(30.0, 60.0));
        engine.extend_stroke(&mut surface, Point::new(90.0, 60.0));
        engine.end_stroke();

        for x in 35..=85 {
            assert_eq!(surface.alpha_at(x, 60), 0, "coverage left at x={x}");
        }
    }

    #[test]
    fn test_width_is_clamped_to_sane_range() {
        let mut surface = PaintSurface::new(400, 400);
        let mut engine = StrokeEngine::new();

        // Far over the maximum: behaves as a 100 px brush.
        engine.begin_stroke(&mut surface, BrushMode::Paint, 500.0, Point::new(200.0, 200.0));
        engine.end_stroke();
        assert!(surface.alpha_at(200 + 48, 200) > 0);
        assert_eq!(surface.alpha_at(200 + 53, 200), 0);

        // Far under the minimum: behaves as a 5 px brush.
        surface.clear();
        engine.begin_stroke(&mut surface, BrushMode::Paint, 0.5, Point::new(200.0, 200.0));
        engine.end_stroke();
        assert!(surface.alpha_at(200, 200) > 0);
        assert_eq!(surface.alpha_at(200 + 4, 200), 0);
    }
}

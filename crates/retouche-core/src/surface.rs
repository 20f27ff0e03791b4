//! The on-screen paint surface: an RGBA raster the user draws into.
//!
//! The surface is sized 1:1 with the displayed image box. Painting writes a
//! fixed semi-transparent highlight color; only the alpha channel carries
//! meaning for the final mask, the color exists for on-screen feedback.

use image::{imageops, Rgba, RgbaImage};
use kurbo::Point;

/// Highlight color for painted coverage (amber at ~70% opacity).
pub const HIGHLIGHT: [u8; 4] = [234, 179, 8, 179];

/// A mutable RGBA raster matching the displayed image box in screen pixels.
///
/// Supports the three capabilities the editor needs: drawing (capsule
/// stamps with source-over or destination-out compositing), read-back of
/// alpha coverage, and rescale-copy of its content.
#[derive(Debug, Clone)]
pub struct PaintSurface {
    pixels: RgbaImage,
}

impl PaintSurface {
    /// Create a transparent surface of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// True when the surface has no pixels (layout has not produced a box).
    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    /// The raw raster content.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Painted coverage at a pixel, 0 (clear) to 255 (fully painted).
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[3]
    }

    /// Drop all painted content, keeping the current size.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Resize the surface, re-rendering existing content scaled into the
    /// new box so user strokes survive layout changes.
    pub fn resize_preserving(&mut self, width: u32, height: u32) {
        if width == self.width() && height == self.height() {
            return;
        }
        if self.is_empty() || width == 0 || height == 0 {
            self.pixels = RgbaImage::new(width, height);
            return;
        }
        self.pixels = imageops::resize(&self.pixels, width, height, imageops::FilterType::Triangle);
    }

    /// Paint a round-capped segment from `from` to `to` with the given
    /// brush diameter, source-over blending the highlight color. A
    /// zero-length segment paints a circular dot of that diameter.
    pub fn paint_capsule(&mut self, from: Point, to: Point, width: f64) {
        self.stamp(from, to, width, |pixel, coverage| {
            let src_a = coverage * f64::from(HIGHLIGHT[3]) / 255.0;
            let dst_a = f64::from(pixel.0[3]) / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            if out_a > 0.0 {
                for c in 0..3 {
                    let sc = f64::from(HIGHLIGHT[c]);
                    let dc = f64::from(pixel.0[c]);
                    let out = (sc * src_a + dc * dst_a * (1.0 - src_a)) / out_a;
                    pixel.0[c] = out.round().clamp(0.0, 255.0) as u8;
                }
            }
            pixel.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        });
    }

    /// Erase a round-capped segment: destination-out compositing that
    /// removes coverage regardless of what was painted there.
    pub fn erase_capsule(&mut self, from: Point, to: Point, width: f64) {
        self.stamp(from, to, width, |pixel, coverage| {
            let dst_a = f64::from(pixel.0[3]);
            pixel.0[3] = (dst_a * (1.0 - coverage)).round().clamp(0.0, 255.0) as u8;
        });
    }

    /// Visit every pixel whose center lies within the capsule around the
    /// segment, with an antialiased coverage value in (0, 1].
    fn stamp(&mut self, from: Point, to: Point, width: f64, mut apply: impl FnMut(&mut Rgba<u8>, f64)) {
        if self.is_empty() {
            return;
        }
        let radius = width / 2.0;
        let pad = radius + 1.0;

        let x_min = (from.x.min(to.x) - pad).floor().max(0.0) as u32;
        let y_min = (from.y.min(to.y) - pad).floor().max(0.0) as u32;
        let x_max = (from.x.max(to.x) + pad)
            .ceil()
            .min(f64::from(self.width() - 1)) as u32;
        let y_max = (from.y.max(to.y) + pad)
            .ceil()
            .min(f64::from(self.height() - 1)) as u32;

        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let dist = segment_distance(center, from, to);
                // 1 px antialiased falloff at the capsule edge.
                let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    apply(self.pixels.get_pixel_mut(x, y), coverage);
                }
            }
        }
    }
}

/// Distance from a point to a line segment.
fn segment_distance(point: Point, start: Point, end: Point) -> f64 {
    let line = end - start;
    let len_sq = line.hypot2();
    if len_sq < f64::EPSILON {
        return (point - start).hypot();
    }
    let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
    let projection = Point::new(start.x + t * line.x, start.y + t * line.y);
    (point - projection).hypot()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = PaintSurface::new(64, 64);
        assert_eq!(surface.alpha_at(32, 32), 0);
        assert!(!surface.is_empty());
    }

    #[test]
    fn test_dot_has_brush_diameter() {
        let mut surface = PaintSurface::new(200, 200);
        let center = Point::new(100.0, 100.0);
        surface.paint_capsule(center, center, 40.0);

        // Inside the 40 px dot.
        assert!(surface.alpha_at(100, 100) > 0);
        assert!(surface.alpha_at(100 + 18, 100) > 0);
        assert!(surface.alpha_at(100, 100 - 18) > 0);
        // Outside the dot radius (plus the antialias band).
        assert_eq!(surface.alpha_at(100 + 23, 100), 0);
        assert_eq!(surface.alpha_at(100, 100 + 23), 0);
    }

    #[test]
    fn test_segment_is_gap_free() {
        let mut surface = PaintSurface::new(300, 300);
        surface.paint_capsule(Point::new(20.0, 20.0), Point::new(280.0, 250.0), 10.0);

        // Every interpolated point along the center line is covered.
        for i in 0..=20 {
            let t = f64::from(i) / 20.0;
            let x = (20.0 + t * 260.0) as u32;
            let y = (20.0 + t * 230.0) as u32;
            assert!(surface.alpha_at(x, y) > 0, "gap at t={t}");
        }
    }

    #[test]
    fn test_erase_removes_painted_coverage() {
        let mut surface = PaintSurface::new(100, 100);
        // Fully paint a region, then erase a line through it.
        surface.paint_capsule(Point::new(50.0, 50.0), Point::new(50.0, 50.0), 90.0);
        surface.paint_capsule(Point::new(50.0, 50.0), Point::new(50.0, 50.0), 90.0);
        assert!(surface.alpha_at(50, 50) > 0);

        surface.erase_capsule(Point::new(20.0, 50.0), Point::new(80.0, 50.0), 20.0);
        for x in 25..=75 {
            assert_eq!(surface.alpha_at(x, 50), 0, "coverage left at x={x}");
        }
        // Outside the erased path the paint remains.
        assert!(surface.alpha_at(50, 80) > 0);
    }

    #[test]
    fn test_repeated_paint_accumulates_but_saturates() {
        let mut surface = PaintSurface::new(50, 50);
        let center = Point::new(25.0, 25.0);
        surface.paint_capsule(center, center, 20.0);
        let once = surface.alpha_at(25, 25);
        surface.paint_capsule(center, center, 20.0);
        let twice = surface.alpha_at(25, 25);
        assert!(twice >= once);
        assert!(twice <= 255);
    }

    #[test]
    fn test_resize_preserves_relative_position() {
        let mut surface = PaintSurface::new(200, 100);
        // A dot at the horizontal center.
        surface.paint_capsule(Point::new(100.0, 50.0), Point::new(100.0, 50.0), 20.0);

        surface.resize_preserving(400, 200);
        assert_eq!(surface.width(), 400);
        assert_eq!(surface.height(), 200);
        // Still at the horizontal center after the resize.
        assert!(surface.alpha_at(200, 100) > 0);
        assert_eq!(surface.alpha_at(40, 100), 0);
    }

    #[test]
    fn test_clear_drops_content() {
        let mut surface = PaintSurface::new(64, 64);
        surface.paint_capsule(Point::new(32.0, 32.0), Point::new(32.0, 32.0), 30.0);
        surface.clear();
        assert_eq!(surface.alpha_at(32, 32), 0);
    }

    #[test]
    fn test_stamp_clips_to_surface_bounds() {
        let mut surface = PaintSurface::new(60, 60);
        // A stroke mostly outside the surface must not panic.
        surface.paint_capsule(Point::new(-40.0, -40.0), Point::new(10.0, 10.0), 30.0);
        assert!(surface.alpha_at(5, 5) > 0);
    }
}

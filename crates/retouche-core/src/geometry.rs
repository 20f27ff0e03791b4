//! Coordinate mapping between pointer, surface, and image space.

use kurbo::{Point, Rect, Vec2};

/// Convert a pointer position in viewport coordinates to surface-local
/// pixel coordinates.
///
/// The paint surface is always sized 1:1 with its displayed box, so no
/// scaling is involved; this is a pure translation by the box origin.
pub fn surface_local(pointer: Point, surface_box: Rect) -> Point {
    Point::new(pointer.x - surface_box.x0, pointer.y - surface_box.y0)
}

/// Compute the translate for a zoom step anchored at `cursor`.
///
/// Given the view model `screen = translate + scale * image_point`, the
/// returned translate keeps the image point currently under `cursor`
/// stationary while the scale changes from `old_scale` to `new_scale`.
pub fn anchored_translate(
    cursor: Point,
    translate: Vec2,
    old_scale: f64,
    new_scale: f64,
) -> Vec2 {
    let ratio = new_scale / old_scale;
    Vec2::new(
        cursor.x - (cursor.x - translate.x) * ratio,
        cursor.y - (cursor.y - translate.y) * ratio,
    )
}

/// The centered, aspect-preserving box of a `source_w x source_h` image
/// displayed within `outer` ("contain" layout).
///
/// Returns `None` when either the source or the outer box has a zero
/// dimension; layout cannot produce a box before the image has decoded.
pub fn contain_box(outer: Rect, source_w: u32, source_h: u32) -> Option<Rect> {
    if source_w == 0 || source_h == 0 || outer.width() <= 0.0 || outer.height() <= 0.0 {
        return None;
    }

    let sw = f64::from(source_w);
    let sh = f64::from(source_h);
    let scale = (outer.width() / sw).min(outer.height() / sh);

    let width = sw * scale;
    let height = sh * scale;
    let x0 = outer.x0 + (outer.width() - width) / 2.0;
    let y0 = outer.y0 + (outer.height() - height) / 2.0;

    Some(Rect::new(x0, y0, x0 + width, y0 + height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_local_is_translation() {
        let surface_box = Rect::new(40.0, 60.0, 640.0, 460.0);
        let local = surface_local(Point::new(140.0, 160.0), surface_box);
        assert!((local.x - 100.0).abs() < f64::EPSILON);
        assert!((local.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_anchored_translate_keeps_cursor_point_fixed() {
        // screen = translate + scale * image_point
        let cursor = Point::new(310.0, 120.0);
        let translate = Vec2::new(-40.0, 25.0);
        let old_scale = 1.7;
        let new_scale = 2.3;

        let image_point = Point::new(
            (cursor.x - translate.x) / old_scale,
            (cursor.y - translate.y) / old_scale,
        );

        let new_translate = anchored_translate(cursor, translate, old_scale, new_scale);
        let after = Point::new(
            new_translate.x + new_scale * image_point.x,
            new_translate.y + new_scale * image_point.y,
        );

        assert!((after.x - cursor.x).abs() < 1e-9);
        assert!((after.y - cursor.y).abs() < 1e-9);
    }

    #[test]
    fn test_anchored_translate_identity_when_scale_unchanged() {
        let translate = Vec2::new(12.0, -7.0);
        let result = anchored_translate(Point::new(100.0, 100.0), translate, 2.0, 2.0);
        assert!((result.x - translate.x).abs() < 1e-12);
        assert!((result.y - translate.y).abs() < 1e-12);
    }

    #[test]
    fn test_contain_box_wide_image_letterboxes_vertically() {
        let outer = Rect::new(0.0, 0.0, 600.0, 600.0);
        let rect = contain_box(outer, 1200, 800).unwrap();
        assert!((rect.width() - 600.0).abs() < 1e-9);
        assert!((rect.height() - 400.0).abs() < 1e-9);
        assert!((rect.y0 - 100.0).abs() < 1e-9);
        assert!((rect.x0).abs() < 1e-9);
    }

    #[test]
    fn test_contain_box_tall_image_letterboxes_horizontally() {
        let outer = Rect::new(0.0, 0.0, 600.0, 600.0);
        let rect = contain_box(outer, 800, 1200).unwrap();
        assert!((rect.width() - 400.0).abs() < 1e-9);
        assert!((rect.height() - 600.0).abs() < 1e-9);
        assert!((rect.x0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_contain_box_preserves_aspect_ratio() {
        let outer = Rect::new(10.0, 20.0, 710.0, 420.0);
        let rect = contain_box(outer, 3000, 2000).unwrap();
        let aspect = rect.width() / rect.height();
        assert!((aspect - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_contain_box_requires_decoded_dimensions() {
        let outer = Rect::new(0.0, 0.0, 600.0, 400.0);
        assert!(contain_box(outer, 0, 800).is_none());
        assert!(contain_box(outer, 800, 0).is_none());
        assert!(contain_box(Rect::ZERO, 800, 600).is_none());
    }
}

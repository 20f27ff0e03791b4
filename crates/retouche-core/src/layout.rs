//! Keeps the paint surface geometrically congruent with the displayed
//! image box.
//!
//! The displayed image sits in a "contain" layout inside its container, so
//! its box moves whenever the container reflows or the image finishes
//! decoding. Under an immediate-mode UI the sync runs every frame as a
//! cheap equality check, which covers load-complete, window resize, and
//! reflow in one trigger.

use crate::geometry::contain_box;
use crate::surface::PaintSurface;
use kurbo::Rect;

/// Result of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The image has no decoded dimensions yet; nothing to lay out.
    /// Expected during initial mount, never an error.
    Unavailable,
    /// The surface box already matches the displayed image box.
    Unchanged,
    /// The surface was resized to a new box, preserving drawn content.
    Resized,
}

/// Tracks the surface box and reconciles the surface raster with it.
#[derive(Debug, Clone, Default)]
pub struct OverlaySync {
    surface_box: Option<Rect>,
}

impl OverlaySync {
    /// Create a sync with no geometry yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current surface box in container coordinates, once known.
    pub fn surface_box(&self) -> Option<Rect> {
        self.surface_box
    }

    /// True after at least one successful pass; saving a mask requires it.
    pub fn has_geometry(&self) -> bool {
        self.surface_box.is_some()
    }

    /// Forget all geometry (the image itself changed); the caller is
    /// expected to discard or clear the surface alongside.
    pub fn reset(&mut self) {
        self.surface_box = None;
    }

    /// Reconcile the surface with the image's contain box inside
    /// `container`. Resizes the surface raster (content-preserving) when
    /// the box changed.
    pub fn sync(
        &mut self,
        container: Rect,
        source: Option<(u32, u32)>,
        surface: &mut PaintSurface,
    ) -> SyncOutcome {
        let Some((source_w, source_h)) = source else {
            return SyncOutcome::Unavailable;
        };
        let Some(target) = contain_box(container, source_w, source_h) else {
            return SyncOutcome::Unavailable;
        };

        if let Some(current) = self.surface_box {
            if boxes_match(current, target) {
                return SyncOutcome::Unchanged;
            }
        }

        let width = target.width().round().max(1.0) as u32;
        let height = target.height().round().max(1.0) as u32;
        surface.resize_preserving(width, height);
        self.surface_box = Some(target);
        log::debug!("paint surface resized to {width}x{height}");
        SyncOutcome::Resized
    }
}

/// Sub-pixel jitter from float layout math must not churn the raster.
fn boxes_match(a: Rect, b: Rect) -> bool {
    const TOLERANCE: f64 = 0.5;
    (a.x0 - b.x0).abs() < TOLERANCE
        && (a.y0 - b.y0).abs() < TOLERANCE
        && (a.x1 - b.x1).abs() < TOLERANCE
        && (a.y1 - b.y1).abs() < TOLERANCE
}

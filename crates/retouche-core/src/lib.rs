//! Retouche Core Library
//!
//! Platform-agnostic logic for the masking editor and result viewers:
//! coordinate mapping, the paint surface, stroke capture, overlay layout
//! sync, mask rasterization, and zoom/pan state. No UI dependencies; all
//! operations are synchronous and driven by pointer/layout events.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod rasterize;
pub mod stroke;
pub mod surface;
pub mod viewer;

pub use error::MaskError;
pub use layout::{OverlaySync, SyncOutcome};
pub use rasterize::{rasterize, MaskImage};
pub use stroke::{BrushMode, StrokeEngine, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};
pub use surface::PaintSurface;
pub use viewer::{ViewTransform, ZoomPan, MAX_SCALE, MIN_SCALE, ZOOM_INTENSITY};

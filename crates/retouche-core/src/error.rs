//! Error types for the masking core.
//!
//! Everything here is recoverable locally: bad brush widths are clamped at
//! the call site, pre-decode layout passes are silent no-ops, and the only
//! hard failure is asking for a mask before any geometry exists.

use thiserror::Error;

/// Failures producing or encoding a mask.
#[derive(Debug, Error)]
pub enum MaskError {
    /// Save was attempted before layout sync produced a surface box.
    #[error("cannot produce a mask before the image layout is known")]
    NoGeometry,

    /// The requested mask dimensions are unusable.
    #[error("invalid mask dimensions {width}x{height}")]
    BadDimensions { width: u32, height: u32 },

    /// PNG serialization failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

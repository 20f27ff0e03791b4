//! Image decode/encode, aspect-ratio cropping, and data-URL plumbing.

use std::io::Cursor;

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use thiserror::Error;

/// Failures in the file/payload layer.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Please select a valid image file.")]
    InvalidImage,

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("invalid data URL")]
    InvalidDataUrl,
}

/// Selectable output aspect ratios, applied as a center crop before
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Original,
    Square,
    Widescreen,
    PortraitTall,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [Self; 6] = [
        Self::Original,
        Self::Square,
        Self::Widescreen,
        Self::PortraitTall,
        Self::Landscape,
        Self::Portrait,
    ];

    /// Human-readable selector label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Square => "1:1 (Square)",
            Self::Widescreen => "16:9 (Widescreen)",
            Self::PortraitTall => "9:16 (Portrait)",
            Self::Landscape => "4:3 (Landscape)",
            Self::Portrait => "3:4 (Portrait)",
        }
    }

    /// Width/height ratio, or `None` when no cropping applies.
    pub fn ratio(self) -> Option<f64> {
        match self {
            Self::Original => None,
            Self::Square => Some(1.0),
            Self::Widescreen => Some(16.0 / 9.0),
            Self::PortraitTall => Some(9.0 / 16.0),
            Self::Landscape => Some(4.0 / 3.0),
            Self::Portrait => Some(3.0 / 4.0),
        }
    }
}

/// Decode image bytes into an RGBA raster plus its detected MIME type.
pub fn decode_image(bytes: &[u8]) -> Result<(RgbaImage, String), IoError> {
    let format = image::guess_format(bytes).map_err(|_| IoError::InvalidImage)?;
    let decoded = image::load_from_memory(bytes).map_err(|_| IoError::InvalidImage)?;
    Ok((decoded.to_rgba8(), mime_for_format(format).to_string()))
}

/// Serialize an RGBA raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, IoError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| IoError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Center-crop an image to the target width/height ratio. Crops width when
/// the image is wider than the target ratio, height otherwise.
pub fn crop_to_ratio(image: &RgbaImage, target_ratio: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let current_ratio = f64::from(width) / f64::from(height);

    let (crop_w, crop_h) = if current_ratio > target_ratio {
        ((f64::from(height) * target_ratio).round() as u32, height)
    } else {
        (width, (f64::from(width) / target_ratio).round() as u32)
    };
    let crop_w = crop_w.clamp(1, width);
    let crop_h = crop_h.clamp(1, height);
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;

    imageops::crop_imm(image, x, y, crop_w, crop_h).to_image()
}

/// Split a data URL into its MIME type and raw base64 payload, without
/// decoding (callers forward the payload base64-encoded anyway).
pub fn split_data_url(url: &str) -> Result<(String, String), IoError> {
    let rest = url.strip_prefix("data:").ok_or(IoError::InvalidDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(IoError::InvalidDataUrl)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(IoError::InvalidDataUrl)?;
    Ok((mime.to_string(), payload.to_string()))
}

/// File extension for a MIME type, for download naming.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

fn mime_for_format(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        _ => "image/png",
    }
}

/// Pick an image file with the native dialog; returns its bytes and name.
pub fn pick_image_dialog() -> Option<(Vec<u8>, String)> {
    let path = rfd::FileDialog::new()
        .set_title("Open Image")
        .add_filter("Image", &["png", "jpg", "jpeg", "webp"])
        .pick_file()?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    match std::fs::read(&path) {
        Ok(bytes) => Some((bytes, name)),
        Err(e) => {
            log::error!("failed to read {path:?}: {e}");
            None
        }
    }
}

/// Save bytes through the native save dialog.
pub fn save_image_dialog(bytes: &[u8], file_name: &str) {
    let dialog = rfd::FileDialog::new()
        .set_title("Save Image")
        .set_file_name(file_name);
    if let Some(path) = dialog.save_file() {
        if let Err(e) = std::fs::write(&path, bytes) {
            log::error!("failed to write {path:?}: {e}");
        } else {
            log::info!("saved image to {path:?}");
        }
    }
}

//! Promotion of the screen-resolution paint surface to a full-resolution
//! mask aligned with the source image.

use crate::error::MaskError;
use crate::surface::PaintSurface;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{imageops, RgbaImage};

/// An immutable coverage raster at the source image's native resolution.
///
/// The alpha channel is the mask; the color channels carry the on-screen
/// highlight color and are ignored downstream.
#[derive(Debug, Clone)]
pub struct MaskImage {
    pixels: RgbaImage,
}

impl MaskImage {
    /// Mask width in source-image pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Mask height in source-image pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Coverage at a source-image pixel, 0..=255.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[3]
    }

    /// The raw full-resolution raster.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Serialize as RGBA PNG bytes.
    pub fn png_bytes(&self) -> Result<Vec<u8>, MaskError> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| MaskError::PngEncode(e.to_string()))?;
            writer
                .write_image_data(self.pixels.as_raw())
                .map_err(|e| MaskError::PngEncode(e.to_string()))?;
        }
        Ok(bytes)
    }

    /// Serialize as a self-contained `data:image/png;base64,…` payload.
    pub fn to_data_url(&self) -> Result<String, MaskError> {
        Ok(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(self.png_bytes()?)
        ))
    }
}

/// Stretch the whole paint surface to exactly `source_w x source_h`.
///
/// Precondition: the surface box was produced by the contain layout of the
/// same source image, so its aspect ratio matches the source's and the
/// stretch realigns every painted pixel with its source pixel.
///
/// # Errors
///
/// [`MaskError::NoGeometry`] when the surface has no pixels (layout never
/// ran), [`MaskError::BadDimensions`] when the source dimensions are zero.
pub fn rasterize(
    surface: &PaintSurface,
    source_w: u32,
    source_h: u32,
) -> Result<MaskImage, MaskError> {
    if surface.is_empty() {
        return Err(MaskError::NoGeometry);
    }
    if source_w == 0 || source_h == 0 {
        return Err(MaskError::BadDimensions {
            width: source_w,
            height: source_h,
        });
    }

    let pixels = if surface.width() == source_w && surface.height() == source_h {
        surface.pixels().clone()
    } else {
        imageops::resize(
            surface.pixels(),
            source_w,
            source_h,
            imageops::FilterType::Triangle,
        )
    };

    log::info!(
        "mask rasterized {}x{} -> {}x{}",
        surface.width(),
        surface.height(),
        source_w,
        source_h
    );
    Ok(MaskImage { pixels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_output_dimensions_match_source() {
        let surface = PaintSurface::new(400, 300);
        let mask = rasterize(&surface, 4000, 3000).unwrap();
        assert_eq!(mask.width(), 4000);
        assert_eq!(mask.height(), 3000);
    }

    #[test]
    fn test_empty_surface_is_an_error() {
        let surface = PaintSurface::new(0, 0);
        assert!(matches!(
            rasterize(&surface, 800, 600),
            Err(MaskError::NoGeometry)
        ));
    }

    #[test]
    fn test_zero_source_dimensions_are_an_error() {
        let surface = PaintSurface::new(100, 100);
        assert!(matches!(
            rasterize(&surface, 0, 600),
            Err(MaskError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_stroke_scales_to_source_coordinates() {
        // 1200x800 source displayed in a 600x400 box; a width-40 stroke
        // from (100,100) to (500,300) must land on the mask along the
        // doubled line from (200,200) to (1000,600).
        let mut surface = PaintSurface::new(600, 400);
        surface.paint_capsule(Point::new(100.0, 100.0), Point::new(500.0, 300.0), 40.0);

        let mask = rasterize(&surface, 1200, 800).unwrap();
        assert_eq!(mask.width(), 1200);
        assert_eq!(mask.height(), 800);

        // On the scaled line.
        assert!(mask.alpha_at(200, 200) > 0);
        assert!(mask.alpha_at(600, 400) > 0);
        assert!(mask.alpha_at(1000, 600) > 0);
        // Far from it.
        assert_eq!(mask.alpha_at(200, 600), 0);
        assert_eq!(mask.alpha_at(1100, 100), 0);
    }

    #[test]
    fn test_png_payload_round_trips_alpha() {
        let mut surface = PaintSurface::new(64, 64);
        surface.paint_capsule(Point::new(32.0, 32.0), Point::new(32.0, 32.0), 20.0);

        let mask = rasterize(&surface, 64, 64).unwrap();
        let bytes = mask.png_bytes().unwrap();

        let decoder = png::Decoder::new(bytes.as_slice());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!(info.width, 64);
        assert_eq!(info.height, 64);
        assert_eq!(info.color_type, png::ColorType::Rgba);
        // Center pixel alpha survived the encode.
        let center = (32 * 64 + 32) * 4;
        assert!(buf[center + 3] > 0);
    }

    #[test]
    fn test_data_url_is_self_describing() {
        let mut surface = PaintSurface::new(16, 16);
        surface.paint_capsule(Point::new(8.0, 8.0), Point::new(8.0, 8.0), 10.0);

        let mask = rasterize(&surface, 16, 16).unwrap();
        let url = mask.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }
}

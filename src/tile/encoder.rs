//! Tile encoder.
//!
//! # Design Decisions
//!
//! - **JPEG has no alpha**: regions are flattened to RGB8 (or L8 for
//!   grayscale sources) before JPEG encoding.
//!
//! - **PNG keeps depth**: 8 and 16-bit sources are written as-is; float
//!   sources are converted to 8-bit since PNG cannot store them.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageResult};

use crate::pyramid::{clamp_quality, TileFormat};

/// Encodes tile regions in one raster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileEncoder {
    format: TileFormat,
    quality: u8,
}

impl TileEncoder {
    /// Create an encoder. `quality` is clamped to 1-100 and only applies to JPEG.
    pub fn new(format: TileFormat, quality: u8) -> Self {
        Self {
            format,
            quality: clamp_quality(quality),
        }
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a tile region.
    ///
    /// # Errors
    ///
    /// Returns the codec's error if the region cannot be encoded.
    pub fn encode(&self, tile: &DynamicImage) -> ImageResult<Bytes> {
        let mut output = Vec::new();

        match self.format {
            TileFormat::Jpeg => {
                let mut encoder = JpegEncoder::new_with_quality(&mut output, self.quality);
                if is_grayscale(tile) {
                    encoder.encode_image(&tile.to_luma8())?;
                } else {
                    encoder.encode_image(&tile.to_rgb8())?;
                }
            }
            TileFormat::Png => {
                let encoder = PngEncoder::new(&mut output);
                match tile {
                    DynamicImage::ImageRgb32F(_) => {
                        DynamicImage::ImageRgb8(tile.to_rgb8()).write_with_encoder(encoder)?
                    }
                    DynamicImage::ImageRgba32F(_) => {
                        DynamicImage::ImageRgba8(tile.to_rgba8()).write_with_encoder(encoder)?
                    }
                    _ => tile.write_with_encoder(encoder)?,
                }
            }
        }

        Ok(Bytes::from(output))
    }
}

fn is_grayscale(image: &DynamicImage) -> bool {
    matches!(
        image,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
    )
}

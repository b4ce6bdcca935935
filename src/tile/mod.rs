//! Tile encoding.
//!
//! Tiles are cropped from a level image as `image::DynamicImage` regions and
//! encoded to bytes in the pyramid's configured format before being handed
//! to a [`PyramidStore`](crate::pyramid::PyramidStore).
//!
//! # Example
//!
//! ```
//! use dzi_tiler::pyramid::TileFormat;
//! use dzi_tiler::tile::TileEncoder;
//! use image::{DynamicImage, RgbImage};
//!
//! let encoder = TileEncoder::new(TileFormat::Jpeg, 90);
//! let tile = DynamicImage::ImageRgb8(RgbImage::new(257, 200));
//! let bytes = encoder.encode(&tile).unwrap();
//! assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
//! ```

mod encoder;

pub use encoder::TileEncoder;

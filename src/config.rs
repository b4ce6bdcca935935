//! Command-line configuration for dzi-tiler.
//!
//! ```text
//! dzi-tiler <INPUT_DIR> <OUTPUT_DIR> [BASE_URL] [OPTIONS]
//! ```
//!
//! The parsed [`Config`] is turned into an immutable
//! [`PyramidSpec`](crate::pyramid::PyramidSpec) and [`DecodeOptions`]
//! before any work starts.

use std::path::PathBuf;

use clap::Parser;

use crate::batch::DecodeOptions;
use crate::pyramid::{
    PyramidSpec, ResampleFilter, TileFormat, DEFAULT_JPEG_QUALITY, DEFAULT_OVERLAP,
    DEFAULT_TILE_SIZE,
};

/// dzi-tiler - Convert images into Deep Zoom tile pyramids.
///
/// Every JPEG, PNG or TIFF file in INPUT_DIR becomes OUTPUT_DIR/<name>.dzi plus
/// a OUTPUT_DIR/<name>/<level>/<col>_<row>.<ext> tile tree.
#[derive(Parser, Debug, Clone)]
#[command(name = "dzi-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Positional Arguments
    // =========================================================================
    /// Directory containing the source images.
    pub input_dir: PathBuf,

    /// Directory the pyramids are written to (created if missing).
    pub output_dir: PathBuf,

    /// Base URL embedded in each descriptor's Url attribute.
    pub base_url: Option<String>,

    // =========================================================================
    // Pyramid Configuration
    // =========================================================================
    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    pub tile_size: u32,

    /// Overlap in pixels shared by neighbouring tiles.
    #[arg(long, default_value_t = DEFAULT_OVERLAP)]
    pub overlap: u32,

    /// Tile format: jpg or png.
    #[arg(long, default_value_t = TileFormat::Jpeg)]
    pub format: TileFormat,

    /// JPEG quality for tile encoding (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    pub quality: u8,

    /// Resampling filter: nearest, bilinear, bicubic, gaussian, lanczos3.
    #[arg(long, default_value_t = ResampleFilter::Lanczos3)]
    pub filter: ResampleFilter,

    // =========================================================================
    // Decoding and Execution
    // =========================================================================
    /// Keep the decoder's default memory limits.
    ///
    /// By default limits are lifted so very large images can be tiled.
    #[arg(long, default_value_t = false)]
    pub pixel_limit: bool,

    /// Worker threads for tile encoding (0 = one per CPU).
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Print a JSON report of the batch to stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.pyramid_spec().validate()
    }

    /// The immutable build configuration.
    pub fn pyramid_spec(&self) -> PyramidSpec {
        let spec = PyramidSpec::default()
            .with_tile_size(self.tile_size)
            .with_overlap(self.overlap)
            .with_format(self.format)
            .with_filter(self.filter)
            .with_quality(self.quality);

        match self.base_url {
            Some(ref url) => spec.with_base_url(url.clone()),
            None => spec,
        }
    }

    /// Decoder settings.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            no_pixel_limit: !self.pixel_limit,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! # dzi-tiler
//!
//! Converts raster images into Deep Zoom Image (DZI) tile pyramids for
//! smooth pan/zoom viewing with OpenSeadragon and other Deep Zoom viewers.
//!
//! ## Features
//!
//! - **Exact level planning**: `ceil(log2(max(w, h)))` levels above a 1x1 base,
//!   with ceiling division so no source pixel is lost
//! - **Fresh resampling**: every level is resampled from the source image
//! - **Overlapping tiles**: configurable tile size and overlap, clipped at edges
//! - **Consistent descriptors**: the `.dzi` is written after all tiles
//! - **Batch driver**: per-image error isolation over a whole directory
//!
//! ## Architecture
//!
//! - [`pyramid`] - level planner, tile grid, emitter, descriptor and store
//! - [`tile`] - tile encoding
//! - [`batch`] - directory scanning, decoding and per-image processing
//! - [`config`] - CLI configuration
//! - [`error`] - error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use dzi_tiler::{FsPyramidStore, PyramidBuilder, PyramidSpec};
//!
//! let image = image::open("input/m31.jpg").unwrap();
//! let spec = PyramidSpec::default().with_base_url("https://example.com/dzi");
//! let builder = PyramidBuilder::new(spec);
//!
//! let store = FsPyramidStore::new("output", "m31");
//! let report = builder.build(&image, "m31", &store).unwrap();
//! assert_eq!(report.max_level, dzi_tiler::pyramid::max_level(image.width(), image.height()));
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod pyramid;
pub mod tile;

// Re-export commonly used types
pub use batch::{
    decode_image, discover_images, image_name, is_supported_image, process_image, run_batch,
    BatchReport, DecodeOptions, DiscoveredInputs, FailedImage, IMAGE_EXTENSIONS,
};
pub use config::Config;
pub use error::{BatchError, BuildError, InputError, PyramidError};
pub use pyramid::{
    plan, BuildReport, Descriptor, FsPyramidStore, Level, LevelPlan, LevelReport, PyramidBuilder,
    PyramidSpec, PyramidStore, ResampleFilter, TileFormat, TileGrid, TileKey, TileRect,
};
pub use tile::TileEncoder;

//! Deep Zoom pyramid construction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PyramidBuilder                        │
//! │  1. plan levels      2. emit each level      3. descriptor  │
//! │        │                     │                      │       │
//! │        ▼                     ▼                      ▼       │
//! │  ┌───────────┐   ┌────────────────────────┐  ┌────────────┐ │
//! │  │  planner  │   │ TileEmitter            │  │ Descriptor │ │
//! │  │ (levels)  │   │ resample → grid → tile │  │  (.dzi)    │ │
//! │  └───────────┘   └───────────┬────────────┘  └─────┬──────┘ │
//! └──────────────────────────────┼─────────────────────┼────────┘
//!                                ▼                     ▼
//!                     ┌─────────────────────────────────────┐
//!                     │            PyramidStore             │
//!                     └─────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`PyramidSpec`]: immutable tile size, overlap, format, filter, quality, URL
//! - [`plan`] / [`LevelPlan`]: number of levels and their dimensions
//! - [`TileGrid`]: overlapping tile rectangles of one level
//! - [`TileEmitter`]: resamples, crops, encodes and stores the tiles of a level
//! - [`Descriptor`]: the `.dzi` document
//! - [`PyramidStore`] / [`FsPyramidStore`]: persistence
//! - [`PyramidBuilder`]: runs all of the above for one image

mod builder;
mod descriptor;
mod emitter;
mod grid;
mod planner;
mod spec;
mod store;

pub use builder::{BuildReport, PyramidBuilder};
pub use descriptor::{
    normalize_base_url, tile_directory_url, Descriptor, DESCRIPTOR_EXTENSION, DZI_NAMESPACE,
};
pub use emitter::{resample_level, LevelReport, TileEmitter};
pub use grid::{TileGrid, TileKey, TileRect};
pub use planner::{level_dimensions, max_level, plan, Level, LevelPlan};
pub use spec::{
    clamp_quality, is_valid_quality, PyramidSpec, ResampleFilter, TileFormat, DEFAULT_JPEG_QUALITY,
    DEFAULT_OVERLAP, DEFAULT_TILE_SIZE, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use store::{FsPyramidStore, PyramidStore};

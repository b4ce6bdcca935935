//! Build configuration for a tile pyramid.
//!
//! A [`PyramidSpec`] is an immutable value handed to the builder. Nothing in
//! the crate reads tile geometry from process-wide state, so independent
//! builds can run side by side with different settings.

use std::fmt;
use std::str::FromStr;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Default overlap in pixels between neighbouring tiles.
pub const DEFAULT_OVERLAP: u32 = 1;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Tile Format
// =============================================================================

/// Raster format used for every tile of a pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileFormat {
    /// Lossy JPEG tiles (`.jpg`)
    #[default]
    Jpeg,
    /// Lossless PNG tiles (`.png`)
    Png,
}

impl TileFormat {
    /// File extension, also used as the descriptor's `Format` attribute.
    pub fn extension(self) -> &'static str {
        match self {
            TileFormat::Jpeg => "jpg",
            TileFormat::Png => "png",
        }
    }

    /// The matching `image` crate format.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            TileFormat::Jpeg => image::ImageFormat::Jpeg,
            TileFormat::Png => image::ImageFormat::Png,
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            "png" => Ok(TileFormat::Png),
            _ => Err(format!("unknown tile format '{}'. Available: jpg, png", s)),
        }
    }
}

// =============================================================================
// Resample Filter
// =============================================================================

/// Filter used when resampling the source image down to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    Bicubic,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the corresponding `image` crate filter type.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResampleFilter::Nearest => image::imageops::FilterType::Nearest,
            ResampleFilter::Bilinear => image::imageops::FilterType::Triangle,
            ResampleFilter::Bicubic => image::imageops::FilterType::CatmullRom,
            ResampleFilter::Gaussian => image::imageops::FilterType::Gaussian,
            ResampleFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleFilter::Nearest => write!(f, "nearest"),
            ResampleFilter::Bilinear => write!(f, "bilinear"),
            ResampleFilter::Bicubic => write!(f, "bicubic"),
            ResampleFilter::Gaussian => write!(f, "gaussian"),
            ResampleFilter::Lanczos3 => write!(f, "lanczos3"),
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(ResampleFilter::Nearest),
            "bilinear" | "triangle" => Ok(ResampleFilter::Bilinear),
            "bicubic" | "catmullrom" | "catmull-rom" => Ok(ResampleFilter::Bicubic),
            "gaussian" => Ok(ResampleFilter::Gaussian),
            "lanczos3" | "lanczos" => Ok(ResampleFilter::Lanczos3),
            _ => Err(format!(
                "unknown resample filter '{}'. Available: nearest, bilinear, bicubic, gaussian, lanczos3",
                s
            )),
        }
    }
}

// =============================================================================
// Pyramid Spec
// =============================================================================

/// Immutable configuration for one pyramid build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidSpec {
    /// Tile edge length in pixels (excluding overlap)
    pub tile_size: u32,

    /// Extra pixels each tile shares with its right/bottom neighbour
    pub overlap: u32,

    /// Tile raster format
    pub format: TileFormat,

    /// Resampling filter for every level below full resolution
    pub filter: ResampleFilter,

    /// JPEG quality; ignored for lossless formats
    pub quality: u8,

    /// Base URL embedded in the descriptor, if any
    pub base_url: Option<String>,
}

impl Default for PyramidSpec {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            overlap: DEFAULT_OVERLAP,
            format: TileFormat::default(),
            filter: ResampleFilter::default(),
            quality: DEFAULT_JPEG_QUALITY,
            base_url: None,
        }
    }
}

impl PyramidSpec {
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_overlap(mut self, overlap: u32) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set the descriptor base URL. A blank string means no URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = if base_url.trim().is_empty() {
            None
        } else {
            Some(base_url)
        };
        self
    }

    /// Validate the geometry and encoder settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }
        if self.overlap > self.tile_size {
            return Err(format!(
                "overlap ({}) must not exceed tile_size ({})",
                self.overlap, self.tile_size
            ));
        }
        if !is_valid_quality(self.quality) {
            return Err("quality must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

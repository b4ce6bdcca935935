//! Level planning.
//!
//! Deep Zoom numbers levels from the most downsampled image up to full
//! resolution:
//! - level 0 = 1x1 pixel (or the smallest size the halving reaches)
//! - max level = the source image, unscaled
//!
//! Every level is derived directly from the full-resolution size by a power of
//! two, with ceiling division so no source row or column is ever dropped.

/// One resolution layer of the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    /// Level index (0 = smallest)
    pub index: u32,

    /// Level width in pixels
    pub width: u32,

    /// Level height in pixels
    pub height: u32,
}

/// The complete level layout for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPlan {
    width: u32,
    height: u32,
    max_level: u32,
}

/// Plan the levels for a `width` x `height` image.
///
/// Both dimensions must be at least 1; callers reject empty images first.
pub fn plan(width: u32, height: u32) -> LevelPlan {
    debug_assert!(width >= 1 && height >= 1, "image dimensions must be positive");
    LevelPlan {
        width,
        height,
        max_level: max_level(width, height),
    }
}

/// Calculate the maximum level for given image dimensions.
///
/// max_level = ceil(log2(max(width, height))), or 0 for a 1x1 image. Uses the
/// bit length of `max - 1` so the result is exact for every `u32`.
pub fn max_level(width: u32, height: u32) -> u32 {
    let max_dim = width.max(height);
    if max_dim <= 1 {
        return 0;
    }
    u32::BITS - (max_dim - 1).leading_zeros()
}

/// Calculate dimensions at a level.
///
/// At level L the dimensions are:
/// - width = ceil(full_width / 2^(max_level - L))
/// - height = ceil(full_height / 2^(max_level - L))
pub fn level_dimensions(width: u32, height: u32, level: u32, max_level: u32) -> (u32, u32) {
    debug_assert!(level <= max_level);
    let scale = downsample_factor(level, max_level);
    let level_width = u64::from(width).div_ceil(scale);
    let level_height = u64::from(height).div_ceil(scale);
    (level_width as u32, level_height as u32)
}

/// 2^(max_level - level). `u64` because max_level reaches 32 for `u32` sizes.
fn downsample_factor(level: u32, max_level: u32) -> u64 {
    1u64 << (max_level - level)
}

impl LevelPlan {
    /// Full-resolution width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Full-resolution height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Index of the full-resolution level.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Number of levels, `max_level + 1`.
    pub fn level_count(&self) -> u32 {
        self.max_level + 1
    }

    /// The level at `index`, or `None` beyond the full-resolution level.
    pub fn level(&self, index: u32) -> Option<Level> {
        if index > self.max_level {
            return None;
        }
        let (width, height) = level_dimensions(self.width, self.height, index, self.max_level);
        Some(Level {
            index,
            width,
            height,
        })
    }

    /// Downsample factor of a level relative to full resolution.
    pub fn downsample(&self, index: u32) -> Option<u64> {
        (index <= self.max_level).then(|| downsample_factor(index, self.max_level))
    }

    /// All levels from smallest (0) to full resolution.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        (0..=self.max_level).filter_map(move |index| self.level(index))
    }
}

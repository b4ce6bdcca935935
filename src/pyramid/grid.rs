//! Tile grid partitioning for a single level.
//!
//! A level of `width` x `height` pixels is cut into `ceil(width / T)` columns
//! and `ceil(height / T)` rows. Tile `(col, row)` starts at `(col * T, row * T)`
//! and extends `T + O` pixels right and down, clipped to the level bounds.
//! Clipped edge tiles are simply shorter; they are never padded.

use super::planner::Level;

/// Identifies one tile of a pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey {
    pub level: u32,
    pub col: u32,
    pub row: u32,
}

impl TileKey {
    pub fn new(level: u32, col: u32, row: u32) -> Self {
        Self { level, col, row }
    }

    /// File name of the tile inside its level directory, e.g. `3_5.jpg`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.col, self.row, extension)
    }
}

/// Pixel rectangle `[x, x + width) x [y, y + height)` within a level image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// The tile grid of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    level: Level,
    tile_size: u32,
    overlap: u32,
    cols: u32,
    rows: u32,
}

impl TileGrid {
    /// Lay out the grid for `level`. `tile_size` must be at least 1.
    pub fn new(level: Level, tile_size: u32, overlap: u32) -> Self {
        debug_assert!(tile_size >= 1);
        Self {
            level,
            tile_size,
            overlap,
            cols: level.width.div_ceil(tile_size),
            rows: level.height.div_ceil(tile_size),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of tiles, `cols * rows`.
    pub fn tile_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Pixel region of tile `(col, row)`, or `None` outside the grid.
    pub fn tile_rect(&self, col: u32, row: u32) -> Option<TileRect> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let (x, width) = span(col, self.tile_size, self.overlap, self.level.width);
        let (y, height) = span(row, self.tile_size, self.overlap, self.level.height);
        Some(TileRect {
            x,
            y,
            width,
            height,
        })
    }

    /// Every tile of the level in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileKey, TileRect)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).filter_map(move |col| {
                self.tile_rect(col, row)
                    .map(|rect| (TileKey::new(self.level.index, col, row), rect))
            })
        })
    }
}

/// Start and length of cell `index` along one axis of length `extent`.
fn span(index: u32, tile_size: u32, overlap: u32, extent: u32) -> (u32, u32) {
    let start = u64::from(index) * u64::from(tile_size);
    let end = (start + u64::from(tile_size) + u64::from(overlap)).min(u64::from(extent));
    (start as u32, (end - start) as u32)
}

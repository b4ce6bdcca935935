//! Tile emission for one level.
//!
//! For each level the full-resolution source is resampled directly to the
//! level's dimensions. Levels are never derived from one another.

use std::borrow::Cow;

use image::DynamicImage;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::PyramidError;
use crate::tile::TileEncoder;

use super::grid::{TileGrid, TileKey, TileRect};
use super::planner::Level;
use super::spec::{PyramidSpec, ResampleFilter};
use super::store::PyramidStore;

/// What was written for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub level: u32,
    pub width: u32,
    pub height: u32,
    pub cols: u32,
    pub rows: u32,
    pub tiles: u64,
}

/// Resample `source` to the dimensions of `level`.
///
/// The full-resolution level borrows the source unchanged.
pub fn resample_level<'a>(
    source: &'a DynamicImage,
    level: Level,
    filter: ResampleFilter,
) -> Cow<'a, DynamicImage> {
    if source.width() == level.width && source.height() == level.height {
        return Cow::Borrowed(source);
    }
    Cow::Owned(source.resize_exact(level.width, level.height, filter.to_image_filter()))
}

/// Cuts level images into tiles and writes them to a store.
pub struct TileEmitter<'a, S: PyramidStore + ?Sized> {
    spec: &'a PyramidSpec,
    encoder: TileEncoder,
    store: &'a S,
}

impl<'a, S: PyramidStore + ?Sized> TileEmitter<'a, S> {
    pub fn new(spec: &'a PyramidSpec, store: &'a S) -> Self {
        Self {
            spec,
            encoder: TileEncoder::new(spec.format, spec.quality),
            store,
        }
    }

    /// Resample `source` for `level` and write every tile of the level.
    ///
    /// Tiles are encoded and written in parallel. The first failure is
    /// returned; tiles already written stay on disk. Invalid settings fail
    /// with [`PyramidError::InvalidSpec`] before anything is written.
    pub fn emit_level(
        &self,
        source: &DynamicImage,
        level: Level,
    ) -> Result<LevelReport, PyramidError> {
        self.spec.validate().map_err(PyramidError::InvalidSpec)?;
        let level_image = resample_level(source, level, self.spec.filter);
        let grid = TileGrid::new(level, self.spec.tile_size, self.spec.overlap);

        self.store.prepare_level(level.index)?;

        let tiles: Vec<(TileKey, TileRect)> = grid.tiles().collect();
        tiles
            .into_par_iter()
            .try_for_each(|(key, rect)| self.emit_tile(&level_image, key, rect))?;

        debug!(
            "Level {} ({}x{}) emitted as {}x{} grid",
            level.index,
            level.width,
            level.height,
            grid.cols(),
            grid.rows()
        );

        Ok(LevelReport {
            level: level.index,
            width: level.width,
            height: level.height,
            cols: grid.cols(),
            rows: grid.rows(),
            tiles: grid.tile_count(),
        })
    }

    fn emit_tile(
        &self,
        level_image: &DynamicImage,
        key: TileKey,
        rect: TileRect,
    ) -> Result<(), PyramidError> {
        let region = level_image.crop_imm(rect.x, rect.y, rect.width, rect.height);
        let data = self
            .encoder
            .encode(&region)
            .map_err(|source| PyramidError::Encode {
                level: key.level,
                col: key.col,
                row: key.row,
                source,
            })?;
        self.store.put_tile(key, self.encoder.format(), data)
    }
}

//! Test utilities for integration tests.
//!
//! This module provides in-memory store implementations and helpers for
//! creating source images on disk.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use dzi_tiler::error::PyramidError;
use dzi_tiler::pyramid::{PyramidStore, TileFormat, TileKey};

// =============================================================================
// Recording Store
// =============================================================================

/// One call made against a [`RecordingStore`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Level(u32),
    Tile(TileKey),
    Descriptor,
}

/// An in-memory store that keeps every tile and the order of all calls.
#[derive(Default)]
pub struct RecordingStore {
    events: Mutex<Vec<StoreEvent>>,
    tiles: Mutex<BTreeMap<TileKey, (TileFormat, Bytes)>>,
    descriptor: Mutex<Option<String>>,
    fail_at_level: Option<u32>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `put_tile` fails for every tile of `level`.
    pub fn failing_at_level(level: u32) -> Self {
        Self {
            fail_at_level: Some(level),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<StoreEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn tile_keys(&self) -> Vec<TileKey> {
        self.tiles.lock().unwrap().keys().copied().collect()
    }

    /// Decode a stored tile.
    pub fn tile_image(&self, key: TileKey) -> Option<DynamicImage> {
        let tiles = self.tiles.lock().unwrap();
        let (format, data) = tiles.get(&key)?;
        image::load_from_memory_with_format(data, format.image_format()).ok()
    }

    pub fn descriptor(&self) -> Option<String> {
        self.descriptor.lock().unwrap().clone()
    }
}

impl PyramidStore for RecordingStore {
    fn prepare_level(&self, level: u32) -> Result<(), PyramidError> {
        self.events.lock().unwrap().push(StoreEvent::Level(level));
        Ok(())
    }

    fn put_tile(&self, key: TileKey, format: TileFormat, data: Bytes) -> Result<(), PyramidError> {
        if self.fail_at_level == Some(key.level) {
            return Err(PyramidError::WriteTile {
                path: format!("memory/{}/{}", key.level, key.file_name(format.extension())).into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.events.lock().unwrap().push(StoreEvent::Tile(key));
        self.tiles.lock().unwrap().insert(key, (format, data));
        Ok(())
    }

    fn put_descriptor(&self, xml: &str) -> Result<String, PyramidError> {
        self.events.lock().unwrap().push(StoreEvent::Descriptor);
        *self.descriptor.lock().unwrap() = Some(xml.to_string());
        Ok("memory".to_string())
    }
}

// =============================================================================
// Image Fixtures
// =============================================================================

/// A smooth RGB gradient, distinct per pixel.
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    }))
}

/// Write a gradient image to `dir/file_name` in `format`.
pub fn write_image(dir: &Path, file_name: &str, width: u32, height: u32, format: ImageFormat) {
    gradient(width, height)
        .save_with_format(dir.join(file_name), format)
        .unwrap();
}

/// Recursively count files under `dir`.
pub fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            count += count_files(&path);
        } else {
            count += 1;
        }
    }
    count
}

//! Persistence of tiles and descriptors.
//!
//! The builder never touches the filesystem directly; it writes through a
//! [`PyramidStore`]. [`FsPyramidStore`] lays a pyramid out on disk as:
//!
//! ```text
//! <root>/<name>.dzi
//! <root>/<name>/<level>/<col>_<row>.<ext>
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::PyramidError;

use super::descriptor::DESCRIPTOR_EXTENSION;
use super::grid::TileKey;
use super::spec::TileFormat;

/// Destination for the artifacts of one image's pyramid.
///
/// Implementations must be `Sync`: tiles of a level are written from
/// several threads at once. Distinct tile keys never alias.
pub trait PyramidStore: Sync {
    /// Ensure the container for `level` exists before its tiles are written.
    fn prepare_level(&self, level: u32) -> Result<(), PyramidError>;

    /// Persist one encoded tile.
    fn put_tile(&self, key: TileKey, format: TileFormat, data: Bytes) -> Result<(), PyramidError>;

    /// Persist the descriptor document. Returns where it was written.
    fn put_descriptor(&self, xml: &str) -> Result<String, PyramidError>;
}

// =============================================================================
// Filesystem Store
// =============================================================================

/// Writes one image's pyramid under an output root directory.
#[derive(Debug, Clone)]
pub struct FsPyramidStore {
    root: PathBuf,
    name: String,
}

impl FsPyramidStore {
    /// Store for the image `name` under `root`.
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: name.into(),
        }
    }

    /// `<root>/<name>`
    pub fn tiles_dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// `<root>/<name>/<level>`
    pub fn level_dir(&self, level: u32) -> PathBuf {
        self.tiles_dir().join(level.to_string())
    }

    /// `<root>/<name>/<level>/<col>_<row>.<ext>`
    pub fn tile_path(&self, key: TileKey, format: TileFormat) -> PathBuf {
        self.level_dir(key.level)
            .join(key.file_name(format.extension()))
    }

    /// `<root>/<name>.dzi`
    pub fn descriptor_path(&self) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.name, DESCRIPTOR_EXTENSION))
    }
}

impl PyramidStore for FsPyramidStore {
    fn prepare_level(&self, level: u32) -> Result<(), PyramidError> {
        let path = self.level_dir(level);
        create_dir(&path)
    }

    fn put_tile(&self, key: TileKey, format: TileFormat, data: Bytes) -> Result<(), PyramidError> {
        let path = self.tile_path(key, format);
        fs::write(&path, &data).map_err(|source| PyramidError::WriteTile { path, source })
    }

    fn put_descriptor(&self, xml: &str) -> Result<String, PyramidError> {
        create_dir(&self.root)?;

        // Write a sibling first so readers never observe a partial document.
        let path = self.descriptor_path();
        let staging = path.with_extension(format!("{}.tmp", DESCRIPTOR_EXTENSION));

        fs::write(&staging, xml).map_err(|source| PyramidError::WriteDescriptor {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| PyramidError::WriteDescriptor {
            path: path.clone(),
            source,
        })?;

        debug!("Descriptor committed to {}", path.display());
        Ok(path.display().to_string())
    }
}

fn create_dir(path: &Path) -> Result<(), PyramidError> {
    fs::create_dir_all(path).map_err(|source| PyramidError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

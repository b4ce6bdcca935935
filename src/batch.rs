//! Batch driver: scan an input directory, decode each image and build its
//! pyramid under a shared output root.
//!
//! Errors are isolated per image. A corrupt input or a failed write is logged
//! with the image name and recorded in the [`BatchReport`]; the remaining
//! images are still processed.
//!
//! Every image owns `<output>/<name>.dzi` and `<output>/<name>/`. When two
//! inputs share a name (`m31.jpg` and `m31.png`), the first in sorted order
//! keeps it and the later ones fail.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{BatchError, BuildError, InputError};
use crate::pyramid::{BuildReport, FsPyramidStore, PyramidBuilder};

/// File extensions (lowercase) accepted as source images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

// =============================================================================
// Discovery
// =============================================================================

/// Input directory contents split into images and everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredInputs {
    /// Files with an allowed image extension, sorted by path
    pub images: Vec<PathBuf>,

    /// Entries that were not considered, sorted by path
    pub skipped: Vec<PathBuf>,
}

/// Returns `true` if `path` has an allowed image extension (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List the images directly inside `dir`.
///
/// Subdirectories are not descended into.
pub fn discover_images(dir: &Path) -> Result<DiscoveredInputs, BatchError> {
    let read_dir_error = |source| BatchError::ReadInputDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs = DiscoveredInputs::default();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        // file_type() does not follow symlinks
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false) || path.is_file();

        if is_file && is_supported_image(&path) {
            inputs.images.push(path);
        } else {
            inputs.skipped.push(path);
        }
    }

    inputs.images.sort();
    inputs.skipped.sort();
    Ok(inputs)
}

// =============================================================================
// Decoding
// =============================================================================

/// Options for decoding source images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Lift the decoder's allocation limits so very large images load.
    pub no_pixel_limit: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            no_pixel_limit: true,
        }
    }
}

/// Read `path` fully into memory and decode it.
///
/// The format is sniffed from the content, falling back to the extension.
/// Multi-page TIFFs yield their first page.
pub fn decode_image(path: &Path, options: DecodeOptions) -> Result<DynamicImage, InputError> {
    let data = fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ImageReader::new(Cursor::new(data));
    if let Ok(format) = ImageFormat::from_path(path) {
        reader.set_format(format);
    }
    let mut reader = reader
        .with_guessed_format()
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if options.no_pixel_limit {
        reader.no_limits();
    }

    let image = reader.decode().map_err(|source| InputError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(InputError::EmptyImage {
            path: path.to_path_buf(),
        });
    }
    Ok(image)
}

/// Image name used for the descriptor and tile directory: the file stem.
pub fn image_name(path: &Path) -> Result<String, InputError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| InputError::InvalidName {
            path: path.to_path_buf(),
        })
}

// =============================================================================
// Processing
// =============================================================================

/// Decode one image and build its pyramid under `output_root`.
pub fn process_image(
    path: &Path,
    output_root: &Path,
    builder: &PyramidBuilder,
    options: DecodeOptions,
) -> Result<BuildReport, BuildError> {
    let name = image_name(path)?;
    let image = decode_image(path, options)?;
    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    let store = FsPyramidStore::new(output_root, &name);
    Ok(builder.build(&image, &name, &store)?)
}

/// Reserve the output name of `path` for this batch.
///
/// Names are compared case-insensitively since output directories may live
/// on a case-insensitive filesystem.
fn claim_name(claimed: &mut HashMap<String, PathBuf>, path: &Path) -> Result<(), InputError> {
    let name = image_name(path)?;
    match claimed.entry(name.to_lowercase()) {
        Entry::Occupied(first) => Err(InputError::DuplicateName {
            path: path.to_path_buf(),
            name,
            first: first.get().clone(),
        }),
        Entry::Vacant(slot) => {
            slot.insert(path.to_path_buf());
            Ok(())
        }
    }
}

/// An image whose build failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImage {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: Vec<BuildReport>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedImage>,
}

impl BatchReport {
    /// Total tiles written across all successful builds.
    pub fn total_tiles(&self) -> u64 {
        self.processed.iter().map(|report| report.total_tiles).sum()
    }
}

/// Build pyramids for every image in `input_dir` under `output_root`.
///
/// Only listing the input directory or creating the output root can fail the
/// whole batch. Both are checked before any image is touched.
pub fn run_batch(
    input_dir: &Path,
    output_root: &Path,
    builder: &PyramidBuilder,
    options: DecodeOptions,
) -> Result<BatchReport, BatchError> {
    let inputs = discover_images(input_dir)?;
    for path in &inputs.skipped {
        debug!("Skipping {}", path.display());
    }

    fs::create_dir_all(output_root).map_err(|source| BatchError::CreateOutputDir {
        path: output_root.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport {
        skipped: inputs.skipped,
        ..Default::default()
    };
    let mut claimed = HashMap::new();

    for path in inputs.images {
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Processing {} ...", label);

        let result = claim_name(&mut claimed, &path)
            .map_err(BuildError::from)
            .and_then(|()| process_image(&path, output_root, builder, options));

        match result {
            Ok(build) => report.processed.push(build),
            Err(e) => {
                error!("Failed to process {}: {}", label, e);
                report.failed.push(FailedImage {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or decoding a source image.
///
/// These abort processing of a single image; a batch continues with the
/// next input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read from disk
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a decodable image (corrupt or unsupported)
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The decoded image has a zero width or height
    #[error("Image {path} has zero width or height")]
    EmptyImage { path: PathBuf },

    /// No usable image name could be derived from the file name
    #[error("Cannot derive an image name from {path}")]
    InvalidName { path: PathBuf },

    /// Another input in the batch already produces the same output name
    #[error("Image name '{name}' of {path} is already used by {first}")]
    DuplicateName {
        path: PathBuf,
        name: String,
        first: PathBuf,
    },
}

/// Errors raised while emitting tiles or writing the descriptor.
#[derive(Debug, Error)]
pub enum PyramidError {
    /// The pyramid settings are unusable (zero tile size, oversized overlap)
    #[error("Invalid pyramid settings: {0}")]
    InvalidSpec(String),

    /// A directory in the output tree could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tile file could not be written
    #[error("Failed to write tile {path}: {source}")]
    WriteTile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A tile region could not be encoded in the configured format
    #[error("Failed to encode tile {col}_{row} at level {level}: {source}")]
    Encode {
        level: u32,
        col: u32,
        row: u32,
        #[source]
        source: image::ImageError,
    },

    /// The descriptor document could not be written
    #[error("Failed to write descriptor {path}: {source}")]
    WriteDescriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error for a single image build: either the input or the output failed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Pyramid(#[from] PyramidError),
}

/// Errors that stop a whole batch before any image is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The input directory could not be listed
    #[error("Failed to read input directory {path}: {source}")]
    ReadInputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output root could not be created
    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Batch driver tests.
//!
//! Tests verify:
//! - Only allow-listed image files are processed
//! - A corrupt image fails alone while the rest of the batch completes
//! - A failed tile write fails alone and leaves no descriptor
//! - Inputs sharing a name never overwrite each other
//! - High-bit-depth TIFF sources are tiled
//! - Batch-level failures happen before any output is created

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use dzi_tiler::batch::{run_batch, DecodeOptions};
use dzi_tiler::pyramid::{Descriptor, PyramidBuilder, PyramidSpec};
use dzi_tiler::BatchError;

use super::test_utils::{count_files, write_image};

#[test]
fn test_jpeg_and_text_file() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_image(input.path(), "nebula.jpg", 300, 200, ImageFormat::Jpeg);
    std::fs::write(input.path().join("README.txt"), "not an image").unwrap();

    let report = run_batch(
        input.path(),
        output.path(),
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    )
    .unwrap();

    assert_eq!(report.processed.len(), 1);
    assert!(report.failed.is_empty());
    assert_eq!(report.skipped, vec![input.path().join("README.txt")]);

    let mut entries: Vec<String> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["nebula", "nebula.dzi"]);

    let build = &report.processed[0];
    assert_eq!(build.name, "nebula");
    assert_eq!(build.max_level, 9);
    assert_eq!(
        count_files(&output.path().join("nebula")) as u64,
        build.total_tiles
    );
}

#[test]
fn test_uppercase_extensions_are_processed() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_image(input.path(), "A.PNG", 20, 10, ImageFormat::Png);
    write_image(input.path(), "B.JPEG", 20, 10, ImageFormat::Jpeg);

    let report = run_batch(
        input.path(),
        output.path(),
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    )
    .unwrap();

    let names: Vec<&str> = report.processed.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert!(output.path().join("A.dzi").is_file());
    assert!(output.path().join("B.dzi").is_file());
}

#[test]
fn test_corrupt_image_does_not_stop_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("a_broken.jpg"), b"\xFF\xD8garbage").unwrap();
    write_image(input.path(), "b_good.png", 64, 48, ImageFormat::Png);

    let report = run_batch(
        input.path(),
        output.path(),
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    )
    .unwrap();

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].name, "b_good");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, input.path().join("a_broken.jpg"));
    assert!(report.failed[0].error.contains("a_broken.jpg"));

    assert!(!output.path().join("a_broken.dzi").exists());
    assert!(output.path().join("b_good.dzi").is_file());
}

#[test]
fn test_write_failure_does_not_stop_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_image(input.path(), "blocked.png", 40, 30, ImageFormat::Png);
    write_image(input.path(), "open.png", 40, 30, ImageFormat::Png);

    // A plain file where the tile directory should go
    std::fs::write(output.path().join("blocked"), "in the way").unwrap();

    let report = run_batch(
        input.path(),
        output.path(),
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    )
    .unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, input.path().join("blocked.png"));
    assert!(report.failed[0].error.contains("Failed to create directory"));
    assert!(!output.path().join("blocked.dzi").exists());

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].name, "open");
    assert!(output.path().join("open.dzi").is_file());
    assert!(output.path().join("open/6/0_0.jpg").is_file());
}

#[test]
fn test_shared_name_keeps_first_image() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_image(input.path(), "a.jpg", 20, 20, ImageFormat::Jpeg);
    write_image(input.path(), "a.png", 40, 40, ImageFormat::Png);

    let report = run_batch(
        input.path(),
        output.path(),
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    )
    .unwrap();

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].width, 20);
    assert_eq!(report.processed[0].max_level, 5);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, input.path().join("a.png"));
    assert!(report.failed[0].error.contains("a.jpg"));

    let xml = std::fs::read_to_string(output.path().join("a.dzi")).unwrap();
    let descriptor = Descriptor::parse(&xml).unwrap();
    assert_eq!((descriptor.width, descriptor.height), (20, 20));
    assert!(!output.path().join("a/6").exists());
}

#[test]
fn test_sixteen_bit_tiff() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let deep = DynamicImage::ImageRgb8(RgbImage::from_fn(70, 30, |x, y| {
        Rgb([(x * 3) as u8, (y * 8) as u8, 90])
    }))
    .to_rgb16();
    DynamicImage::ImageRgb16(deep)
        .save_with_format(input.path().join("deep.tiff"), ImageFormat::Tiff)
        .unwrap();

    let spec = PyramidSpec::default().with_base_url("/dzi");
    let report = run_batch(
        input.path(),
        output.path(),
        &PyramidBuilder::new(spec),
        DecodeOptions::default(),
    )
    .unwrap();

    assert!(report.failed.is_empty());
    assert_eq!(report.processed.len(), 1);

    let xml = std::fs::read_to_string(output.path().join("deep.dzi")).unwrap();
    let descriptor = Descriptor::parse(&xml).unwrap();
    assert_eq!((descriptor.width, descriptor.height), (70, 30));
    assert_eq!(descriptor.url.as_deref(), Some("/dzi/deep/"));
    assert!(output.path().join("deep/7/0_0.jpg").is_file());
}

#[test]
fn test_missing_input_dir_creates_nothing() {
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("out");

    let result = run_batch(
        &root.path().join("missing"),
        &output,
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    );

    assert!(matches!(result, Err(BatchError::ReadInputDir { .. })));
    assert!(!output.exists());
}

#[test]
fn test_empty_input_dir() {
    let input = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("nested/out");

    let report = run_batch(
        input.path(),
        &output,
        &PyramidBuilder::default(),
        DecodeOptions::default(),
    )
    .unwrap();

    assert!(report.processed.is_empty());
    assert_eq!(report.total_tiles(), 0);
    assert!(output.is_dir());
}

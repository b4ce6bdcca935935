//! Pyramid Builder: plans the levels of one image, emits every level and
//! writes the descriptor last.

use image::DynamicImage;
use serde::Serialize;
use tracing::info;

use crate::error::PyramidError;

use super::descriptor::Descriptor;
use super::emitter::{LevelReport, TileEmitter};
use super::planner::plan;
use super::spec::PyramidSpec;
use super::store::PyramidStore;

/// Summary of one completed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub max_level: u32,
    pub levels: Vec<LevelReport>,
    pub total_tiles: u64,
    /// Where the descriptor was written
    pub descriptor: String,
}

/// Builds Deep Zoom pyramids with a fixed [`PyramidSpec`].
///
/// # Example
///
/// ```no_run
/// use dzi_tiler::pyramid::{FsPyramidStore, PyramidBuilder, PyramidSpec};
///
/// let image = image::open("photos/m31.jpg").unwrap();
/// let builder = PyramidBuilder::new(PyramidSpec::default());
/// let store = FsPyramidStore::new("out", "m31");
/// let report = builder.build(&image, "m31", &store).unwrap();
/// println!("{} tiles", report.total_tiles);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PyramidBuilder {
    spec: PyramidSpec,
}

impl PyramidBuilder {
    pub fn new(spec: PyramidSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &PyramidSpec {
        &self.spec
    }

    /// Build the pyramid of `image` into `store`.
    ///
    /// Levels are emitted from 0 up to full resolution. The descriptor is
    /// written only after every tile succeeded, so a failed build leaves tiles
    /// without a descriptor and never the reverse. Invalid settings are
    /// rejected before the store is touched.
    pub fn build<S: PyramidStore + ?Sized>(
        &self,
        image: &DynamicImage,
        name: &str,
        store: &S,
    ) -> Result<BuildReport, PyramidError> {
        self.spec.validate().map_err(PyramidError::InvalidSpec)?;

        let (width, height) = (image.width(), image.height());
        let plan = plan(width, height);
        let emitter = TileEmitter::new(&self.spec, store);

        let mut levels = Vec::with_capacity(plan.level_count() as usize);
        for level in plan.levels() {
            let report = emitter.emit_level(image, level)?;
            info!("  Level {} -> {} tiles", report.level, report.tiles);
            levels.push(report);
        }

        let descriptor = Descriptor::new(&self.spec, name, width, height);
        let location = store.put_descriptor(&descriptor.to_xml())?;
        info!("  Wrote {}", location);

        Ok(BuildReport {
            name: name.to_string(),
            width,
            height,
            max_level: plan.max_level(),
            total_tiles: levels.iter().map(|level| level.tiles).sum(),
            levels,
            descriptor: location,
        })
    }
}

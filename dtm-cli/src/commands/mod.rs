pub mod area;
pub mod batch;
pub mod convert;
pub mod extrema;
pub mod info;
pub mod query;

use anyhow::{Context, Result};
use dtm::{RasterStore, RasterStoreBuilder};
use std::path::PathBuf;

/// Raster location and body scale shared by every subcommand.
pub struct RasterSource {
    pub path: Option<PathBuf>,
    pub ground_resolution: f64,
    pub body_radius: f64,
}

impl RasterSource {
    /// Resolve the raster path, failing with a hint when none was given.
    pub fn path(&self) -> Result<&PathBuf> {
        self.path
            .as_ref()
            .context("No raster given. Use --raster or set DTM_RASTER")
    }

    /// Load the raster into a store configured with this body scale.
    pub fn open(&self) -> Result<RasterStore> {
        let path = self.path()?;
        RasterStoreBuilder::new()
            .ground_resolution(self.ground_resolution)
            .body_radius(self.body_radius)
            .open(path)
            .with_context(|| format!("Failed to load raster {}", path.display()))
    }
}

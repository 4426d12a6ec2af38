//! Raster store: the loaded elevation grid and every pixel-space query.
//!
//! This module provides [`RasterStore`], which owns one decoded DTM and
//! answers point, area, extrema and coordinate-conversion queries against
//! it.
//!
//! # Configuration
//!
//! The planetary scale used by coordinate conversion is fixed when the store
//! is built, either explicitly or from the environment:
//!
//! ```ignore
//! use dtm::RasterStoreBuilder;
//!
//! let store = RasterStoreBuilder::from_env()
//!     .ground_resolution(1.0)
//!     .open("/data/mars/DTEEC_jezero.tif")?;
//!
//! let elevation = store.get_value(120.0, 48.0)?;
//! ```

use std::path::Path;

use crate::area::{self, AreaRequest};
use crate::coordinate::{BodyModel, Coordinate, CoordinateConverter};
use crate::decoder::{GeoTiffDecoder, RasterDecoder};
use crate::error::{DtmError, Result};
use crate::geometry::GridGeometry;
use crate::grid::ElevationGrid;

/// Environment variable holding the ground-sample distance (length units per pixel).
pub const ENV_GROUND_RESOLUTION: &str = "DTM_GROUND_RESOLUTION";

/// Environment variable holding the body radius (same length unit).
pub const ENV_BODY_RADIUS: &str = "DTM_BODY_RADIUS";

/// Owner of a loaded elevation grid.
///
/// A store starts out empty; [`RasterStore::load`] decodes a raster into it.
/// Every query borrows the store immutably, so a reload can never overlap a
/// running scan.
///
/// # Example
///
/// ```ignore
/// use dtm::RasterStore;
///
/// let store = RasterStore::open("jezero.tif")?;
///
/// println!("{}x{}", store.width()?, store.height()?);
/// println!("Elevation: {}m", store.get_value(10.0, 20.0)?);
/// println!("Highest point: {}m", store.get_max_value()?);
/// ```
pub struct RasterStore {
    /// Loaded grid, `None` before the first successful load or after a failed one.
    grid: Option<ElevationGrid>,
    /// Pixel to planetographic conversion for this raster
    converter: CoordinateConverter,
    /// File decoder used by `load`
    decoder: Box<dyn RasterDecoder>,
}

impl RasterStore {
    /// Create an empty store with the default body model and GeoTIFF decoder.
    pub fn new() -> Self {
        RasterStoreBuilder::new().build()
    }

    /// Create a builder for more configuration options.
    pub fn builder() -> RasterStoreBuilder {
        RasterStoreBuilder::new()
    }

    /// Create a store and load `path` into it.
    ///
    /// # Errors
    ///
    /// Returns [`DtmError::Load`] if the raster cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        RasterStoreBuilder::new().open(path)
    }

    /// Create a store around an already built grid.
    pub fn from_grid(grid: ElevationGrid) -> Self {
        let mut store = Self::new();
        store.grid = Some(grid);
        store
    }

    /// Load the raster at `path`, replacing any grid already held.
    ///
    /// On failure the store is left unloaded and later queries return
    /// [`DtmError::NotLoaded`] until a load succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DtmError::Load`] if the file is missing, unreadable, or not a
    /// supported raster.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.grid = None;

        let raster = self.decoder.decode(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load raster");
        })?;
        let grid = ElevationGrid::from_decoded(raster, path);

        tracing::info!(
            path = %path.display(),
            width = grid.width(),
            height = grid.height(),
            "Loaded raster"
        );

        self.grid = Some(grid);
        Ok(())
    }

    /// Returns `true` if a grid is loaded.
    pub fn is_loaded(&self) -> bool {
        self.grid.is_some()
    }

    /// Returns the loaded grid.
    ///
    /// # Errors
    ///
    /// Returns [`DtmError::NotLoaded`] if no raster has been loaded.
    pub fn grid(&self) -> Result<&ElevationGrid> {
        self.grid.as_ref().ok_or(DtmError::NotLoaded)
    }

    /// Returns the body model used for coordinate conversion.
    pub fn body(&self) -> BodyModel {
        self.converter.body()
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> Result<usize> {
        Ok(self.grid()?.width())
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> Result<usize> {
        Ok(self.grid()?.height())
    }

    /// Returns the file the loaded grid was decoded from.
    pub fn source_path(&self) -> Result<&Path> {
        Ok(self.grid()?.source_path())
    }

    /// Returns the loaded grid's dimensions and world envelope.
    pub fn geometry(&self) -> Result<&GridGeometry> {
        Ok(self.grid()?.geometry())
    }

    /// Returns the no-data sentinel declared by the source file, if any.
    pub fn nodata(&self) -> Result<Option<f64>> {
        Ok(self.grid()?.nodata())
    }

    /// Get the elevation at pixel `(x, y)`.
    ///
    /// The pixel is mapped to a world position and back to an array index by
    /// the grid geometry, so sub-pixel positions resolve to the nearest
    /// pixel centre.
    ///
    /// # Arguments
    ///
    /// * `x` - Column position, `0..=width`
    /// * `y` - Row position, `0..=height` (0 = top edge)
    ///
    /// The upper bounds are inclusive: `x == width` and `y == height` are
    /// accepted and read the last column/row.
    ///
    /// # Errors
    ///
    /// Returns [`DtmError::OutOfBounds`] if the pixel is outside the bounds
    /// above, or [`DtmError::NotLoaded`].
    pub fn get_value(&self, x: f64, y: f64) -> Result<f64> {
        let grid = self.grid()?;
        let out_of_bounds = || DtmError::OutOfBounds {
            x,
            y,
            width: grid.width(),
            height: grid.height(),
        };

        if !(0.0..=grid.width() as f64).contains(&x) || !(0.0..=grid.height() as f64).contains(&y)
        {
            return Err(out_of_bounds());
        }

        let geometry = grid.geometry();
        let (world_x, world_y) = geometry.pixel_to_world(x, y);
        let index = geometry.world_to_grid(world_x, world_y);

        grid.sample_at(index).ok_or_else(out_of_bounds)
    }

    /// Get the elevation at pixel `(x, y)`, mapping out-of-bounds pixels to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DtmError::NotLoaded`] if no raster has been loaded.
    pub fn try_value(&self, x: f64, y: f64) -> Result<Option<f64>> {
        match self.get_value(x, y) {
            Ok(v) => Ok(Some(v)),
            Err(DtmError::OutOfBounds { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Scan every pixel and return the highest elevation.
    ///
    /// The result is not cached; every call rescans the grid.
    pub fn get_max_value(&self) -> Result<f64> {
        let max = self.scan(f64::NEG_INFINITY, |value, best| value > best)?;
        tracing::info!(max_elevation = max, "Maximum elevation");
        Ok(max)
    }

    /// Scan every pixel and return the lowest elevation.
    ///
    /// The result is not cached; every call rescans the grid.
    pub fn get_min_value(&self) -> Result<f64> {
        let min = self.scan(f64::INFINITY, |value, best| value < best)?;
        tracing::info!(min_elevation = min, "Minimum elevation");
        Ok(min)
    }

    /// Visit `(i, j)` for every `i < width`, `j < height` through
    /// [`Self::get_value`], keeping the value `better` prefers.
    fn scan(&self, init: f64, better: impl Fn(f64, f64) -> bool) -> Result<f64> {
        let grid = self.grid()?;
        let mut best = init;

        for i in 0..grid.width() {
            for j in 0..grid.height() {
                let value = self.get_value(i as f64, j as f64)?;
                if better(value, best) {
                    best = value;
                }
            }
        }

        Ok(best)
    }

    /// Get the elevations inside a rectangle anchored at `origin`.
    ///
    /// Returns `height` rows of `width` values. Output row 0 is the bottom of
    /// the rectangle (source row `origin.y + height - 1`); see [`crate::area`]
    /// for the clipping rules. Cells whose source pixel is out of bounds are
    /// left at [`area::FILL_VALUE`].
    ///
    /// # Arguments
    ///
    /// * `origin` - Top-left pixel of the rectangle; fractional parts are dropped
    /// * `width` - Number of columns
    /// * `height` - Number of rows
    pub fn get_elevations_in_area(
        &self,
        origin: Coordinate,
        width: usize,
        height: usize,
    ) -> Result<Vec<Vec<f64>>> {
        let request = AreaRequest::new(origin.x() as i64, origin.y() as i64, width, height);
        self.elevations_in(request)
    }

    /// Get the elevations covered by an [`AreaRequest`].
    pub fn elevations_in(&self, request: AreaRequest) -> Result<Vec<Vec<f64>>> {
        let grid = self.grid()?;

        Ok(area::extract(
            request,
            grid.width(),
            grid.height(),
            |x, y| self.try_value(x as f64, y as f64).ok().flatten(),
        ))
    }

    /// Convert a pixel coordinate on the loaded raster to planetographic
    /// latitude/longitude using this store's body model.
    ///
    /// See [`CoordinateConverter::pixel_to_planetographic`].
    pub fn pixel_to_planetographic(&self, coord: Coordinate) -> Result<Coordinate> {
        let grid = self.grid()?;
        Ok(self
            .converter
            .pixel_to_planetographic(coord, grid.width(), grid.height()))
    }
}

impl Default for RasterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating [`RasterStore`] with custom configuration.
///
/// # Example
///
/// ```
/// use dtm::{BodyModel, RasterStoreBuilder};
///
/// let store = RasterStoreBuilder::new()
///     .ground_resolution(1.0)
///     .build();
///
/// assert_eq!(store.body(), BodyModel::mars(1.0));
/// assert!(!store.is_loaded());
/// ```
pub struct RasterStoreBuilder {
    body: BodyModel,
    decoder: Box<dyn RasterDecoder>,
}

impl RasterStoreBuilder {
    /// Create a builder with the default Mars body model and GeoTIFF decoder.
    pub fn new() -> Self {
        Self {
            body: BodyModel::default(),
            decoder: Box::new(GeoTiffDecoder),
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `DTM_GROUND_RESOLUTION` | Ground distance per pixel | 5 |
    /// | `DTM_BODY_RADIUS` | Body radius, same unit | 3396200 (Mars) |
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = BodyModel::default();
        let ground_resolution =
            env_f64(ENV_GROUND_RESOLUTION).unwrap_or(defaults.ground_resolution);
        let radius = env_f64(ENV_BODY_RADIUS).unwrap_or(defaults.radius);

        Self::new().body(BodyModel::new(ground_resolution, radius))
    }

    /// Set the full body model.
    pub fn body(mut self, body: BodyModel) -> Self {
        self.body = body;
        self
    }

    /// Set the ground distance covered by one pixel.
    ///
    /// Default is 5 (meters on Mars).
    pub fn ground_resolution(mut self, ground_resolution: f64) -> Self {
        self.body.ground_resolution = ground_resolution;
        self
    }

    /// Set the body radius, in the same unit as the ground resolution.
    ///
    /// Default is the Mars mean radius in meters.
    pub fn body_radius(mut self, radius: f64) -> Self {
        self.body.radius = radius;
        self
    }

    /// Use a custom raster decoder.
    pub fn decoder<D: RasterDecoder + 'static>(mut self, decoder: D) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    /// Build an empty [`RasterStore`].
    pub fn build(self) -> RasterStore {
        RasterStore {
            grid: None,
            converter: CoordinateConverter::new(self.body),
            decoder: self.decoder,
        }
    }

    /// Build a [`RasterStore`] and load `path` into it.
    ///
    /// # Errors
    ///
    /// Returns [`DtmError::Load`] if the raster cannot be decoded.
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<RasterStore> {
        let mut store = self.build();
        store.load(path)?;
        Ok(store)
    }
}

impl Default for RasterStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_f64(name: &str) -> Option<f64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => {
            tracing::warn!(variable = name, value = %raw, "Ignoring invalid value");
            None
        }
    }
}

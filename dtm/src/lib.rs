//! # DTM - Planetary Elevation Raster Library
//!
//! Pixel-indexed elevation queries over a planetary digital terrain model
//! stored as a GeoTIFF.
//!
//! ## Features
//!
//! - **Point lookup**: elevation at a pixel, routed through the raster's
//!   world/grid transform
//! - **Area extraction**: a rectangle of elevations in Cartesian row order
//! - **Extrema**: full-grid minimum and maximum scans
//! - **Planetographic conversion**: pixel offsets from the image centre to
//!   latitude/longitude on a spherical body
//!
//! ## Quick Start
//!
//! ```ignore
//! use dtm::{Coordinate, RasterStore};
//!
//! let store = RasterStore::open("/data/mars/DTEEC_jezero.tif")?;
//!
//! let elevation = store.get_value(120.0, 48.0)?;
//! let patch = store.get_elevations_in_area(Coordinate::pixels(100.0, 40.0), 16, 16)?;
//! let latlong = store.pixel_to_planetographic(Coordinate::pixels(120.0, 48.0))?;
//! println!("{}m at {:?}", elevation, latlong);
//! ```
//!
//! ## Pixel Space
//!
//! Pixel `(x, y)` has `x` growing to the right and `y` growing downward, with
//! `(0, 0)` at the top-left sample. Valid queries satisfy `0 ≤ x ≤ width` and
//! `0 ≤ y ≤ height`; the upper bounds are inclusive and resolve to the last
//! column/row.
//!
//! ## Coordinate Conversion
//!
//! The image centre is taken as latitude 0, longitude 0. Offsets are scaled
//! by a fixed ground-sample distance (default 5 m/pixel) and converted to
//! degrees on a sphere (default Mars, radius 3,396,200 m). Both are set per
//! store through [`RasterStoreBuilder`].

pub mod area;
pub mod coordinate;
pub mod decoder;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod store;

#[cfg(test)]
mod testutil;

// Re-export main types at crate root for convenience
pub use area::{AreaRequest, FILL_VALUE};
pub use coordinate::{BodyModel, Coordinate, CoordinateConverter, Units};
pub use decoder::{DecodedRaster, GeoTiffDecoder, RasterDecoder};
pub use error::{DtmError, LoadError, Result};
pub use geometry::{Envelope, GridGeometry, GridIndex};
pub use grid::ElevationGrid;
pub use store::{RasterStore, RasterStoreBuilder};

//! Pixel and planetographic coordinates.
//!
//! The conversion treats the centre of the image as the intersection of the
//! equator and the prime meridian and walks out over a sphere, one fixed
//! ground-sample distance per pixel. It is an approximation for a single
//! DTM, not a map projection.

use std::f64::consts::PI;
use std::fmt;

/// Mars mean radius in meters.
pub const MARS_RADIUS_M: f64 = 3_396_200.0;

/// Ground-sample distance, in meters per pixel, assumed when none is configured.
pub const DEFAULT_GROUND_RESOLUTION_M: f64 = 5.0;

/// Unit tag carried by a [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    /// `(x, y)` in raster pixels, y growing downward.
    Pixels,
    /// `(latitude, longitude)` in whole degrees.
    LatLong,
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Pixels => write!(f, "pixels"),
            Units::LatLong => write!(f, "latLong"),
        }
    }
}

/// A tagged 2D coordinate.
///
/// For [`Units::LatLong`] coordinates, `x` holds the latitude and `y` the longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    x: f64,
    y: f64,
    units: Units,
}

impl Coordinate {
    /// Create a coordinate with an explicit unit tag.
    pub fn new(x: f64, y: f64, units: Units) -> Self {
        Self { x, y, units }
    }

    /// A pixel-space coordinate.
    pub fn pixels(x: f64, y: f64) -> Self {
        Self::new(x, y, Units::Pixels)
    }

    /// A planetographic coordinate.
    pub fn lat_long(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, Units::LatLong)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Latitude in degrees, if this is a planetographic coordinate.
    pub fn latitude(&self) -> Option<f64> {
        (self.units == Units::LatLong).then_some(self.x)
    }

    /// Longitude in degrees, if this is a planetographic coordinate.
    pub fn longitude(&self) -> Option<f64> {
        (self.units == Units::LatLong).then_some(self.y)
    }
}

/// Scale parameters of the body a DTM was captured on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyModel {
    /// Ground distance covered by one pixel, in the same unit as `radius`.
    pub ground_resolution: f64,
    /// Mean radius of the body.
    pub radius: f64,
}

impl BodyModel {
    /// Create a new body model.
    pub fn new(ground_resolution: f64, radius: f64) -> Self {
        Self {
            ground_resolution,
            radius,
        }
    }

    /// Mars with the given ground-sample distance in meters.
    pub fn mars(ground_resolution: f64) -> Self {
        Self::new(ground_resolution, MARS_RADIUS_M)
    }

    /// Length of a great circle.
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }
}

impl Default for BodyModel {
    fn default() -> Self {
        Self::mars(DEFAULT_GROUND_RESOLUTION_M)
    }
}

/// Converts pixel coordinates to planetographic latitude/longitude.
///
/// # Example
///
/// ```
/// use dtm::{BodyModel, Coordinate, CoordinateConverter, Units};
///
/// let converter = CoordinateConverter::new(BodyModel::default());
/// let centre = converter.pixel_to_planetographic(Coordinate::pixels(500.0, 250.0), 1000, 500);
/// assert_eq!(centre, Coordinate::lat_long(0.0, 0.0));
/// assert_eq!(centre.units(), Units::LatLong);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateConverter {
    body: BodyModel,
}

impl CoordinateConverter {
    /// Create a converter for the given body.
    pub fn new(body: BodyModel) -> Self {
        Self { body }
    }

    /// Returns the body model used for conversions.
    pub fn body(&self) -> BodyModel {
        self.body
    }

    /// Convert a pixel coordinate on a `width × height` raster to whole-degree
    /// latitude/longitude.
    ///
    /// Coordinates not tagged [`Units::Pixels`] are returned unchanged. Rows
    /// above the centre (negative row offset) map to the southern hemisphere
    /// and columns left of it to the western hemisphere. Both angles are
    /// truncated toward zero.
    pub fn pixel_to_planetographic(
        &self,
        coord: Coordinate,
        width: usize,
        height: usize,
    ) -> Coordinate {
        if coord.units != Units::Pixels {
            return coord;
        }

        // Centre row/column use integer halves of the dimensions
        let equator = (height / 2) as f64;
        let prime_meridian = (width / 2) as f64;

        let row_offset = coord.y - equator;
        let col_offset = coord.x - prime_meridian;

        tracing::debug!(
            x = coord.x,
            y = coord.y,
            equator,
            prime_meridian,
            row_offset,
            col_offset,
            "Pixel offsets from image centre"
        );

        let latitude = self.offset_to_degrees(row_offset);
        let longitude = self.offset_to_degrees(col_offset);

        tracing::debug!(latitude, longitude, "Planetographic angles before truncation");

        // `+ 0.0` folds -0.0 into 0.0
        Coordinate::lat_long(latitude.trunc() + 0.0, longitude.trunc() + 0.0)
    }

    /// Signed angle subtended by `pixels` of ground distance.
    fn offset_to_degrees(&self, pixels: f64) -> f64 {
        let arc_length = pixels * self.body.ground_resolution;
        let degrees = 360.0 * arc_length.abs() / self.body.circumference();

        tracing::debug!(arc_length, degrees, "Arc length to angle");

        if arc_length < 0.0 {
            -degrees
        } else {
            degrees
        }
    }
}

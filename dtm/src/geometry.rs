//! Grid geometry: the mapping between a raster's world envelope and its
//! array indices.
//!
//! Rasters are registered against a world envelope rather than raw array
//! indices. Pixel-space queries therefore go pixel → world → grid, and the
//! grid side decides which `(row, col)` is read. Row 0 is the top (maximum
//! world Y) edge; world Y grows upward while rows grow downward.

/// Axis-aligned world extent of a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Western edge.
    pub min_x: f64,
    /// Southern edge.
    pub min_y: f64,
    /// Eastern edge.
    pub max_x: f64,
    /// Northern edge.
    pub max_y: f64,
}

impl Envelope {
    /// Create a new envelope from its edges.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Envelope whose world units are pixels: `(0, 0)` to `(width, height)`.
    pub fn pixel_space(width: usize, height: usize) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Raw array position of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridIndex {
    /// Row index (0 = top edge)
    pub row: usize,
    /// Column index (0 = left edge)
    pub col: usize,
}

/// Dimensions of a raster plus the world envelope it is registered to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    width: usize,
    height: usize,
    envelope: Envelope,
}

impl GridGeometry {
    /// Create a geometry for a `width × height` grid covering `envelope`.
    pub fn new(width: usize, height: usize, envelope: Envelope) -> Self {
        Self {
            width,
            height,
            envelope,
        }
    }

    /// Geometry for an image without georeferencing.
    pub fn pixel_space(width: usize, height: usize) -> Self {
        Self::new(width, height, Envelope::pixel_space(width, height))
    }

    /// Build a geometry from GeoTIFF `ModelPixelScale` and `ModelTiepoint` values.
    ///
    /// The tiepoint ties raster position `(i, j)` to world position `(x, y)`.
    /// Returns `None` if either tag is too short or the scale is not positive.
    pub fn from_tiepoint(
        width: usize,
        height: usize,
        pixel_scale: &[f64],
        tiepoint: &[f64],
    ) -> Option<Self> {
        if pixel_scale.len() < 2 || tiepoint.len() < 5 {
            return None;
        }
        let (scale_x, scale_y) = (pixel_scale[0], pixel_scale[1]);
        if !(scale_x.is_finite() && scale_y.is_finite() && scale_x > 0.0 && scale_y > 0.0) {
            return None;
        }

        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let min_x = x - i * scale_x;
        let max_y = y + j * scale_y;
        let envelope = Envelope::new(
            min_x,
            max_y - height as f64 * scale_y,
            min_x + width as f64 * scale_x,
            max_y,
        );
        Some(Self::new(width, height, envelope))
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the registered world envelope.
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    /// World size of one pixel along X and Y.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.envelope.width() / self.width as f64,
            self.envelope.height() / self.height as f64,
        )
    }

    /// World position of the centre of pixel `(x, y)`.
    ///
    /// `x` runs left to right and `y` top to bottom, in pixel units.
    pub fn pixel_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let (size_x, size_y) = self.pixel_size();
        (
            self.envelope.min_x + (x + 0.5) * size_x,
            self.envelope.max_y - (y + 0.5) * size_y,
        )
    }

    /// Array index of the sample covering world position `(world_x, world_y)`.
    ///
    /// Positions outside the envelope are clamped to the nearest edge sample.
    pub fn world_to_grid(&self, world_x: f64, world_y: f64) -> GridIndex {
        let (size_x, size_y) = self.pixel_size();
        let col = ((world_x - self.envelope.min_x) / size_x).floor();
        let row = ((self.envelope.max_y - world_y) / size_y).floor();

        GridIndex {
            row: clamp_index(row, self.height),
            col: clamp_index(col, self.width),
        }
    }
}

fn clamp_index(value: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        (value as usize).min(last)
    }
}

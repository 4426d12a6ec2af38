//! In-memory elevation grid.
//!
//! [`ElevationGrid`] holds every sample of a decoded raster, row-major with
//! row 0 at the top edge, together with the geometry used to translate
//! pixel coordinates into array indices.

use std::path::{Path, PathBuf};

use crate::decoder::DecodedRaster;
use crate::geometry::{GridGeometry, GridIndex};

/// A fully decoded single-band elevation raster.
///
/// The sample buffer always holds exactly `width × height` values and is
/// never resized after construction.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    /// Row-major samples, `width × height` long
    samples: Vec<f64>,
    /// Dimensions and world envelope
    geometry: GridGeometry,
    /// No-data sentinel declared by the source file
    nodata: Option<f64>,
    /// File that produced this grid
    source_path: PathBuf,
}

impl ElevationGrid {
    /// Build a grid from a decoded raster.
    pub fn from_decoded<P: AsRef<Path>>(raster: DecodedRaster, source_path: P) -> Self {
        let (geometry, samples, nodata) = raster.into_parts();
        Self {
            samples,
            geometry,
            nodata,
            source_path: source_path.as_ref().to_path_buf(),
        }
    }

    /// Build a pixel-space grid directly from row-major samples.
    ///
    /// Returns `None` if either dimension is zero or `samples` does not hold
    /// exactly `width × height` values.
    ///
    /// # Example
    ///
    /// ```
    /// use dtm::ElevationGrid;
    ///
    /// let grid = ElevationGrid::from_samples(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(grid.sample(1, 0), Some(3.0));
    /// ```
    pub fn from_samples(width: usize, height: usize, samples: Vec<f64>) -> Option<Self> {
        Self::with_geometry(GridGeometry::pixel_space(width, height), samples)
    }

    /// Build a grid with an explicit geometry.
    ///
    /// Returns `None` under the same conditions as [`Self::from_samples`].
    pub fn with_geometry(geometry: GridGeometry, samples: Vec<f64>) -> Option<Self> {
        if geometry.width() == 0 || geometry.height() == 0 {
            return None;
        }
        let raster = DecodedRaster::new(geometry, samples, None)?;
        Some(Self::from_decoded(raster, "<memory>"))
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.geometry.width()
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    /// Returns the grid geometry.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Returns the no-data sentinel declared by the source file.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Returns the file this grid was decoded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Sample at a specific row/column index.
    ///
    /// # Arguments
    ///
    /// * `row` - Row index (0 = top edge)
    /// * `col` - Column index (0 = left edge)
    pub fn sample(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        self.samples.get(row * self.width() + col).copied()
    }

    /// Sample addressed by a [`GridIndex`].
    pub fn sample_at(&self, index: GridIndex) -> Option<f64> {
        self.sample(index.row, index.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_row_major() {
        let grid = ElevationGrid::from_samples(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.sample(0, 2), Some(3.0));
        assert_eq!(grid.sample(1, 0), Some(4.0));
        assert_eq!(grid.sample_at(GridIndex { row: 1, col: 2 }), Some(6.0));
    }

    #[test]
    fn test_sample_outside_grid() {
        let grid = ElevationGrid::from_samples(2, 2, vec![0.0; 4]).unwrap();

        assert_eq!(grid.sample(2, 0), None);
        assert_eq!(grid.sample(0, 2), None);
    }

    #[test]
    fn test_rejects_mismatched_samples() {
        assert!(ElevationGrid::from_samples(3, 3, vec![0.0; 8]).is_none());
        assert!(ElevationGrid::from_samples(0, 3, Vec::new()).is_none());
    }

    #[test]
    fn test_source_path_retained() {
        let raster = DecodedRaster::new(GridGeometry::pixel_space(1, 1), vec![7.0], Some(-9999.0))
            .unwrap();
        let grid = ElevationGrid::from_decoded(raster, "/data/mars/jezero.tif");

        assert_eq!(grid.source_path(), Path::new("/data/mars/jezero.tif"));
        assert_eq!(grid.nodata(), Some(-9999.0));
    }
}

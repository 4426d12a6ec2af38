//! Rectangular area extraction.
//!
//! The output array is Cartesian: row 0 is the *bottom* of the requested
//! rectangle, while the source raster has row 0 at the top. Columns are not
//! flipped.
//!
//! The rectangle is clipped against the grid's total size, not against the
//! span remaining after the origin. Cells whose source pixel lies outside the
//! grid keep the fill value.

/// Value left in cells whose source pixel is out of bounds.
pub const FILL_VALUE: f64 = 0.0;

/// A rectangle in pixel space, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaRequest {
    /// Left edge, in pixels
    pub origin_x: i64,
    /// Top edge, in pixels
    pub origin_y: i64,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl AreaRequest {
    /// Create a new area request.
    pub fn new(origin_x: i64, origin_y: i64, width: usize, height: usize) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Columns and rows actually visited on a `grid_width × grid_height` grid.
    pub fn clipped_size(&self, grid_width: usize, grid_height: usize) -> (usize, usize) {
        (self.width.min(grid_width), self.height.min(grid_height))
    }
}

/// Fill a `height × width` array from `lookup`.
///
/// `lookup(x, y)` returns `None` for pixels outside the grid; those cells keep
/// [`FILL_VALUE`].
pub(crate) fn extract<F>(
    request: AreaRequest,
    grid_width: usize,
    grid_height: usize,
    mut lookup: F,
) -> Vec<Vec<f64>>
where
    F: FnMut(i64, i64) -> Option<f64>,
{
    let mut elevations = vec![vec![FILL_VALUE; request.width]; request.height];
    let (area_width, area_height) = request.clipped_size(grid_width, grid_height);

    for dx in 0..area_width {
        for dy in 0..area_height {
            // Offsets past i64::MAX can never be inside the grid
            let (Some(x), Some(y)) = (
                request.origin_x.checked_add(dx as i64),
                request.origin_y.checked_add(dy as i64),
            ) else {
                continue;
            };

            let row = (request.height - 1) - dy;
            let col = dx;

            // Out-of-bounds pixels keep the fill value
            if let Some(value) = lookup(x, y) {
                elevations[row][col] = value;
            }
        }
    }

    elevations
}

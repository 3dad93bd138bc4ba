//! Data source trait for populating columns of a point table

use crate::dataset::PointData;
use crate::error::{Axis, Error, Result};

/// A readable point table that can fill a buffer for arbitrary row and dimension lists
pub trait DataSource: Send + Sync {
    /// Number of rows available
    fn num_rows(&self) -> usize;

    /// Number of dimensions available
    fn num_dimensions(&self) -> usize;

    /// Dimension names in column order
    fn dimension_names(&self) -> Vec<String>;

    /// Write `rows.len() * dims.len()` values into `out`, row-major by (row, then dimension)
    ///
    /// Implementations must not write anything when an index is out of bounds.
    fn populate_data_for_dimensions(&self, out: &mut [f32], dims: &[usize], rows: &[usize]) -> Result<()>;
}

/// Check every row and dimension index against the bounds of `source`
pub fn check_bounds<S: DataSource + ?Sized>(source: &S, dims: &[usize], rows: &[usize]) -> Result<()> {
    let num_rows = source.num_rows();
    if let Some(&index) = rows.iter().find(|&&r| r >= num_rows) {
        return Err(Error::OutOfRange {
            axis: Axis::Row,
            index,
            bound: num_rows,
        });
    }

    let num_dims = source.num_dimensions();
    if let Some(&index) = dims.iter().find(|&&d| d >= num_dims) {
        return Err(Error::OutOfRange {
            axis: Axis::Dimension,
            index,
            bound: num_dims,
        });
    }

    Ok(())
}

impl DataSource for PointData {
    fn num_rows(&self) -> usize {
        self.row_count()
    }

    fn num_dimensions(&self) -> usize {
        self.dimension_count()
    }

    fn dimension_names(&self) -> Vec<String> {
        PointData::dimension_names(self).to_vec()
    }

    fn populate_data_for_dimensions(&self, out: &mut [f32], dims: &[usize], rows: &[usize]) -> Result<()> {
        let expected = rows.len() * dims.len();
        if out.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: out.len(),
            });
        }
        check_bounds(self, dims, rows)?;

        let stride = self.dimension_count();
        let values = self.values();
        for (out_row, &row) in out.chunks_exact_mut(dims.len().max(1)).zip(rows) {
            let src = &values[row * stride..(row + 1) * stride];
            for (slot, &dim) in out_row.iter_mut().zip(dims) {
                *slot = src[dim];
            }
        }

        Ok(())
    }
}

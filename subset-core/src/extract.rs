//! Dense extraction of row/dimension slices from a data source

use serde::{Deserialize, Serialize};

use crate::dataset::PointData;
use crate::error::Result;
use crate::source::{check_bounds, DataSource};

/// Memory order of an extracted buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Values of one row are contiguous
    #[default]
    RowMajor,

    /// Values of one dimension are contiguous
    ColumnMajor,
}

/// All dimension indices of `source`, `0..num_dimensions`
pub fn all_dimensions<S: DataSource + ?Sized>(source: &S) -> Vec<usize> {
    (0..source.num_dimensions()).collect()
}

/// Extract `rows x dims` values from `source`, row-major in the given order
///
/// The order of `rows` becomes the row order of the result. Any out-of-bounds
/// index fails the whole call before anything is copied.
pub fn extract<S: DataSource + ?Sized>(source: &S, rows: &[usize], dims: &[usize]) -> Result<Vec<f32>> {
    check_bounds(source, dims, rows)?;

    let mut out = vec![0.0; rows.len() * dims.len()];
    source.populate_data_for_dimensions(&mut out, dims, rows)?;
    Ok(out)
}

/// Extract in the requested layout
pub fn extract_with_layout<S: DataSource + ?Sized>(
    source: &S,
    rows: &[usize],
    dims: &[usize],
    layout: Layout,
) -> Result<Vec<f32>> {
    let row_major = extract(source, rows, dims)?;

    match layout {
        Layout::RowMajor => Ok(row_major),
        Layout::ColumnMajor => Ok(transpose(&row_major, rows.len(), dims.len())),
    }
}

/// Copy every dimension of `source` at `rows` into a new table, names included
pub fn extract_points<S: DataSource + ?Sized>(source: &S, rows: &[usize]) -> Result<PointData> {
    let dims = all_dimensions(source);
    let values = extract(source, rows, &dims)?;
    PointData::new(rows.len(), source.dimension_names(), values)
}

fn transpose(values: &[f32], rows: usize, cols: usize) -> Vec<f32> {
    let mut out = vec![0.0; values.len()];
    for r in 0..rows {
        for c in 0..cols {
            out[c * rows + r] = values[r * cols + c];
        }
    }
    out
}

//! Point datasets and dataset identity

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Axis, Error, Result};

/// Opaque handle identifying an artifact in the host's dataset hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Create a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The kind of artifact a dataset handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// A row/column numeric table
    Points,

    /// A partition of a parent dataset's rows into clusters
    Clusters,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Points => f.write_str("Points"),
            DataKind::Clusters => f.write_str("Cluster"),
        }
    }
}

/// A dense `row_count x dimension_count` table of `f32` values stored row-major,
/// together with the names of its dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointDataRepr", into = "PointDataRepr")]
pub struct PointData {
    /// Number of rows
    row_count: usize,

    /// One name per dimension
    dimension_names: Vec<String>,

    /// Row-major values, `row_count * dimension_names.len()` long
    values: Vec<f32>,
}

impl PointData {
    /// Create a table from a row-major buffer
    ///
    /// Fails if `values.len() != row_count * dimension_names.len()`.
    pub fn new(row_count: usize, dimension_names: Vec<String>, values: Vec<f32>) -> Result<Self> {
        let expected = row_count * dimension_names.len();
        if values.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: values.len(),
            });
        }

        Ok(Self {
            row_count,
            dimension_names,
            values,
        })
    }

    /// Create a table from nested rows, validating that every row has one value per dimension
    pub fn from_rows(dimension_names: Vec<String>, rows: &[Vec<f32>]) -> Result<Self> {
        let dims = dimension_names.len();
        let mut values = Vec::with_capacity(rows.len() * dims);

        for row in rows {
            if row.len() != dims {
                return Err(Error::DimensionMismatch {
                    expected: dims,
                    found: row.len(),
                });
            }
            values.extend_from_slice(row);
        }

        Self::new(rows.len(), dimension_names, values)
    }

    /// Create a table with generated dimension names `Dim 0`, `Dim 1`, ...
    pub fn with_default_names(row_count: usize, dimension_count: usize, values: Vec<f32>) -> Result<Self> {
        let names = (0..dimension_count).map(|i| format!("Dim {i}")).collect();
        Self::new(row_count, names, values)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of dimensions
    pub fn dimension_count(&self) -> usize {
        self.dimension_names.len()
    }

    /// Dimension names in column order
    pub fn dimension_names(&self) -> &[String] {
        &self.dimension_names
    }

    /// Rename the dimensions; the number of names must not change
    pub fn set_dimension_names(&mut self, names: Vec<String>) -> Result<()> {
        if names.len() != self.dimension_names.len() {
            return Err(Error::DimensionMismatch {
                expected: self.dimension_names.len(),
                found: names.len(),
            });
        }
        self.dimension_names = names;
        Ok(())
    }

    /// The raw row-major buffer
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Get a single row
    pub fn row(&self, index: usize) -> Result<&[f32]> {
        if index >= self.row_count {
            return Err(Error::OutOfRange {
                axis: Axis::Row,
                index,
                bound: self.row_count,
            });
        }

        let dims = self.dimension_count();
        Ok(&self.values[index * dims..(index + 1) * dims])
    }

    /// Get a single value
    pub fn value(&self, row: usize, dimension: usize) -> Result<f32> {
        let dims = self.dimension_count();
        if dimension >= dims {
            return Err(Error::OutOfRange {
                axis: Axis::Dimension,
                index: dimension,
                bound: dims,
            });
        }

        Ok(self.row(row)?[dimension])
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // not chunks_exact: a table without dimensions still has rows
        let dims = self.dimension_count();
        (0..self.row_count).map(move |i| &self.values[i * dims..(i + 1) * dims])
    }

    /// Consume the table into `(row_count, dimension_names, values)`
    pub fn into_parts(self) -> (usize, Vec<String>, Vec<f32>) {
        (self.row_count, self.dimension_names, self.values)
    }
}

/// Serialized form of [`PointData`]: dimension names plus nested rows
#[derive(Serialize, Deserialize)]
struct PointDataRepr {
    dimensions: Vec<String>,
    rows: Vec<Vec<f32>>,
}

impl TryFrom<PointDataRepr> for PointData {
    type Error = Error;

    fn try_from(repr: PointDataRepr) -> Result<Self> {
        PointData::from_rows(repr.dimensions, &repr.rows)
    }
}

impl From<PointData> for PointDataRepr {
    fn from(data: PointData) -> Self {
        let rows = data.rows().map(<[f32]>::to_vec).collect();
        Self {
            dimensions: data.dimension_names,
            rows,
        }
    }
}

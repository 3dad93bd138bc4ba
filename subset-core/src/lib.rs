//! Core data structures and algorithms for creating subsets from selections
//!
//! This crate holds everything that does not depend on a host application:
//! point tables, cluster partitions, the index mapping a selection induces,
//! dense extraction of selected rows and the remapping of clusters onto the
//! rows of a subset.

#![warn(missing_docs)]

pub mod cluster;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod index_set;
pub mod lock;
pub mod remap;
pub mod source;

// Re-export key types for convenience
pub use cluster::{Cluster, Color, Partition};
pub use dataset::{DataKind, DatasetId, PointData};
pub use error::{Axis, Error, Result};
pub use extract::{all_dimensions, extract, extract_points, extract_with_layout, Layout};
pub use index_set::IndexSet;
pub use lock::{DatasetLock, LockGuard};
pub use remap::{remap_cluster, remap_partition};
pub use source::DataSource;

static_assertions::assert_impl_all!(PointData: Send, Sync);
static_assertions::assert_impl_all!(Partition: Send, Sync);
static_assertions::assert_impl_all!(IndexSet: Send, Sync);

//! Interfaces to the application hosting the dataset hierarchy
//!
//! The transforms never own datasets. They read through [`DatasetStore`] and
//! [`SelectionProvider`], create through [`DatasetFactory`] and report
//! through [`NotificationSink`].

use subset_core::{Cluster, DataKind, DataSource, DatasetId, DatasetLock, Partition, Result};

use crate::options::SubsetOptions;

/// A dependent artifact of a dataset, tagged by how its rows relate to the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependent {
    /// A point table sharing the parent's row numbering
    Points(DatasetId),

    /// A cluster partition whose indices are parent rows
    Clusters(DatasetId),
}

impl Dependent {
    /// Build from a handle and its kind
    pub fn new(id: DatasetId, kind: DataKind) -> Self {
        match kind {
            DataKind::Points => Dependent::Points(id),
            DataKind::Clusters => Dependent::Clusters(id),
        }
    }

    /// The dependent's handle
    pub fn id(&self) -> DatasetId {
        match *self {
            Dependent::Points(id) | Dependent::Clusters(id) => id,
        }
    }

    /// The dependent's kind
    pub fn kind(&self) -> DataKind {
        match self {
            Dependent::Points(_) => DataKind::Points,
            Dependent::Clusters(_) => DataKind::Clusters,
        }
    }
}

/// Read access to the host's datasets
pub trait DatasetStore: DatasetLock {
    /// Whether `id` refers to a live dataset
    fn is_valid(&self, id: DatasetId) -> bool;

    /// Display name
    fn gui_name(&self, id: DatasetId) -> Result<String>;

    /// Kind of artifact behind `id`
    fn data_kind(&self, id: DatasetId) -> Result<DataKind>;

    /// Direct dependents in creation order
    fn children(&self, id: DatasetId) -> Result<Vec<Dependent>>;

    /// Resolve a handle (possibly a view) to the full dataset holding its data
    fn full_dataset(&self, id: DatasetId) -> Result<DatasetId>;

    /// Point data of a full dataset
    fn points(&self, id: DatasetId) -> Result<&dyn DataSource>;

    /// Clusters of a full dataset
    fn clusters(&self, id: DatasetId) -> Result<&Partition>;
}

/// Yields the currently selected rows of a dataset
pub trait SelectionProvider {
    /// Selected row indices; an empty list is a valid answer
    fn selection(&self, id: DatasetId) -> Result<Vec<usize>>;
}

/// Creates and fills new artifacts in the host
pub trait DatasetFactory {
    /// Create an empty dataset of `kind`, optionally under `parent`
    fn create_dataset(&mut self, kind: DataKind, name: &str, parent: Option<DatasetId>) -> Result<DatasetId>;

    /// Create an empty point dataset derived from (and placed under) `parent`
    fn create_derived_dataset(&mut self, name: &str, parent: DatasetId) -> Result<DatasetId>;

    /// Set the row-major values of a point dataset
    fn set_data(&mut self, id: DatasetId, values: Vec<f32>, rows: usize, dimensions: usize) -> Result<()>;

    /// Set the dimension names of a point dataset
    fn set_dimension_names(&mut self, id: DatasetId, names: Vec<String>) -> Result<()>;

    /// Append a cluster to a cluster dataset
    fn add_cluster(&mut self, id: DatasetId, cluster: Cluster) -> Result<()>;

    /// Attach a free-form property to a dataset
    fn set_property(&mut self, id: DatasetId, key: &str, value: &str) -> Result<()>;
}

/// Receives notifications about datasets once a build has completed
pub trait NotificationSink {
    /// A new artifact was added to the hierarchy
    fn dataset_added(&mut self, id: DatasetId);

    /// The data of an artifact changed
    fn dataset_data_changed(&mut self, id: DatasetId);
}

/// Asks the user for extended-mode options
pub trait OptionInput {
    /// The chosen options, or `None` when the request was cancelled
    fn request_options(&mut self) -> Option<SubsetOptions>;
}

/// Everything a transform needs from its host
pub trait Host: DatasetStore + SelectionProvider + DatasetFactory {}

impl<T: DatasetStore + SelectionProvider + DatasetFactory + ?Sized> Host for T {}

/// Sink that only logs notifications
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn dataset_added(&mut self, id: DatasetId) {
        tracing::info!(%id, "dataset added");
    }

    fn dataset_data_changed(&mut self, id: DatasetId) {
        tracing::debug!(%id, "dataset data changed");
    }
}

/// Option input that always answers with the same options
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedOptions(pub Option<SubsetOptions>);

impl OptionInput for FixedOptions {
    fn request_options(&mut self) -> Option<SubsetOptions> {
        self.0
    }
}

//! Subset-from-selection transforms over a host dataset hierarchy
//!
//! A transform takes the current selection of each input point dataset,
//! extracts the selected rows into a new dataset and, in extended mode,
//! carries the selection over to the dataset's dependents: point tables are
//! extracted at the same rows and cluster partitions are remapped onto the
//! subset's row numbering.
//!
//! The host application is reached only through the traits in [`host`].
//! [`memory::InMemoryHost`] implements all of them for tests and tools.

#![warn(missing_docs)]

mod error;

pub mod builder;
pub mod config;
pub mod host;
pub mod memory;
pub mod options;
pub mod register;
pub mod scenario;
pub mod selector;

pub use builder::{DerivedArtifact, DerivedContent, SubsetBuilder, SubsetTree};
pub use config::SubsetConfig;
pub use error::{Error, Result};
pub use host::{
    DatasetFactory, DatasetStore, Dependent, FixedOptions, Host, LoggingSink, NotificationSink, OptionInput,
    SelectionProvider,
};
pub use memory::{InMemoryHost, RecordingSink};
pub use options::{collect_options, Placement, SubsetOptions};
pub use register::{register_tree, RegisteredTree};
pub use scenario::{Scenario, ScenarioNode};
pub use selector::{trigger_actions, CreatedSubset, SkippedDataset, SubsetTransform, TransformReport, TransformType, TriggerAction};

// Re-export core types
pub use subset_core::{Cluster, Color, DataKind, DatasetId, Partition, PointData};

static_assertions::assert_impl_all!(InMemoryHost: Send, Sync);
static_assertions::assert_impl_all!(SubsetTree: Send, Sync);

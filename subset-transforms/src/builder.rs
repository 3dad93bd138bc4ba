//! Builds a subset dataset and its derived dependents from a selection

use subset_core::{extract_points, remap_partition, DataKind, DatasetId, Error, IndexSet, LockGuard, Partition, PointData, Result};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SubsetConfig;
use crate::host::{DatasetStore, Dependent};
use crate::options::{Placement, SubsetOptions};

/// Content of a derived dependent
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedContent {
    /// Point table row-aligned with the subset
    Points(PointData),

    /// Partition remapped onto the subset's rows
    Clusters(Partition),
}

/// A dependent produced for the subset
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedArtifact {
    /// The dependent of the source this was derived from
    pub origin: DatasetId,

    /// Display name, copied from the origin
    pub name: String,

    /// Extracted or remapped content
    pub content: DerivedContent,
}

/// A fully built subset, not yet registered with the host
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetTree {
    /// Dataset the subset was taken from
    pub source: DatasetId,

    /// Display name of the subset
    pub name: String,

    /// Where the subset goes in the hierarchy
    pub placement: Placement,

    /// The selected rows of the source, all dimensions
    pub data: PointData,

    /// Derived dependents, in the child order of the source
    pub children: Vec<DerivedArtifact>,
}

impl SubsetTree {
    /// Number of artifacts the tree will create, the subset itself included
    pub fn artifact_count(&self) -> usize {
        1 + self.children.len()
    }
}

/// Extracts subsets from datasets in a [`DatasetStore`]
pub struct SubsetBuilder<'a, S: DatasetStore + ?Sized> {
    store: &'a S,
    config: &'a SubsetConfig,
}

impl<'a, S: DatasetStore + ?Sized> SubsetBuilder<'a, S> {
    /// Create a builder reading from `store`
    pub fn new(store: &'a S, config: &'a SubsetConfig) -> Self {
        Self { store, config }
    }

    /// Build the subset of `source` at `selection`
    ///
    /// `source` may be a view; rows are read from the full dataset behind it,
    /// which stays locked while they are copied. Options are taken as given;
    /// callers normalize them when collecting. Dependents that cannot be
    /// resolved are logged and skipped. An out-of-range index in any
    /// extraction fails the whole build.
    pub fn build(&self, source: DatasetId, selection: Vec<usize>, options: SubsetOptions) -> Result<SubsetTree> {
        let full = self.resolve(source, DataKind::Points)?;
        let source_name = self.store.gui_name(source)?;
        let index_set = IndexSet::build(&source_name, selection)?;

        let data = {
            let _guard = (full != source).then(|| LockGuard::acquire(self.store, full));
            extract_points(self.store.points(full)?, index_set.ordered())?
        };

        let children = if options.include_children {
            self.derive_children(source, &index_set)?
        } else {
            Vec::new()
        };

        Ok(SubsetTree {
            source,
            name: self.config.subset_name(&source_name),
            placement: options.placement(source),
            data,
            children,
        })
    }

    fn derive_children(&self, source: DatasetId, index_set: &IndexSet) -> Result<Vec<DerivedArtifact>> {
        let dependents = self.store.children(source)?;

        #[cfg(feature = "parallel")]
        let derived = dependents
            .par_iter()
            .map(|dependent| self.derive(*dependent, index_set))
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let derived = dependents
            .iter()
            .map(|dependent| self.derive(*dependent, index_set))
            .collect::<Result<Vec<_>>>()?;

        Ok(derived.into_iter().flatten().collect())
    }

    /// `Ok(None)` when the dependent cannot be resolved
    fn derive(&self, dependent: Dependent, index_set: &IndexSet) -> Result<Option<DerivedArtifact>> {
        let origin = dependent.id();
        let full = match self.resolve(origin, dependent.kind()) {
            Ok(full) => full,
            Err(err @ Error::InvalidDataset(_)) => {
                warn!(child = %origin, error = %err, "skipping dependent");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let name = self.store.gui_name(origin)?;

        let _guard = LockGuard::acquire(self.store, full);
        let content = match dependent {
            Dependent::Points(_) => {
                let points = self.store.points(full)?;
                DerivedContent::Points(extract_points(points, index_set.ordered())?)
            }
            Dependent::Clusters(_) => {
                let partition = self.store.clusters(full)?;
                let remapped = remap_partition(partition, index_set);
                debug!(
                    child = %name,
                    kept = remapped.len(),
                    dropped = partition.len() - remapped.len(),
                    "remapped clusters"
                );
                DerivedContent::Clusters(remapped)
            }
        };

        Ok(Some(DerivedArtifact { origin, name, content }))
    }

    /// Resolve a handle to the full dataset holding its data, checking the kind
    fn resolve(&self, id: DatasetId, expected: DataKind) -> Result<DatasetId> {
        if !self.store.is_valid(id) {
            return Err(Error::InvalidDataset(format!("{id} is not a live dataset")));
        }

        let full = self.store.full_dataset(id)?;
        let kind = self.store.data_kind(full)?;
        if kind != expected {
            return Err(Error::InvalidDataset(format!(
                "{id} resolved to {kind} data, expected {expected}"
            )));
        }
        Ok(full)
    }
}

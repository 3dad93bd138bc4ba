//! Hands a built subset tree to the host

use subset_core::{DataKind, DatasetId, PointData, Result};
use tracing::{debug, warn};

use crate::builder::{DerivedContent, SubsetTree};
use crate::host::DatasetFactory;

/// Handles created for one subset tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTree {
    /// The subset dataset
    pub root: DatasetId,

    /// Derived dependents, in the order they were created
    pub children: Vec<DatasetId>,
}

impl RegisteredTree {
    /// Root followed by children
    pub fn all(&self) -> impl Iterator<Item = DatasetId> + '_ {
        std::iter::once(self.root).chain(self.children.iter().copied())
    }
}

/// Create every artifact of `tree` in the host
///
/// The factory cannot remove datasets, so a failure part way leaves the
/// artifacts created so far in the host. Their ids are logged at `warn`.
pub fn register_tree<F: DatasetFactory + ?Sized>(factory: &mut F, tree: SubsetTree) -> Result<RegisteredTree> {
    let mut created = Vec::with_capacity(tree.artifact_count());
    let source = tree.source;

    register_into(factory, tree, &mut created).map_err(|error| {
        if !created.is_empty() {
            let orphaned: Vec<String> = created.iter().map(ToString::to_string).collect();
            warn!(%source, %error, orphaned = %orphaned.join(", "), "registration failed, artifacts left in host");
        }
        error
    })
}

fn register_into<F: DatasetFactory + ?Sized>(
    factory: &mut F,
    tree: SubsetTree,
    created: &mut Vec<DatasetId>,
) -> Result<RegisteredTree> {
    let root = factory.create_dataset(DataKind::Points, &tree.name, tree.placement.parent())?;
    created.push(root);
    fill_points(factory, root, tree.data)?;

    let mut children = Vec::with_capacity(tree.children.len());
    for artifact in tree.children {
        let id = match artifact.content {
            DerivedContent::Points(data) => {
                let id = factory.create_derived_dataset(&artifact.name, root)?;
                created.push(id);
                fill_points(factory, id, data)?;
                id
            }
            DerivedContent::Clusters(partition) => {
                let id = factory.create_dataset(DataKind::Clusters, &artifact.name, Some(root))?;
                created.push(id);
                for cluster in partition {
                    factory.add_cluster(id, cluster)?;
                }
                id
            }
        };
        debug!(name = %artifact.name, %id, origin = %artifact.origin, "registered dependent");
        children.push(id);
    }

    Ok(RegisteredTree { root, children })
}

fn fill_points<F: DatasetFactory + ?Sized>(factory: &mut F, id: DatasetId, data: PointData) -> Result<()> {
    let (rows, names, values) = data.into_parts();
    factory.set_data(id, values, rows, names.len())?;
    factory.set_dimension_names(id, names)
}

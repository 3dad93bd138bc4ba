//! Projection of clusters onto a subset's row numbering

use tracing::trace;

use crate::cluster::{Cluster, Partition};
use crate::index_set::IndexSet;

/// Remap a cluster's indices through `mapping`
///
/// Indices outside the selection are dropped. Returns `None` when no index
/// survives; every other attribute of the cluster is copied unchanged.
pub fn remap_cluster(cluster: &Cluster, mapping: &IndexSet) -> Option<Cluster> {
    let remapped: Vec<u32> = cluster
        .indices()
        .iter()
        .filter_map(|&idx| mapping.get_cluster_index(idx))
        .collect();

    if remapped.is_empty() {
        trace!(cluster = cluster.name(), "cluster has no selected rows, dropping");
        return None;
    }

    let mut out = cluster.clone();
    out.set_indices(remapped);
    Some(out)
}

/// Remap every cluster of a partition, keeping the order of the clusters that survive
pub fn remap_partition(partition: &Partition, mapping: &IndexSet) -> Partition {
    Partition::from_clusters(partition.iter().filter_map(|cluster| remap_cluster(cluster, mapping)))
}

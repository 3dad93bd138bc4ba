//! Ordered row selections and the old-to-new index mapping they induce

use std::collections::HashMap;

use crate::error::{Error, Result};

/// The rows chosen for one extraction pass, in visiting order, with the
/// mapping from each chosen source row to its dense position in the subset
///
/// `mapping[ordered[k]] == k` for every `k`; rows outside the selection have no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSet {
    /// Selected source rows in insertion order
    ordered: Vec<usize>,

    /// Source row -> subset row
    mapping: HashMap<usize, usize>,
}

impl IndexSet {
    /// Build from a selection, keeping the iteration order of the input
    ///
    /// Repeated indices keep their first position. An empty selection is an
    /// [`Error::EmptySelection`] for `dataset`. Subset rows must fit the `u32`
    /// cluster index type, so more than `u32::MAX` distinct rows is an
    /// [`Error::InvalidArgument`].
    pub fn build<I>(dataset: &str, selection: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let selection = selection.into_iter();
        let (lower, _) = selection.size_hint();
        let mut ordered = Vec::with_capacity(lower);
        let mut mapping = HashMap::with_capacity(lower);

        for row in selection {
            if let std::collections::hash_map::Entry::Vacant(slot) = mapping.entry(row) {
                slot.insert(ordered.len());
                ordered.push(row);
            }
        }

        if ordered.is_empty() {
            return Err(Error::EmptySelection {
                dataset: dataset.to_string(),
            });
        }
        check_len(dataset, ordered.len())?;

        Ok(Self { ordered, mapping })
    }

    /// Selected source rows in subset order
    pub fn ordered(&self) -> &[usize] {
        &self.ordered
    }

    /// Subset row for a source row, if the row is selected
    pub fn get(&self, source_row: usize) -> Option<usize> {
        self.mapping.get(&source_row).copied()
    }

    /// Subset row for a cluster index, if the row is selected
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_cluster_index(&self, source_row: u32) -> Option<u32> {
        // build caps the selection at u32::MAX rows
        self.get(source_row as usize).map(|new| new as u32)
    }

    /// Number of selected rows, which is also the subset's row count
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Always `false`: construction rejects empty selections
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

fn check_len(dataset: &str, len: usize) -> Result<()> {
    if u32::try_from(len).is_err() {
        return Err(Error::InvalidArgument(format!(
            "selection of {len} rows in {dataset} exceeds the cluster index range"
        )));
    }
    Ok(())
}

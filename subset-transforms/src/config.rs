//! Naming and bookkeeping configuration for subset transforms

use serde::{Deserialize, Serialize};

/// Configuration for subset transforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsetConfig {
    /// Appended to the source's name to name the subset
    pub subset_suffix: String,

    /// Property key set on each source dataset after a successful transform
    pub transformed_by_key: String,

    /// Value stored under `transformed_by_key`
    pub transform_name: String,
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            subset_suffix: "_Subset".to_string(),
            transformed_by_key: "Last transformed by".to_string(),
            transform_name: "SubsetFromSelection".to_string(),
        }
    }
}

impl SubsetConfig {
    /// Name of the subset created from a dataset called `source_name`
    pub fn subset_name(&self, source_name: &str) -> String {
        format!("{source_name}{}", self.subset_suffix)
    }
}

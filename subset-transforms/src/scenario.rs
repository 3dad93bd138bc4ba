//! JSON description of a dataset hierarchy with selections
//!
//! ```json
//! {
//!   "config": { "subset_suffix": "_Subset" },
//!   "datasets": [
//!     {
//!       "type": "points",
//!       "name": "cells",
//!       "data": { "dimensions": ["x", "y"], "rows": [[1, 2], [3, 4]] },
//!       "selection": [1],
//!       "children": [
//!         { "type": "clusters", "name": "louvain", "clusters": [{ "name": "A", "indices": [0, 1] }] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use subset_core::{DatasetId, Partition, PointData};

use crate::config::SubsetConfig;
use crate::error::{Error, Result};
use crate::memory::InMemoryHost;

/// A dataset and its dependents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioNode {
    /// A point table
    Points {
        /// Display name
        name: String,
        /// Table contents
        data: PointData,
        /// Selected rows
        #[serde(default)]
        selection: Vec<usize>,
        /// Dependents
        #[serde(default)]
        children: Vec<ScenarioNode>,
    },

    /// A cluster partition over the parent's rows
    Clusters {
        /// Display name
        name: String,
        /// Clusters in order
        clusters: Partition,
    },
}

/// A complete hierarchy plus configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    /// Overrides of the default configuration
    #[serde(default)]
    pub config: SubsetConfig,

    /// Top-level datasets, which are the transform inputs
    pub datasets: Vec<ScenarioNode>,
}

impl Scenario {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Materialize into an in-memory host, returning the top-level dataset handles
    pub fn into_host(self) -> Result<(InMemoryHost, Vec<DatasetId>)> {
        let mut host = InMemoryHost::new();
        let mut inputs = Vec::with_capacity(self.datasets.len());

        for node in self.datasets {
            match node {
                ScenarioNode::Points { .. } => inputs.push(insert(&mut host, node, None)?),
                ScenarioNode::Clusters { name, .. } => {
                    return Err(Error::Scenario(format!(
                        "top-level dataset '{name}' must be a point table"
                    )));
                }
            }
        }

        Ok((host, inputs))
    }
}

fn insert(host: &mut InMemoryHost, node: ScenarioNode, parent: Option<DatasetId>) -> Result<DatasetId> {
    match node {
        ScenarioNode::Points {
            name,
            data,
            selection,
            children,
        } => {
            let id = host.add_points(&name, data, parent);
            host.set_selection(id, selection)?;
            for child in children {
                insert(host, child, Some(id))?;
            }
            Ok(id)
        }
        ScenarioNode::Clusters { name, clusters } => {
            let parent = parent.ok_or_else(|| Error::Scenario(format!("clusters '{name}' need a parent")))?;
            Ok(host.add_clusters(&name, clusters, parent))
        }
    }
}

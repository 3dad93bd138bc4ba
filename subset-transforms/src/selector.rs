//! The two subset transforms and their batch driver

use std::fmt;

use serde::{Deserialize, Serialize};
use subset_core::{DataKind, DatasetId, Error, LockGuard, Result};
use tracing::{info, info_span, warn};

use crate::builder::SubsetBuilder;
use crate::config::SubsetConfig;
use crate::host::{Host, NotificationSink, OptionInput};
use crate::options::{collect_options, SubsetOptions};
use crate::register::{register_tree, RegisteredTree};

/// Which subset transform to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformType {
    /// Subset of the selection, placed under its source, no dependents
    Simple,

    /// Subset with user options for placement and dependent propagation
    Extended,
}

impl TransformType {
    /// All transform types, in menu order
    pub const ALL: [TransformType; 2] = [TransformType::Simple, TransformType::Extended];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TransformType::Simple => "Create subset",
            TransformType::Extended => "Create subset with extended options",
        }
    }
}

impl fmt::Display for TransformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An invocable entry for a set of input datasets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerAction {
    /// Transform run by this action
    pub transform: TransformType,

    /// Menu path
    pub title: String,

    /// Tooltip text
    pub description: String,
}

/// Actions offered for inputs of the given kinds
///
/// Both actions apply only when there is at least one input and every input is a point table.
pub fn trigger_actions(kinds: &[DataKind]) -> Vec<TriggerAction> {
    if kinds.is_empty() || kinds.iter().any(|k| *k != DataKind::Points) {
        return Vec::new();
    }

    TransformType::ALL
        .iter()
        .map(|&transform| TriggerAction {
            transform,
            title: format!("SubsetFromSelection/{}", transform.name()),
            description: format!("Perform {} data transformation", transform.name()),
        })
        .collect()
}

/// A subset created for one input dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSubset {
    /// The input dataset
    pub source: DatasetId,

    /// Handles created in the host
    pub artifacts: RegisteredTree,
}

/// An input dataset that produced no subset
#[derive(Debug)]
pub struct SkippedDataset {
    /// The input dataset
    pub source: DatasetId,

    /// Why it was skipped
    pub error: Error,
}

/// Outcome of one batch
#[derive(Debug, Default)]
pub struct TransformReport {
    /// Subsets created, in input order
    pub created: Vec<CreatedSubset>,

    /// Inputs skipped, in input order
    pub skipped: Vec<SkippedDataset>,
}

impl TransformReport {
    /// Whether every input produced a subset
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Runs a subset transform over a batch of input datasets
#[derive(Debug, Clone)]
pub struct SubsetTransform {
    transform: TransformType,
    config: SubsetConfig,
}

impl SubsetTransform {
    /// Create a transform of the given type
    pub fn new(transform: TransformType, config: SubsetConfig) -> Self {
        Self { transform, config }
    }

    /// The transform type
    pub fn transform_type(&self) -> TransformType {
        self.transform
    }

    /// The configuration
    pub fn config(&self) -> &SubsetConfig {
        &self.config
    }

    /// Run over `inputs`
    ///
    /// Extended mode asks `input` for options once, before touching any
    /// dataset; a cancelled request fails the whole batch with
    /// [`Error::UserCancelled`]. Every other failure only skips the dataset it
    /// occurred on. Notifications for a dataset are sent once its subset is
    /// fully registered.
    pub fn run<H, O, N>(&self, host: &mut H, inputs: &[DatasetId], input: &mut O, sink: &mut N) -> Result<TransformReport>
    where
        H: Host + ?Sized,
        O: OptionInput + ?Sized,
        N: NotificationSink + ?Sized,
    {
        let mut report = TransformReport::default();
        if inputs.is_empty() {
            return Ok(report);
        }

        let options = match self.transform {
            TransformType::Simple => SubsetOptions::simple(),
            TransformType::Extended => collect_options(input)?,
        };

        for &source in inputs {
            match self.run_one(host, source, options) {
                Ok(artifacts) => {
                    for id in artifacts.all() {
                        sink.dataset_added(id);
                    }
                    for id in artifacts.all() {
                        sink.dataset_data_changed(id);
                    }
                    report.created.push(CreatedSubset { source, artifacts });
                }
                Err(error) if error.is_recoverable() => {
                    warn!(%source, %error, "skipping dataset");
                    report.skipped.push(SkippedDataset { source, error });
                }
                Err(error) => return Err(error),
            }
        }

        Ok(report)
    }

    fn run_one<H: Host + ?Sized>(&self, host: &mut H, source: DatasetId, options: SubsetOptions) -> Result<RegisteredTree> {
        if !host.is_valid(source) {
            return Err(Error::InvalidDataset(format!("{source} is not a live dataset")));
        }
        let kind = host.data_kind(source)?;
        if kind != DataKind::Points {
            return Err(Error::InvalidDataset(format!("{source} holds {kind} data, expected Points")));
        }

        let name = host.gui_name(source)?;
        let _span = info_span!("subset", dataset = %name, transform = %self.transform).entered();

        let selection = host.selection(source)?;
        let tree = {
            let _guard = LockGuard::acquire(&*host, source);
            SubsetBuilder::new(&*host, &self.config).build(source, selection, options)?
        };

        let rows = tree.data.row_count();
        let registered = register_tree(host, tree)?;
        host.set_property(source, &self.config.transformed_by_key, &self.config.transform_name)?;

        info!(subset = %registered.root, rows, dependents = registered.children.len(), "created subset");
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_require_point_inputs() {
        assert!(trigger_actions(&[]).is_empty());
        assert!(trigger_actions(&[DataKind::Points, DataKind::Clusters]).is_empty());

        let actions = trigger_actions(&[DataKind::Points, DataKind::Points]);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].title, "SubsetFromSelection/Create subset");
        assert_eq!(
            actions[1].description,
            "Perform Create subset with extended options data transformation"
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(TransformType::Simple.to_string(), "Create subset");
        assert_eq!(TransformType::Extended.name(), "Create subset with extended options");
    }
}

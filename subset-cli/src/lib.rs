//! Command line front end for subset-from-selection transforms

use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Serialize;
use subset_core::{DatasetId, PointData};
use subset_transforms::memory::SnapshotNode;
use subset_transforms::{
    trigger_actions, DataKind, DatasetStore, FixedOptions, LoggingSink, Scenario, SubsetOptions, SubsetTransform,
    TransformReport, TransformType,
};

/// Transform to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Create subset
    Simple,
    /// Create subset with extended options
    Extended,
}

impl From<Mode> for TransformType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Simple => TransformType::Simple,
            Mode::Extended => TransformType::Extended,
        }
    }
}

/// Create subsets from the selections in a scenario file.
#[derive(Debug, clap::Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON scenario describing datasets, dependents and selections.
    pub scenario: PathBuf,

    /// Which transform to run.
    #[clap(long, value_enum, default_value = "simple")]
    pub mode: Mode,

    /// Extended mode: carry the selection over to dependent datasets.
    #[clap(long)]
    pub include_children: bool,

    /// Extended mode: attach the subset under its source.
    #[clap(long)]
    pub as_child: bool,

    /// Extended mode: behave as if the option prompt was cancelled.
    #[clap(long)]
    pub cancel: bool,

    /// List the actions available for the scenario's inputs and exit.
    #[clap(long)]
    pub list_actions: bool,

    /// Write the result here instead of stdout.
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Options answered to the extended transform's prompt
    pub fn options(&self) -> FixedOptions {
        if self.cancel {
            FixedOptions(None)
        } else {
            FixedOptions(Some(SubsetOptions {
                include_children: self.include_children,
                create_subset_as_child: self.as_child,
            }))
        }
    }
}

/// An input that produced no subset
#[derive(Debug, Serialize)]
pub struct SkippedOutput {
    /// Input handle
    pub source: DatasetId,
    /// Reason
    pub error: String,
}

/// Result of one run
#[derive(Debug, Serialize)]
pub struct RunOutput {
    /// Transform that ran
    pub transform: String,
    /// Handles of created subsets
    pub created: Vec<DatasetId>,
    /// Inputs that were skipped
    pub skipped: Vec<SkippedOutput>,
    /// Full hierarchy after the run
    pub hierarchy: Vec<SnapshotNode>,
}

/// Run the command described by `args`, returning the JSON to print
pub fn run(args: &Args) -> anyhow::Result<String> {
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;
    let config = scenario.config.clone();
    let (mut host, inputs) = scenario.into_host().context("invalid scenario")?;
    tracing::debug!(path = %args.scenario.display(), inputs = inputs.len(), "loaded scenario");

    let kinds = inputs
        .iter()
        .map(|&id| host.data_kind(id))
        .collect::<subset_core::Result<Vec<DataKind>>>()?;
    let actions = trigger_actions(&kinds);

    if args.list_actions {
        let titles: Vec<_> = actions.iter().map(|a| a.title.as_str()).collect();
        return Ok(serde_json::to_string_pretty(&titles)?);
    }

    let transform = TransformType::from(args.mode);
    if !actions.iter().any(|a| a.transform == transform) {
        bail!("'{transform}' is not applicable to the scenario's inputs");
    }

    let report: TransformReport = SubsetTransform::new(transform, config)
        .run(&mut host, &inputs, &mut args.options(), &mut LoggingSink)
        .with_context(|| format!("'{transform}' aborted"))?;

    let output = RunOutput {
        transform: transform.to_string(),
        created: report.created.iter().map(|c| c.artifacts.root).collect(),
        skipped: report
            .skipped
            .iter()
            .map(|s| SkippedOutput {
                source: s.source,
                error: s.error.to_string(),
            })
            .collect(),
        hierarchy: host.snapshot(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Deterministic `rows x dims` table for benchmarks and smoke tests
#[allow(clippy::cast_precision_loss)]
pub fn synthetic_points(rows: usize, dims: usize) -> subset_core::Result<PointData> {
    let values = (0..rows * dims).map(|i| i as f32 * 0.5).collect();
    PointData::with_default_names(rows, dims, values)
}

use super::options::{PostProcessingOption, PostProcessingOptions};
use crate::core::execution::series::SimulationResults;
use crate::logging::SimulationLogger;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A post-processing step bound to one option.
///
/// Stages only read the frozen results and write their own artifacts below
/// the result directory. They may run on any thread.
pub trait Stage: Send + Sync {
    fn option(&self) -> PostProcessingOption;

    fn run(&self, context: &StageContext<'_>) -> Result<StageOutput, StageError>;
}

/// Everything a stage may read
pub struct StageContext<'a> {
    pub results: &'a SimulationResults,
    pub options: &'a PostProcessingOptions,
    pub result_directory: &'a Path,
    /// Artifacts of stages that completed in earlier waves
    pub artifacts: &'a BTreeMap<PostProcessingOption, Vec<PathBuf>>,
    pub logger: &'a dyn SimulationLogger,
}

impl StageContext<'_> {
    /// Path of a file inside the result directory
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.result_directory.join(file_name)
    }

    pub fn is_enabled(&self, option: PostProcessingOption) -> bool {
        self.options.is_enabled(option)
    }

    /// Artifacts written by another stage, empty when it did not run
    pub fn artifacts_of(&self, option: PostProcessingOption) -> &[PathBuf] {
        self.artifacts.get(&option).map_or(&[], Vec::as_slice)
    }
}

/// Files produced by a stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutput {
    pub artifacts: Vec<PathBuf>,
}

impl StageOutput {
    pub fn new(artifacts: Vec<PathBuf>) -> Self {
        Self { artifacts }
    }
}

/// Errors raised by a running stage
#[derive(Error, Debug)]
pub enum StageError {
    /// Local failure; sibling stages keep running
    #[error("{0}")]
    Failed(String),

    /// Aborts the remaining dispatch
    #[error("fatal: {0}")]
    Fatal(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StageError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StageError::Fatal(_))
    }
}

/// A stage was enabled without the stages it needs
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{stage} requires {} to be enabled", format_options(.missing))]
pub struct MissingPrerequisiteError {
    pub stage: PostProcessingOption,
    pub missing: Vec<PostProcessingOption>,
}

fn format_options(options: &[PostProcessingOption]) -> String {
    options
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// What happened to one enabled option
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Failed { reason: String },
    /// Never ran because a prerequisite was not enabled
    MissingPrerequisite(MissingPrerequisiteError),
    /// Prerequisite was enabled but did not complete
    PrerequisiteUnavailable { prerequisite: PostProcessingOption },
    /// Modifier honoured inside another stage
    Applied { by: PostProcessingOption },
    NoHandler,
}

impl StageStatus {
    /// True when the option did what it was enabled for
    pub fn is_success(&self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Applied { .. })
    }
}

/// Status and artifacts of one enabled option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutcome {
    pub option: PostProcessingOption,
    #[serde(flatten)]
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<PathBuf>,
}

impl StageOutcome {
    pub fn new(option: PostProcessingOption, status: StageStatus) -> Self {
        Self {
            option,
            status,
            artifacts: Vec::new(),
        }
    }

    pub fn completed(option: PostProcessingOption, output: StageOutput) -> Self {
        Self {
            option,
            status: StageStatus::Completed,
            artifacts: output.artifacts,
        }
    }
}

//! Post-processing of frozen simulation results.
//!
//! A run selects a [`PostProcessingOptions`] set; the [`PostProcessor`] runs
//! the [`Stage`] registered for every enabled option and writes a manifest
//! next to the artifacts.

pub mod dispatcher;
pub mod options;
pub mod stage;
pub mod stages;

pub use dispatcher::{DispatchError, DispatchReport, PostProcessor, MANIFEST_FILE};
pub use options::{PostProcessingOption, PostProcessingOptions, UnknownOptionId};
pub use stage::{
    MissingPrerequisiteError, Stage, StageContext, StageError, StageOutcome, StageOutput, StageStatus,
};

//! Component graph assembly, automatic wiring and post-processing dispatch
//! for household energy simulations.
//!
//! A [`Simulation`] collects components and their connections. Inputs are
//! wired explicitly by name or resolved automatically by type tag, and
//! [`Simulation::build`] validates the result into a [`SimulationGraph`]. The
//! [`SimulationEngine`] runs the graph and hands out frozen
//! [`SimulationResults`], which a [`PostProcessor`] turns into artifacts.

pub mod config;
pub mod core;
pub mod household;
pub mod logging;
pub mod postprocessing;

// Re-export commonly used types
pub use crate::config::{ConcurrencyMode, ConfigError, PostProcessingConfig};
pub use crate::core::builder::simulation_builder::Simulation;
pub use crate::core::components::{
    PortSpec, SimulationComponent, SimulationParameters, StepInputs, StepOutputs, TypeTag, Wiring,
};
pub use crate::core::errors::{ComponentError, ExecutionError, SetupError};
pub use crate::core::execution::{OutputSeries, SimulationEngine, SimulationResults};
pub use crate::core::graph::{GraphSummary, SimulationGraph};
pub use crate::core::types::{ComponentId, InputPort, PortRef};
pub use crate::logging::{LogFacade, MemoryLogger, SimulationLogger};
pub use crate::postprocessing::{
    DispatchError, DispatchReport, PostProcessingOption, PostProcessingOptions, PostProcessor, Stage, StageStatus,
};

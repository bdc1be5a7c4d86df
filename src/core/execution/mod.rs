pub mod execution_order;
pub mod series;
pub mod simulation_engine;

// Re-export commonly used types
pub use execution_order::ExecutionOrderBuilder;
pub use series::{OutputSeries, SimulationResults};
pub use simulation_engine::SimulationEngine;

pub mod parameters;
pub mod port_specs;
pub mod registry;
pub mod step;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use parameters::SimulationParameters;
pub use port_specs::PortSpec;
pub use registry::{ComponentInstance, ComponentRegistry, Wiring};
pub use step::{StepInputs, StepOutputs};
pub use traits::SimulationComponent;
pub use types::{PortDirection, TypeTag};

use super::port_specs::PortSpec;
use super::step::{StepInputs, StepOutputs};
use crate::core::errors::ComponentError;

/// An opaque simulation unit with declared ports.
///
/// The wiring engine only looks at the names, type tags and directions
/// returned by [`define_ports`](SimulationComponent::define_ports). Everything
/// else, including what happens inside
/// [`simulate_step`](SimulationComponent::simulate_step), belongs to the
/// component.
pub trait SimulationComponent: Send {
    /// Unique name of this component within a simulation graph
    fn name(&self) -> &str;

    /// Human-readable component type, used for diagnostics and reports
    fn component_type(&self) -> &str {
        let type_name = std::any::type_name::<Self>();
        type_name.rsplit("::").next().unwrap_or(type_name)
    }

    /// Define all ports for this component.
    ///
    /// Called exactly once, at registration. The returned specifications are
    /// frozen by the registry, so later calls have no effect on wiring.
    fn define_ports(&self) -> Vec<PortSpec>;

    /// Configuration this component was built from, for reports and exports
    fn config_json(&self) -> Option<serde_json::Value> {
        None
    }

    /// Evaluate one timestep.
    ///
    /// `outputs` starts out holding the values written in the previous step
    /// (0.0 before the first step).
    fn simulate_step(
        &mut self,
        timestep: usize,
        inputs: &StepInputs,
        outputs: &mut StepOutputs,
    ) -> Result<(), ComponentError>;
}

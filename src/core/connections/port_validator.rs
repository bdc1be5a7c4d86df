use crate::core::components::port_specs::PortSpec;
use crate::core::components::registry::ComponentInstance;
use crate::core::components::types::PortDirection;
use crate::core::errors::SetupError;

/// Port validation utilities for components
pub struct PortValidator;

impl PortValidator {
    /// Validate that a component has the specified output port
    pub fn validate_source_port<'a>(
        component: &'a ComponentInstance,
        port: &str,
    ) -> Result<&'a PortSpec, SetupError> {
        Self::find(component, component.output_ports(), port, PortDirection::Output)
    }

    /// Validate that a component has the specified input port
    pub fn validate_target_port<'a>(
        component: &'a ComponentInstance,
        port: &str,
    ) -> Result<&'a PortSpec, SetupError> {
        Self::find(component, component.input_ports(), port, PortDirection::Input)
    }

    fn find<'a>(
        component: &ComponentInstance,
        ports: &'a [PortSpec],
        port: &str,
        direction: PortDirection,
    ) -> Result<&'a PortSpec, SetupError> {
        ports
            .iter()
            .find(|spec| spec.name == port)
            .ok_or_else(|| SetupError::UnknownPort {
                component: component.name().to_string(),
                port: port.to_string(),
                direction,
                available: ports.iter().map(|spec| spec.name.clone()).collect(),
            })
    }
}

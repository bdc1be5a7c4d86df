use super::port_specs::PortSpec;
use super::traits::SimulationComponent;
use super::types::PortDirection;
use crate::core::connections::port_validator::PortValidator;
use crate::core::errors::SetupError;
use crate::core::types::ComponentId;
use std::collections::{HashMap, HashSet};

/// How the remaining inputs of a component get their connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wiring {
    /// Only explicit `connect_input` calls
    Explicit,
    /// Unconnected required inputs are resolved by type tag during `resolve`
    Automatic,
}

/// A registered component together with its frozen port declarations
pub struct ComponentInstance {
    id: ComponentId,
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
    wiring: Wiring,
    component: Box<dyn SimulationComponent>,
}

impl ComponentInstance {
    /// Wrap a component, reading its port declarations exactly once
    pub fn new(component: Box<dyn SimulationComponent>, wiring: Wiring) -> Result<Self, SetupError> {
        let id = ComponentId::new(component.name(), component.component_type());

        let mut seen = HashSet::new();
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for spec in component.define_ports() {
            if !seen.insert(spec.name.clone()) {
                return Err(SetupError::DuplicatePort {
                    component: id.name().to_string(),
                    port: spec.name,
                });
            }
            match spec.direction {
                PortDirection::Input => inputs.push(spec),
                PortDirection::Output => outputs.push(spec),
            }
        }

        Ok(Self {
            id,
            inputs,
            outputs,
            wiring,
            component,
        })
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    /// Input ports in declaration order
    pub fn input_ports(&self) -> &[PortSpec] {
        &self.inputs
    }

    /// Output ports in declaration order
    pub fn output_ports(&self) -> &[PortSpec] {
        &self.outputs
    }

    pub fn input(&self, port: &str) -> Option<&PortSpec> {
        self.inputs.iter().find(|spec| spec.name == port)
    }

    pub fn output(&self, port: &str) -> Option<&PortSpec> {
        self.outputs.iter().find(|spec| spec.name == port)
    }

    pub fn wiring(&self) -> Wiring {
        self.wiring
    }

    pub fn component(&self) -> &dyn SimulationComponent {
        self.component.as_ref()
    }

    pub(crate) fn component_mut(&mut self) -> &mut dyn SimulationComponent {
        self.component.as_mut()
    }
}

impl std::fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("wiring", &self.wiring)
            .finish()
    }
}

/// Ordered store of registered components.
///
/// Registration order is preserved and is the priority order used by
/// automatic wiring.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: Vec<ComponentInstance>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component instance; a name collision leaves the registry unchanged
    pub fn register(&mut self, instance: ComponentInstance) -> Result<ComponentId, SetupError> {
        let name = instance.name().to_string();
        if self.index.contains_key(&name) {
            return Err(SetupError::DuplicateName(name));
        }

        let id = instance.id().clone();
        self.index.insert(name, self.components.len());
        self.components.push(instance);
        Ok(id)
    }

    /// Get a component by name
    pub fn get(&self, name: &str) -> Option<&ComponentInstance> {
        self.index.get(name).map(|&position| &self.components[position])
    }

    /// Registration position of a component
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Components in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.components.iter()
    }

    /// Component IDs in registration order
    pub fn component_ids(&self) -> Vec<&ComponentId> {
        self.components.iter().map(|instance| instance.id()).collect()
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Resolve an input port reference
    pub fn get_input(&self, component: &str, port: &str) -> Result<&PortSpec, SetupError> {
        self.lookup(component, port, PortDirection::Input)
    }

    /// Resolve an output port reference
    pub fn get_output(&self, component: &str, port: &str) -> Result<&PortSpec, SetupError> {
        self.lookup(component, port, PortDirection::Output)
    }

    fn lookup(&self, component: &str, port: &str, direction: PortDirection) -> Result<&PortSpec, SetupError> {
        let instance = self.get(component).ok_or_else(|| SetupError::UnknownPort {
            component: component.to_string(),
            port: port.to_string(),
            direction,
            available: Vec::new(),
        })?;
        match direction {
            PortDirection::Input => PortValidator::validate_target_port(instance, port),
            PortDirection::Output => PortValidator::validate_source_port(instance, port),
        }
    }

    pub(crate) fn into_instances(self) -> Vec<ComponentInstance> {
        self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::components::step::{StepInputs, StepOutputs};
    use crate::core::errors::ComponentError;

    struct Fixed {
        name: &'static str,
        ports: Vec<PortSpec>,
    }

    impl SimulationComponent for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn define_ports(&self) -> Vec<PortSpec> {
            self.ports.clone()
        }

        fn simulate_step(&mut self, _: usize, _: &StepInputs, _: &mut StepOutputs) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    fn instance(name: &'static str, ports: Vec<PortSpec>) -> ComponentInstance {
        ComponentInstance::new(Box::new(Fixed { name, ports }), Wiring::Explicit).unwrap()
    }

    #[test]
    fn test_registration_preserves_order() {
        let mut registry = ComponentRegistry::new();
        registry.register(instance("Weather", vec![])).unwrap();
        registry.register(instance("Building", vec![])).unwrap();

        let names: Vec<&str> = registry.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Weather", "Building"]);
        assert_eq!(registry.position("Building"), Some(1));
    }

    #[test]
    fn test_duplicate_name_leaves_registry_unchanged() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(instance("Weather", vec![PortSpec::output("TemperatureOutside", "OutsideTemperature")]))
            .unwrap();

        let result = registry.register(instance("Weather", vec![]));
        assert_eq!(result, Err(SetupError::DuplicateName("Weather".into())));
        assert_eq!(registry.len(), 1);
        assert!(registry.get_output("Weather", "TemperatureOutside").is_ok());
    }

    #[test]
    fn test_duplicate_port_is_rejected() {
        let result = ComponentInstance::new(
            Box::new(Fixed {
                name: "Meter",
                ports: vec![
                    PortSpec::input("Power", "ElectricalPower"),
                    PortSpec::output("Power", "ElectricalPower"),
                ],
            }),
            Wiring::Explicit,
        );
        assert!(matches!(result, Err(SetupError::DuplicatePort { .. })));
    }

    #[test]
    fn test_unknown_port_lists_valid_ports() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(instance("Building", vec![PortSpec::input("TemperatureOutside", "OutsideTemperature")]))
            .unwrap();

        match registry.get_input("Building", "Temp") {
            Err(SetupError::UnknownPort { available, direction, .. }) => {
                assert_eq!(direction, PortDirection::Input);
                assert_eq!(available, vec!["TemperatureOutside".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(registry.get_output("Nowhere", "x").is_err());
    }
}

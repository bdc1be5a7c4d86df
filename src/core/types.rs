use serde::{Deserialize, Serialize};

/// Component identifier with the component type attached for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    pub(crate) name: String,
    pub(crate) component_type: String,
}

impl ComponentId {
    /// Create a new component ID
    pub fn new(name: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_type: component_type.into(),
        }
    }

    /// Get the unique component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the component type
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Create an input port handle
    pub fn input(&self, port: &str) -> InputPort {
        InputPort {
            component_id: self.clone(),
            port_name: port.to_string(),
        }
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Handle for an input port
#[derive(Debug, Clone)]
pub struct InputPort {
    pub(crate) component_id: ComponentId,
    pub(crate) port_name: String,
}

impl InputPort {
    pub fn component_id(&self) -> &ComponentId {
        &self.component_id
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn port_ref(&self) -> PortRef {
        PortRef::new(self.component_id.name(), &self.port_name)
    }
}

/// Name-only reference to a port: (owning component name, port name)
///
/// This is the identity used for connections, output series lookup and error
/// reporting. It orders by component first, so sorted collections of port
/// references group by component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    pub component: String,
    pub port: String,
}

impl PortRef {
    pub fn new(component: &str, port: &str) -> Self {
        Self {
            component: component.to_string(),
            port: port.to_string(),
        }
    }
}

impl std::fmt::Display for PortRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.component, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_handles_carry_component_name() {
        let id = ComponentId::new("Building", "Building");
        let input = id.input("TemperatureOutside");
        assert_eq!(input.port_ref(), PortRef::new("Building", "TemperatureOutside"));
        assert_eq!(input.port_ref().to_string(), "Building.TemperatureOutside");
    }

    #[test]
    fn test_port_refs_sort_by_component_first() {
        let mut refs = vec![
            PortRef::new("b", "a"),
            PortRef::new("a", "z"),
            PortRef::new("a", "b"),
        ];
        refs.sort();
        assert_eq!(refs[0], PortRef::new("a", "b"));
        assert_eq!(refs[2], PortRef::new("b", "a"));
    }
}

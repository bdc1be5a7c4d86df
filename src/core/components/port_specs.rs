use super::types::{PortDirection, TypeTag};
use serde::{Deserialize, Serialize};

/// Port specification for component inputs and outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortSpec {
    /// Port name, unique within its component
    pub name: String,
    /// Semantic type tag used for wiring compatibility
    pub type_tag: TypeTag,
    /// Port direction (input or output)
    pub direction: PortDirection,
    /// Whether an input must be connected before the simulation may run
    pub required: bool,
    /// Optional description for documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PortSpec {
    /// Create a new required input port
    pub fn input(name: &str, type_tag: &str) -> Self {
        Self {
            name: name.to_string(),
            type_tag: TypeTag::new(type_tag),
            direction: PortDirection::Input,
            required: true,
            description: None,
        }
    }

    /// Create a new optional input port
    pub fn input_optional(name: &str, type_tag: &str) -> Self {
        Self::input(name, type_tag).optional()
    }

    /// Create a new output port
    pub fn output(name: &str, type_tag: &str) -> Self {
        Self {
            name: name.to_string(),
            type_tag: TypeTag::new(type_tag),
            direction: PortDirection::Output,
            required: false, // outputs are not "required" in the same sense
            description: None,
        }
    }

    /// Add a description to this port
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Mark this port as optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// An input that must hold exactly one connection
    pub fn is_required_input(&self) -> bool {
        self.is_input() && self.required
    }
}

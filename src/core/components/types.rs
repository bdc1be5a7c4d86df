use serde::{Deserialize, Serialize};

/// Direction of a component port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    /// Input port - receives exactly one connection unless optional
    Input,
    /// Output port - unbounded fan-out
    Output,
}

impl PortDirection {
    /// Check if a port of this direction can feed a port of the other direction
    pub fn can_connect_to(&self, other: &PortDirection) -> bool {
        matches!((self, other), (PortDirection::Output, PortDirection::Input))
    }
}

impl std::fmt::Display for PortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
        }
    }
}

/// Semantic type tag of a port, e.g. "ThermalPower" or "ElectricalPower".
///
/// Two ports are compatible only if their tags are equal. No unit conversion
/// is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

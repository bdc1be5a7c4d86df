use crate::core::errors::ComponentError;

/// Input values handed to a component for one timestep
#[derive(Debug, Clone, Default)]
pub struct StepInputs {
    values: Vec<(String, Option<f64>)>,
}

impl StepInputs {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Add an input value. `None` marks an optional input without a connection.
    pub fn insert(&mut self, port: &str, value: Option<f64>) {
        match self.values.iter_mut().find(|(name, _)| name == port) {
            Some(entry) => entry.1 = value,
            None => self.values.push((port.to_string(), value)),
        }
    }

    /// Get the value of a connected input
    pub fn get(&self, port: &str) -> Result<f64, ComponentError> {
        match self.values.iter().find(|(name, _)| name == port) {
            Some((_, Some(value))) => Ok(*value),
            Some((_, None)) => Err(ComponentError::UnconnectedInput(port.to_string())),
            None => Err(ComponentError::UnknownPort(port.to_string())),
        }
    }

    /// Get the value of an input, falling back to `default` if it is not connected
    pub fn get_or(&self, port: &str, default: f64) -> f64 {
        self.get(port).unwrap_or(default)
    }

    /// Check if an input port has a connection
    pub fn is_connected(&self, port: &str) -> bool {
        self.values
            .iter()
            .any(|(name, value)| name == port && value.is_some())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output values written by a component during one timestep
#[derive(Debug, Clone, Default)]
pub struct StepOutputs {
    values: Vec<(String, f64)>,
}

impl StepOutputs {
    /// Create an output map for the given declared ports, all set to 0.0
    pub fn for_ports<'a>(ports: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            values: ports.into_iter().map(|name| (name.to_string(), 0.0)).collect(),
        }
    }

    /// Set an output value; the port must be declared
    pub fn set(&mut self, port: &str, value: f64) -> Result<(), ComponentError> {
        let entry = self
            .values
            .iter_mut()
            .find(|(name, _)| name == port)
            .ok_or_else(|| ComponentError::UnknownPort(port.to_string()))?;
        entry.1 = value;
        Ok(())
    }

    /// Get the current value of an output port
    pub fn get(&self, port: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == port)
            .map(|(_, value)| *value)
    }

    /// Values in port declaration order
    pub(crate) fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|(_, value)| *value)
    }
}

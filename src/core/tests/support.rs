use crate::core::components::{PortSpec, SimulationComponent, SimulationParameters, StepInputs, StepOutputs};
use crate::core::errors::ComponentError;
use crate::logging::MemoryLogger;
use crate::Simulation;
use std::sync::Arc;

/// Test component: every output is `offset` plus the sum of connected inputs
pub struct Stub {
    name: String,
    ports: Vec<PortSpec>,
    offset: f64,
    fail_at: Option<usize>,
}

impl Stub {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ports: Vec::new(),
            offset: 0.0,
            fail_at: None,
        }
    }

    pub fn input(mut self, port: &str, tag: &str) -> Self {
        self.ports.push(PortSpec::input(port, tag));
        self
    }

    pub fn optional_input(mut self, port: &str, tag: &str) -> Self {
        self.ports.push(PortSpec::input_optional(port, tag));
        self
    }

    pub fn output(mut self, port: &str, tag: &str) -> Self {
        self.ports.push(PortSpec::output(port, tag));
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn fail_at(mut self, timestep: usize) -> Self {
        self.fail_at = Some(timestep);
        self
    }
}

impl SimulationComponent for Stub {
    fn name(&self) -> &str {
        &self.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        self.ports.clone()
    }

    fn simulate_step(
        &mut self,
        timestep: usize,
        inputs: &StepInputs,
        outputs: &mut StepOutputs,
    ) -> Result<(), ComponentError> {
        if self.fail_at == Some(timestep) {
            return Err(ComponentError::Failed("stub failure".to_string()));
        }
        let mut total = self.offset;
        for spec in self.ports.iter().filter(|spec| spec.is_input()) {
            total += inputs.get_or(&spec.name, 0.0);
        }
        for spec in self.ports.iter().filter(|spec| spec.is_output()) {
            outputs.set(&spec.name, total)?;
        }
        Ok(())
    }
}

/// Four timesteps of one day each: 86400 s per timestep
pub fn short_parameters() -> SimulationParameters {
    SimulationParameters::new(2021, 86_400, 0, 4)
}

pub fn simulation_with_memory_logger() -> (Simulation, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let sim = Simulation::new(short_parameters()).with_logger(logger.clone());
    (sim, logger)
}

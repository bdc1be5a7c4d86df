use super::tags;
use crate::core::components::{PortSpec, SimulationComponent, SimulationParameters, StepInputs, StepOutputs};
use crate::core::errors::ComponentError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectricityMeterConfig {
    pub name: String,
}

impl ElectricityMeterConfig {
    pub fn get_electricity_meter_default_config() -> Self {
        Self {
            name: "ElectricityMeter".to_string(),
        }
    }
}

/// Sums the electricity consumers of the household and meters the energy
/// drawn from the grid
pub struct ElectricityMeter {
    config: ElectricityMeterConfig,
    timestep_hours: f64,
    consumed_wh: f64,
}

impl ElectricityMeter {
    pub const HOUSEHOLD_CONSUMPTION: &'static str = "HouseholdConsumption";
    pub const HEAT_PUMP_CONSUMPTION: &'static str = "HeatPumpConsumption";
    pub const ELECTRICITY_FROM_GRID: &'static str = "ElectricityFromGrid";
    pub const CUMULATIVE_CONSUMPTION: &'static str = "CumulativeConsumption";

    pub fn new(config: ElectricityMeterConfig, parameters: &SimulationParameters) -> Self {
        Self {
            config,
            timestep_hours: parameters.timestep_hours(),
            consumed_wh: 0.0,
        }
    }
}

impl SimulationComponent for ElectricityMeter {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::HOUSEHOLD_CONSUMPTION, tags::ELECTRICAL_POWER),
            PortSpec::input(Self::HEAT_PUMP_CONSUMPTION, tags::ELECTRICAL_POWER),
            PortSpec::output(Self::ELECTRICITY_FROM_GRID, tags::ELECTRICAL_POWER),
            PortSpec::output(Self::CUMULATIVE_CONSUMPTION, tags::ELECTRICAL_ENERGY),
        ]
    }

    fn config_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(&self.config).ok()
    }

    fn simulate_step(
        &mut self,
        _timestep: usize,
        inputs: &StepInputs,
        outputs: &mut StepOutputs,
    ) -> Result<(), ComponentError> {
        let total_w = inputs.get(Self::HOUSEHOLD_CONSUMPTION)? + inputs.get(Self::HEAT_PUMP_CONSUMPTION)?;
        self.consumed_wh += total_w * self.timestep_hours;

        outputs.set(Self::ELECTRICITY_FROM_GRID, total_w)?;
        outputs.set(Self::CUMULATIVE_CONSUMPTION, self.consumed_wh)?;
        Ok(())
    }
}

use super::tags;
use crate::core::components::{PortSpec, SimulationComponent, SimulationParameters, StepInputs, StepOutputs};
use crate::core::errors::ComponentError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub name: String,
    pub building_code: String,
    pub total_base_area_in_m2: f64,
    /// Transmission and ventilation losses per kelvin in W/K
    pub heat_loss_coefficient_w_per_k: f64,
    /// Effective thermal capacity per m² of base area in J/(K·m²)
    pub thermal_capacity_j_per_k_m2: f64,
    pub initial_temperature_c: f64,
}

impl BuildingConfig {
    pub fn get_default_london_single_family_home() -> Self {
        Self {
            name: "Building".to_string(),
            building_code: "GB.SFH.01.Gen.ReEx.001.001".to_string(),
            total_base_area_in_m2: 121.2,
            heat_loss_coefficient_w_per_k: 250.0,
            thermal_capacity_j_per_k_m2: 165_000.0,
            initial_temperature_c: 20.0,
        }
    }

    pub fn thermal_capacity_j_per_k(&self) -> f64 {
        self.thermal_capacity_j_per_k_m2 * self.total_base_area_in_m2
    }
}

/// Single-zone indoor temperature balance
pub struct Building {
    config: BuildingConfig,
    seconds_per_timestep: f64,
    temperature_c: f64,
}

impl Building {
    pub const TEMPERATURE_OUTSIDE: &'static str = "TemperatureOutside";
    pub const HEATING_BY_RESIDENTS: &'static str = "HeatingByResidents";
    pub const THERMAL_POWER_DELIVERED: &'static str = "ThermalPowerDelivered";
    pub const TEMPERATURE_MEAN: &'static str = "TemperatureMean";

    pub fn new(config: BuildingConfig, parameters: &SimulationParameters) -> Self {
        Self {
            temperature_c: config.initial_temperature_c,
            seconds_per_timestep: f64::from(parameters.seconds_per_timestep),
            config,
        }
    }

    /// Indoor temperature after one timestep of heat exchange
    pub fn next_temperature(&self, outside_c: f64, gains_w: f64, thermal_power_w: f64) -> f64 {
        let losses_w = self.config.heat_loss_coefficient_w_per_k * (self.temperature_c - outside_c);
        let net_w = thermal_power_w + gains_w - losses_w;
        self.temperature_c + net_w * self.seconds_per_timestep / self.config.thermal_capacity_j_per_k()
    }
}

impl SimulationComponent for Building {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::TEMPERATURE_OUTSIDE, tags::OUTSIDE_TEMPERATURE),
            PortSpec::input(Self::HEATING_BY_RESIDENTS, tags::INTERNAL_GAINS),
            PortSpec::input(Self::THERMAL_POWER_DELIVERED, tags::THERMAL_POWER),
            PortSpec::output(Self::TEMPERATURE_MEAN, tags::INDOOR_TEMPERATURE),
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
        self.temperature_c = self.next_temperature(
            inputs.get(Self::TEMPERATURE_OUTSIDE)?,
            inputs.get(Self::HEATING_BY_RESIDENTS)?,
            inputs.get(Self::THERMAL_POWER_DELIVERED)?,
        );
        outputs.set(Self::TEMPERATURE_MEAN, self.temperature_c)
    }
}

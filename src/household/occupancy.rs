use super::tags;
use crate::core::components::{PortSpec, SimulationComponent, SimulationParameters, StepInputs, StepOutputs};
use crate::core::errors::ComponentError;
use serde::{Deserialize, Serialize};

/// Consumption behaviour of the residents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnergyIntensity {
    #[default]
    EnergySaving,
    AsOriginal,
    EnergyIntensive,
}

impl EnergyIntensity {
    /// Multiplier applied to electricity demand
    pub fn factor(self) -> f64 {
        match self {
            EnergyIntensity::EnergySaving => 0.8,
            EnergyIntensity::AsOriginal => 1.0,
            EnergyIntensity::EnergyIntensive => 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyConfig {
    pub name: String,
    pub household_type: String,
    pub energy_intensity: EnergyIntensity,
    /// Electricity demand outside of the activity windows in W
    pub base_load_w: f64,
    /// Electricity demand during morning and evening activity in W
    pub active_load_w: f64,
    /// Heat released by residents while at home in W
    pub heating_by_residents_w: f64,
}

impl OccupancyConfig {
    pub fn get_default(household_type: &str, energy_intensity: EnergyIntensity) -> Self {
        Self {
            name: "Occupancy".to_string(),
            household_type: household_type.to_string(),
            energy_intensity,
            base_load_w: 150.0,
            active_load_w: 900.0,
            heating_by_residents_w: 200.0,
        }
    }
}

/// Residents' electricity demand and internal heat gains.
///
/// Both residents leave for work between 08:00 and 17:00. They are active
/// from 06:00 to 08:00 and from 17:00 to 22:00.
pub struct Occupancy {
    config: OccupancyConfig,
    parameters: SimulationParameters,
}

impl Occupancy {
    pub const HEATING_BY_RESIDENTS: &'static str = "HeatingByResidents";
    pub const ELECTRICITY_OUTPUT: &'static str = "ElectricityOutput";

    pub fn new(config: OccupancyConfig, parameters: &SimulationParameters) -> Self {
        Self {
            config,
            parameters: parameters.clone(),
        }
    }

    fn profile(&self, hour: f64) -> (f64, f64) {
        let at_home = !(8.0..17.0).contains(&hour);
        let active = (6.0..8.0).contains(&hour) || (17.0..22.0).contains(&hour);

        let electricity = if active { self.config.active_load_w } else { self.config.base_load_w };
        let gains = if at_home { self.config.heating_by_residents_w } else { 0.0 };
        (electricity * self.config.energy_intensity.factor(), gains)
    }
}

impl SimulationComponent for Occupancy {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::output(Self::HEATING_BY_RESIDENTS, tags::INTERNAL_GAINS),
            PortSpec::output(Self::ELECTRICITY_OUTPUT, tags::ELECTRICAL_POWER),
        ]
    }

    fn config_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(&self.config).ok()
    }

    fn simulate_step(
        &mut self,
        timestep: usize,
        _inputs: &StepInputs,
        outputs: &mut StepOutputs,
    ) -> Result<(), ComponentError> {
        let (electricity, gains) = self.profile(self.parameters.hour_of_day(timestep));
        outputs.set(Self::HEATING_BY_RESIDENTS, gains)?;
        outputs.set(Self::ELECTRICITY_OUTPUT, electricity)?;
        Ok(())
    }
}

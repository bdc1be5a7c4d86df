use super::tags;
use crate::core::components::{PortSpec, SimulationComponent, SimulationParameters, StepInputs, StepOutputs};
use crate::core::errors::ComponentError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub name: String,
    pub location: String,
    /// Yearly mean air temperature in °C
    pub mean_temperature_c: f64,
    /// Half the difference between the warmest and the coldest day
    pub seasonal_amplitude_c: f64,
    /// Half the difference between afternoon maximum and night minimum
    pub daily_amplitude_c: f64,
}

impl WeatherConfig {
    /// Mild maritime climate of southern Great Britain
    pub fn get_default_gb() -> Self {
        Self {
            name: "Weather".to_string(),
            location: "GB".to_string(),
            mean_temperature_c: 10.5,
            seasonal_amplitude_c: 6.5,
            daily_amplitude_c: 3.0,
        }
    }
}

/// Outside temperature from a seasonal and a daily sine
pub struct Weather {
    config: WeatherConfig,
    parameters: SimulationParameters,
}

impl Weather {
    pub const TEMPERATURE_OUTSIDE: &'static str = "TemperatureOutside";

    pub fn new(config: WeatherConfig, parameters: &SimulationParameters) -> Self {
        Self {
            config,
            parameters: parameters.clone(),
        }
    }

    /// Coldest around January 15th, warmest at 15:00
    pub fn temperature(&self, day_of_year: u32, hour_of_day: f64) -> f64 {
        let seasonal = -(2.0 * PI * (f64::from(day_of_year) - 14.0) / 365.0).cos();
        let daily = (2.0 * PI * (hour_of_day - 9.0) / 24.0).sin();
        self.config.mean_temperature_c
            + self.config.seasonal_amplitude_c * seasonal
            + self.config.daily_amplitude_c * daily
    }
}

impl SimulationComponent for Weather {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        vec![PortSpec::output(Self::TEMPERATURE_OUTSIDE, tags::OUTSIDE_TEMPERATURE)
            .with_description("Outside air temperature")]
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
        let temperature = self.temperature(
            self.parameters.day_of_year(timestep),
            self.parameters.hour_of_day(timestep),
        );
        outputs.set(Self::TEMPERATURE_OUTSIDE, temperature)
    }
}

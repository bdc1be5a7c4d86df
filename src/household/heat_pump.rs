use super::tags;
use crate::core::components::{PortSpec, SimulationComponent, StepInputs, StepOutputs};
use crate::core::errors::ComponentError;
use serde::{Deserialize, Serialize};

/// Operating modes of the heat pump controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatPumpMode {
    HeatingOnly,
    HeatingAndCooling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpControllerConfig {
    pub name: String,
    pub temperature_air_heating_c: f64,
    pub temperature_air_cooling_c: f64,
    /// Half width of the switching band around each set point
    pub offset_c: f64,
    pub mode: HeatPumpMode,
}

impl HeatPumpControllerConfig {
    pub fn get_default_generic_heat_pump_controller_config() -> Self {
        Self {
            name: "HeatPumpController".to_string(),
            temperature_air_heating_c: 20.0,
            temperature_air_cooling_c: 24.0,
            offset_c: 0.5,
            mode: HeatPumpMode::HeatingOnly,
        }
    }
}

/// Hysteresis controller producing the heat pump's on/off signal.
///
/// Reads the building temperature through an optional input so the feedback
/// loop building -> controller -> heat pump -> building closes over one
/// timestep. With the input unconnected the controller keeps heating.
pub struct HeatPumpController {
    config: HeatPumpControllerConfig,
    signal: f64,
}

impl HeatPumpController {
    pub const TEMPERATURE_MEAN: &'static str = "TemperatureMean";
    pub const CONTROL_SIGNAL: &'static str = "ControlSignal";

    pub fn new(config: HeatPumpControllerConfig) -> Self {
        Self { config, signal: 0.0 }
    }

    /// Next signal given the indoor temperature and the current signal
    pub fn decide(&self, temperature_c: f64) -> f64 {
        let heat_on = self.config.temperature_air_heating_c - self.config.offset_c;
        let heat_off = self.config.temperature_air_heating_c + self.config.offset_c;
        let cool_on = self.config.temperature_air_cooling_c + self.config.offset_c;
        let cool_off = self.config.temperature_air_cooling_c - self.config.offset_c;
        let cooling_allowed = self.config.mode == HeatPumpMode::HeatingAndCooling;

        if self.signal > 0.0 {
            if temperature_c >= heat_off {
                0.0
            } else {
                1.0
            }
        } else if self.signal < 0.0 {
            if temperature_c <= cool_off || !cooling_allowed {
                0.0
            } else {
                -1.0
            }
        } else if temperature_c < heat_on {
            1.0
        } else if cooling_allowed && temperature_c > cool_on {
            -1.0
        } else {
            0.0
        }
    }
}

impl SimulationComponent for HeatPumpController {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input_optional(Self::TEMPERATURE_MEAN, tags::INDOOR_TEMPERATURE),
            PortSpec::output(Self::CONTROL_SIGNAL, tags::ON_OFF_SIGNAL),
        ]
    }

    fn config_json(&self) -> Option<serde_json::Value> {
        serde_json::to_value(&self.config).ok()
    }

    fn simulate_step(
        &mut self,
        timestep: usize,
        inputs: &StepInputs,
        outputs: &mut StepOutputs,
    ) -> Result<(), ComponentError> {
        // No temperature has been computed before the first step
        let temperature = if timestep == 0 {
            self.config.temperature_air_heating_c
        } else {
            inputs.get_or(Self::TEMPERATURE_MEAN, f64::NEG_INFINITY)
        };
        self.signal = self.decide(temperature);
        outputs.set(Self::CONTROL_SIGNAL, self.signal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpConfig {
    pub name: String,
    pub manufacturer: String,
    pub heat_pump_name: String,
    /// Thermal output when running in W
    pub thermal_power_w: f64,
    /// Coefficient of performance at 7 °C outside temperature
    pub cop_at_7c: f64,
    /// COP change per kelvin of outside temperature
    pub cop_slope_per_k: f64,
    pub min_cop: f64,
}

impl HeatPumpConfig {
    pub fn get_default_generic_heat_pump_config() -> Self {
        Self {
            name: "HeatPump".to_string(),
            manufacturer: "Viessmann Werke GmbH & Co KG".to_string(),
            heat_pump_name: "Vitocal 300-A AWO-AC 301.B07".to_string(),
            thermal_power_w: 6_200.0,
            cop_at_7c: 3.6,
            cop_slope_per_k: 0.08,
            min_cop: 1.5,
        }
    }
}

/// Air-source heat pump with an outside-temperature dependent COP
pub struct HeatPump {
    config: HeatPumpConfig,
}

impl HeatPump {
    pub const CONTROL_SIGNAL: &'static str = "ControlSignal";
    pub const TEMPERATURE_OUTSIDE: &'static str = "TemperatureOutside";
    pub const THERMAL_POWER_DELIVERED: &'static str = "ThermalPowerDelivered";
    pub const ELECTRICITY_OUTPUT: &'static str = "ElectricityOutput";

    pub fn new(config: HeatPumpConfig) -> Self {
        Self { config }
    }

    pub fn cop(&self, outside_c: f64) -> f64 {
        (self.config.cop_at_7c + self.config.cop_slope_per_k * (outside_c - 7.0)).max(self.config.min_cop)
    }
}

impl SimulationComponent for HeatPump {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn define_ports(&self) -> Vec<PortSpec> {
        vec![
            PortSpec::input(Self::CONTROL_SIGNAL, tags::ON_OFF_SIGNAL),
            PortSpec::input(Self::TEMPERATURE_OUTSIDE, tags::OUTSIDE_TEMPERATURE),
            PortSpec::output(Self::THERMAL_POWER_DELIVERED, tags::THERMAL_POWER),
            PortSpec::output(Self::ELECTRICITY_OUTPUT, tags::ELECTRICAL_POWER),
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
        let signal = inputs.get(Self::CONTROL_SIGNAL)?.clamp(-1.0, 1.0);
        let thermal = signal * self.config.thermal_power_w;
        let electricity = thermal.abs() / self.cop(inputs.get(Self::TEMPERATURE_OUTSIDE)?);

        outputs.set(Self::THERMAL_POWER_DELIVERED, thermal)?;
        outputs.set(Self::ELECTRICITY_OUTPUT, electricity)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(mode: HeatPumpMode) -> HeatPumpController {
        let mut config = HeatPumpControllerConfig::get_default_generic_heat_pump_controller_config();
        config.mode = mode;
        HeatPumpController::new(config)
    }

    #[test]
    fn test_controller_hysteresis() {
        let mut controller = controller(HeatPumpMode::HeatingOnly);
        assert_eq!(controller.decide(19.6), 0.0);
        assert_eq!(controller.decide(19.4), 1.0);

        controller.signal = 1.0;
        assert_eq!(controller.decide(20.2), 1.0);
        assert_eq!(controller.decide(20.5), 0.0);
    }

    #[test]
    fn test_cooling_requires_mode() {
        assert_eq!(controller(HeatPumpMode::HeatingOnly).decide(26.0), 0.0);
        assert_eq!(controller(HeatPumpMode::HeatingAndCooling).decide(26.0), -1.0);
    }

    #[test]
    fn test_heat_pump_electricity_follows_cop() {
        let mut heat_pump = HeatPump::new(HeatPumpConfig::get_default_generic_heat_pump_config());
        let mut inputs = StepInputs::new();
        inputs.insert(HeatPump::CONTROL_SIGNAL, Some(1.0));
        inputs.insert(HeatPump::TEMPERATURE_OUTSIDE, Some(7.0));
        let mut outputs =
            StepOutputs::for_ports([HeatPump::THERMAL_POWER_DELIVERED, HeatPump::ELECTRICITY_OUTPUT]);

        heat_pump.simulate_step(0, &inputs, &mut outputs).unwrap();
        assert_eq!(outputs.get(HeatPump::THERMAL_POWER_DELIVERED), Some(6_200.0));
        let electricity = outputs.get(HeatPump::ELECTRICITY_OUTPUT).unwrap();
        assert!((electricity - 6_200.0 / 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_cop_is_bounded_below() {
        let heat_pump = HeatPump::new(HeatPumpConfig::get_default_generic_heat_pump_config());
        assert_eq!(heat_pump.cop(-60.0), 1.5);
    }
}

use super::building::{Building, BuildingConfig};
use super::electricity_meter::{ElectricityMeter, ElectricityMeterConfig};
use super::heat_pump::{HeatPump, HeatPumpConfig, HeatPumpController, HeatPumpControllerConfig, HeatPumpMode};
use super::occupancy::{EnergyIntensity, Occupancy, OccupancyConfig};
use super::weather::{Weather, WeatherConfig};
use crate::config::{load_json, save_json, ConfigError};
use crate::core::builder::simulation_builder::Simulation;
use crate::core::components::SimulationParameters;
use crate::core::errors::SetupError;
use crate::logging::SimulationLogger;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name the demo looks for in the working directory
pub const CONFIG_FILE_NAME: &str = "hp_config.json";

/// Top-level configuration of the household setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdConfig {
    pub building_type: String,
    pub household_type: String,
    pub energy_intensity: EnergyIntensity,
    pub result_path: PathBuf,
    pub simulation_parameters: SimulationParameters,
    pub total_base_area_in_m2: f64,
}

impl HouseholdConfig {
    pub fn get_default() -> Self {
        Self {
            building_type: "blub".to_string(),
            household_type: "CHR01_Couple_both_at_Work".to_string(),
            energy_intensity: EnergyIntensity::EnergySaving,
            result_path: PathBuf::from("results"),
            simulation_parameters: SimulationParameters::one_day_only(2022),
            total_base_area_in_m2: 121.2,
        }
    }

    /// Load the configuration from `path` if the file exists, else the default.
    ///
    /// A file that exists but cannot be parsed is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            load_json(path)
        } else {
            Ok(Self::get_default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_json(self, path)
    }
}

/// Assemble the household: residents and weather feed a building heated by a
/// controlled heat pump, and an electricity meter sums the consumers.
///
/// Without explicit parameters the month of January 2021 is simulated at
/// one-minute resolution. The returned simulation still needs
/// [`Simulation::build`] to resolve automatic wiring and validate.
pub fn setup_household_with_heat_pump(
    config: &HouseholdConfig,
    parameters: Option<SimulationParameters>,
    logger: Arc<dyn SimulationLogger>,
) -> Result<Simulation, SetupError> {
    let parameters =
        parameters.unwrap_or_else(|| SimulationParameters::january_only_with_customized_options(2021, 60));

    let occupancy = Occupancy::new(
        OccupancyConfig::get_default(&config.household_type, config.energy_intensity),
        &parameters,
    );
    let weather = Weather::new(WeatherConfig::get_default_gb(), &parameters);

    let mut building_config = BuildingConfig::get_default_london_single_family_home();
    building_config.total_base_area_in_m2 = config.total_base_area_in_m2;
    let building = Building::new(building_config, &parameters);

    let mut controller_config = HeatPumpControllerConfig::get_default_generic_heat_pump_controller_config();
    controller_config.mode = HeatPumpMode::HeatingAndCooling;
    let controller = HeatPumpController::new(controller_config);

    let heat_pump = HeatPump::new(HeatPumpConfig::get_default_generic_heat_pump_config());
    let meter = ElectricityMeter::new(ElectricityMeterConfig::get_electricity_meter_default_config(), &parameters);

    let mut sim = Simulation::new(parameters).with_logger(logger);

    sim.register(occupancy)?;
    sim.register(weather)?;
    let building_id = sim.register_automatic(building)?;
    let controller_id = sim.register_automatic(controller)?;
    let heat_pump_id = sim.register_automatic(heat_pump)?;
    let meter_id = sim.register_automatic(meter)?;

    // The heat pump registers after the building, out of reach of automatic wiring
    sim.connect_input(
        building_id.input(Building::THERMAL_POWER_DELIVERED),
        heat_pump_id.name(),
        HeatPump::THERMAL_POWER_DELIVERED,
    )?;
    sim.connect_input(
        controller_id.input(HeatPumpController::TEMPERATURE_MEAN),
        building_id.name(),
        Building::TEMPERATURE_MEAN,
    )?;
    // Automatic wiring would pick the residents' consumption for both meter inputs
    sim.connect_input(
        meter_id.input(ElectricityMeter::HEAT_PUMP_CONSUMPTION),
        heat_pump_id.name(),
        HeatPump::ELECTRICITY_OUTPUT,
    )?;

    sim.logger().info(
        "household_assembled",
        &[("components", &sim.component_ids().len()), ("household", &config.household_type)],
    );
    Ok(sim)
}

//! Stand-in components of a single-family household heated by a heat pump,
//! and the setup function that wires them into a simulation.
//!
//! The components follow simple configuration-driven profiles. They exist to
//! exercise wiring, execution and post-processing end to end.

pub mod building;
pub mod electricity_meter;
pub mod heat_pump;
pub mod occupancy;
pub mod setup;
pub mod weather;

pub use building::{Building, BuildingConfig};
pub use electricity_meter::{ElectricityMeter, ElectricityMeterConfig};
pub use heat_pump::{HeatPump, HeatPumpConfig, HeatPumpController, HeatPumpControllerConfig, HeatPumpMode};
pub use occupancy::{EnergyIntensity, Occupancy, OccupancyConfig};
pub use setup::{setup_household_with_heat_pump, HouseholdConfig, CONFIG_FILE_NAME};
pub use weather::{Weather, WeatherConfig};

/// Type tags shared by the household components
pub mod tags {
    /// Outside air temperature in °C
    pub const OUTSIDE_TEMPERATURE: &str = "OutsideTemperature";
    /// Heat released by residents and appliances in W
    pub const INTERNAL_GAINS: &str = "InternalGains";
    /// Electrical power in W
    pub const ELECTRICAL_POWER: &str = "ElectricalPower";
    /// Electrical energy in Wh
    pub const ELECTRICAL_ENERGY: &str = "ElectricalEnergy";
    /// Thermal power in W, positive when heating
    pub const THERMAL_POWER: &str = "ThermalPower";
    /// Indoor air temperature in °C
    pub const INDOOR_TEMPERATURE: &str = "IndoorTemperature";
    /// 1 heating, -1 cooling, 0 off
    pub const ON_OFF_SIGNAL: &str = "OnOffSignal";
}

use hsim::core::connections::ConnectionOrigin;
use hsim::household::{
    setup_household_with_heat_pump, Building, ElectricityMeter, HeatPump, HeatPumpController, HouseholdConfig,
    Occupancy, Weather,
};
use hsim::{MemoryLogger, PortRef, SimulationEngine, SimulationParameters};
use std::sync::Arc;

fn one_day() -> Option<SimulationParameters> {
    Some(SimulationParameters::one_day_only(2021))
}

#[test]
fn test_household_wiring_matches_setup() {
    let logger = Arc::new(MemoryLogger::new());
    let sim = setup_household_with_heat_pump(&HouseholdConfig::get_default(), one_day(), logger.clone()).unwrap();
    let graph = sim.build().unwrap();
    let connections = graph.connections();

    let source_of = |component: &str, port: &str| {
        let connection = connections
            .get(&PortRef::new(component, port))
            .unwrap_or_else(|| panic!("{component}.{port} should be connected"));
        (connection.source.to_string(), connection.origin)
    };

    assert_eq!(
        source_of("Building", Building::TEMPERATURE_OUTSIDE),
        ("Weather.TemperatureOutside".to_string(), ConnectionOrigin::Automatic)
    );
    assert_eq!(
        source_of("Building", Building::HEATING_BY_RESIDENTS),
        ("Occupancy.HeatingByResidents".to_string(), ConnectionOrigin::Automatic)
    );
    assert_eq!(
        source_of("Building", Building::THERMAL_POWER_DELIVERED),
        ("HeatPump.ThermalPowerDelivered".to_string(), ConnectionOrigin::Explicit)
    );
    assert_eq!(
        source_of("HeatPumpController", HeatPumpController::TEMPERATURE_MEAN),
        ("Building.TemperatureMean".to_string(), ConnectionOrigin::Explicit)
    );
    assert_eq!(
        source_of("HeatPump", HeatPump::CONTROL_SIGNAL),
        ("HeatPumpController.ControlSignal".to_string(), ConnectionOrigin::Automatic)
    );
    assert_eq!(
        source_of("ElectricityMeter", ElectricityMeter::HOUSEHOLD_CONSUMPTION),
        ("Occupancy.ElectricityOutput".to_string(), ConnectionOrigin::Automatic)
    );
    assert_eq!(
        source_of("ElectricityMeter", ElectricityMeter::HEAT_PUMP_CONSUMPTION),
        ("HeatPump.ElectricityOutput".to_string(), ConnectionOrigin::Explicit)
    );

    // Occupancy and HeatPump both offer electrical power to the meter
    let ambiguous = logger.events_named("auto_wiring_ambiguous");
    assert_eq!(ambiguous.len(), 1);
    assert_eq!(ambiguous[0].field("input"), Some("ElectricityMeter.HouseholdConsumption"));

    let order: Vec<&str> = graph.execution_order().iter().map(|id| id.name()).collect();
    let position = |name: &str| order.iter().position(|n| *n == name).unwrap();
    assert!(position("HeatPumpController") < position("HeatPump"));
    assert!(position("HeatPump") < position("Building"));
    assert!(position("HeatPump") < position("ElectricityMeter"));
}

#[test]
fn test_household_day_run_keeps_building_comfortable() {
    let sim = setup_household_with_heat_pump(&HouseholdConfig::get_default(), one_day(), Arc::new(MemoryLogger::new()))
        .unwrap();
    let results = SimulationEngine::new(sim.build().unwrap()).run().unwrap();
    assert_eq!(results.timesteps(), 1440);

    let indoor = results.series("Building", Building::TEMPERATURE_MEAN).unwrap();
    assert!(
        indoor.values().iter().all(|t| (18.0..23.0).contains(t)),
        "indoor temperature left the comfort band"
    );

    let heat_pump = results.series("HeatPump", HeatPump::ELECTRICITY_OUTPUT).unwrap();
    assert!(heat_pump.values().iter().any(|&w| w > 0.0), "a January day needs heating");

    let household = results.series("Occupancy", Occupancy::ELECTRICITY_OUTPUT).unwrap();
    let grid = results.series("ElectricityMeter", ElectricityMeter::ELECTRICITY_FROM_GRID).unwrap();
    for step in 0..results.timesteps() {
        let expected = household.values()[step] + heat_pump.values()[step];
        assert!((grid.values()[step] - expected).abs() < 1e-9);
    }

    let outside = results.series("Weather", Weather::TEMPERATURE_OUTSIDE).unwrap();
    assert!(outside.values().iter().all(|t| *t < 10.0));
}

#[test]
fn test_default_parameters_cover_january() {
    let sim = setup_household_with_heat_pump(&HouseholdConfig::get_default(), None, Arc::new(MemoryLogger::new()))
        .unwrap();
    assert_eq!(
        sim.parameters(),
        &SimulationParameters::january_only_with_customized_options(2021, 60)
    );
    assert_eq!(sim.parameters().total_timesteps(), 31 * 1440);
}

#[test]
fn test_config_round_trip_yields_same_setup() {
    let path = std::env::temp_dir().join(format!("hsim-household-{}.json", uuid::Uuid::new_v4()));
    let mut config = HouseholdConfig::get_default();
    config.total_base_area_in_m2 = 150.0;
    config.save(&path).unwrap();

    let loaded = HouseholdConfig::load_or_default(&path).unwrap();
    assert_eq!(loaded, config);
    std::fs::remove_file(&path).unwrap();

    let missing = HouseholdConfig::load_or_default(&path).unwrap();
    assert_eq!(missing, HouseholdConfig::get_default());
}

#[test]
fn test_malformed_config_is_an_error() {
    let path = std::env::temp_dir().join(format!("hsim-household-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, "{ \"building_type\": 3 }").unwrap();

    let error = HouseholdConfig::load_or_default(&path).unwrap_err();
    assert!(matches!(error, hsim::ConfigError::Json { .. }));
    std::fs::remove_file(&path).unwrap();
}

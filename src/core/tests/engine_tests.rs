use super::support::{short_parameters, simulation_with_memory_logger, Stub};
use crate::core::errors::{ComponentError, ExecutionError};
use crate::{Simulation, SimulationEngine};

#[test]
fn test_values_flow_along_connections() {
    let mut sim = Simulation::new(short_parameters());
    sim.register(Stub::new("Weather").output("Temperature", "OutsideTemperature").offset(5.0))
        .unwrap();
    sim.register(Stub::new("Occupancy").output("Gains", "InternalGains").offset(2.0))
        .unwrap();
    sim.register_automatic(
        Stub::new("Building")
            .input("Temperature", "OutsideTemperature")
            .input("Gains", "InternalGains")
            .output("TemperatureMean", "IndoorTemperature")
            .offset(1.0),
    )
    .unwrap();

    let results = SimulationEngine::new(sim.build().unwrap()).run().unwrap();

    assert_eq!(results.timesteps(), 4);
    let indoor = results.series("Building", "TemperatureMean").unwrap();
    assert_eq!(indoor.values(), &[8.0, 8.0, 8.0, 8.0]);
    assert_eq!(indoor.type_tag().as_str(), "IndoorTemperature");
    assert_eq!(indoor.label(), "Building - TemperatureMean [IndoorTemperature]");
    assert!(results.series("Building", "Temperature").is_none(), "inputs are not recorded");
}

#[test]
fn test_optional_back_edge_reads_previous_step() {
    let mut sim = Simulation::new(short_parameters());
    let counter = sim
        .register(
            Stub::new("Counter")
                .optional_input("Feedback", "Count")
                .output("Value", "Count")
                .offset(1.0),
        )
        .unwrap();
    let relay = sim
        .register(Stub::new("Relay").input("In", "Count").output("Out", "Count"))
        .unwrap();

    sim.connect_input(relay.input("In"), counter.name(), "Value").unwrap();
    sim.connect_input(counter.input("Feedback"), relay.name(), "Out").unwrap();

    let results = SimulationEngine::new(sim.build().unwrap()).run().unwrap();
    // Step 0 reads 0.0, every later step the relay's previous output
    assert_eq!(results.series("Counter", "Value").unwrap().values(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(results.series("Relay", "Out").unwrap().values(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_unconnected_optional_input_reads_default() {
    let mut sim = Simulation::new(short_parameters());
    sim.register(
        Stub::new("Controller")
            .optional_input("Temperature", "IndoorTemperature")
            .output("Signal", "OnOffSignal")
            .offset(1.0),
    )
    .unwrap();

    let results = SimulationEngine::new(sim.build().unwrap()).run().unwrap();
    assert_eq!(results.series("Controller", "Signal").unwrap().values(), &[1.0; 4]);
}

#[test]
fn test_component_failure_names_component_and_step() {
    let (mut sim, logger) = simulation_with_memory_logger();
    sim.register(Stub::new("Weather").output("Temperature", "OutsideTemperature").fail_at(2))
        .unwrap();
    let graph = sim.build().unwrap();

    let error = SimulationEngine::new(graph).with_logger(logger.clone()).run().unwrap_err();
    assert_eq!(
        error,
        ExecutionError::Component {
            component: "Weather".to_string(),
            timestep: 2,
            source: ComponentError::Failed("stub failure".to_string()),
        }
    );
    assert_eq!(logger.events_named("simulation_failed").len(), 1);
}

#[test]
fn test_stepping_past_horizon_is_an_error() {
    let mut sim = Simulation::new(short_parameters());
    sim.register(Stub::new("Weather").output("Temperature", "OutsideTemperature"))
        .unwrap();
    let mut engine = SimulationEngine::new(sim.build().unwrap());

    assert_eq!(engine.total_steps(), 4);
    for _ in 0..4 {
        engine.step().unwrap();
    }
    assert_eq!(engine.current_step(), 4);
    assert_eq!(engine.step(), Err(ExecutionError::HorizonReached(4)));
}

#[test]
fn test_results_carry_graph_summary() {
    let mut sim = Simulation::new(short_parameters());
    sim.register(Stub::new("Weather").output("Temperature", "OutsideTemperature"))
        .unwrap();
    sim.register_automatic(Stub::new("Building").input("Temperature", "OutsideTemperature"))
        .unwrap();

    let results = SimulationEngine::new(sim.build().unwrap()).run().unwrap();
    let summary = results.summary();
    assert_eq!(summary.components.len(), 2);
    assert_eq!(summary.connections.len(), 1);
    assert_eq!(summary.component("Building").unwrap().component_type, "Stub");
    assert_eq!(results.parameters(), &short_parameters());

    let json = serde_json::to_value(summary).unwrap();
    assert_eq!(json["connections"][0]["origin"], "automatic");
    assert_eq!(json["connections"][0]["source"]["component"], "Weather");
}

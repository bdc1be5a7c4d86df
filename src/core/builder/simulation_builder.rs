use crate::core::components::parameters::SimulationParameters;
use crate::core::components::port_specs::PortSpec;
use crate::core::components::registry::{ComponentInstance, ComponentRegistry, Wiring};
use crate::core::components::traits::SimulationComponent;
use crate::core::connections::connection_validator::ConnectionValidator;
use crate::core::connections::manager::{Connection, ConnectionManager, ConnectionOrigin};
use crate::core::connections::resolver::AutoWiringResolver;
use crate::core::errors::SetupError;
use crate::core::graph::SimulationGraph;
use crate::core::types::{ComponentId, InputPort, PortRef};
use crate::logging::{LogFacade, SimulationLogger};
use std::sync::Arc;

/// Imperative API for assembling a simulation graph.
///
/// Assembly happens in two phases. First components are registered and
/// explicit connections are made by name. Then [`resolve`](Simulation::resolve)
/// wires the remaining required inputs of components registered with
/// [`Wiring::Automatic`], and [`build`](Simulation::build) validates the result
/// into a [`SimulationGraph`].
pub struct Simulation {
    parameters: SimulationParameters,
    registry: ComponentRegistry,
    connections: ConnectionManager,
    logger: Arc<dyn SimulationLogger>,
}

impl Simulation {
    /// Create a new simulation that logs through the `log` crate
    pub fn new(parameters: SimulationParameters) -> Self {
        Self {
            parameters,
            registry: ComponentRegistry::new(),
            connections: ConnectionManager::new(),
            logger: LogFacade::shared(),
        }
    }

    /// Replace the logger used during assembly and validation
    pub fn with_logger(mut self, logger: Arc<dyn SimulationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    pub fn logger(&self) -> Arc<dyn SimulationLogger> {
        Arc::clone(&self.logger)
    }

    /// Register a component whose inputs are connected explicitly
    pub fn register<C: SimulationComponent + 'static>(&mut self, component: C) -> Result<ComponentId, SetupError> {
        self.register_boxed(Box::new(component), Wiring::Explicit)
    }

    /// Register a component whose unconnected required inputs are resolved by type tag
    pub fn register_automatic<C: SimulationComponent + 'static>(
        &mut self,
        component: C,
    ) -> Result<ComponentId, SetupError> {
        self.register_boxed(Box::new(component), Wiring::Automatic)
    }

    /// Register a boxed component. On error the graph is unchanged.
    pub fn register_boxed(
        &mut self,
        component: Box<dyn SimulationComponent>,
        wiring: Wiring,
    ) -> Result<ComponentId, SetupError> {
        let instance = ComponentInstance::new(component, wiring)?;
        let id = self.registry.register(instance)?;
        self.logger.debug(
            "component_registered",
            &[
                ("component", &id),
                ("type", &id.component_type()),
                ("automatic", &(wiring == Wiring::Automatic)),
            ],
        );
        Ok(id)
    }

    /// Resolve an input port reference
    pub fn get_input(&self, component: &str, port: &str) -> Result<&PortSpec, SetupError> {
        self.registry.get_input(component, port)
    }

    /// Resolve an output port reference
    pub fn get_output(&self, component: &str, port: &str) -> Result<&PortSpec, SetupError> {
        self.registry.get_output(component, port)
    }

    /// Connect an input port to an output port of another registered component.
    ///
    /// Type tags must be equal and the input must not already be connected.
    pub fn connect_input(
        &mut self,
        target: InputPort,
        source_component: &str,
        source_port: &str,
    ) -> Result<(), SetupError> {
        let target_ref = target.port_ref();
        let source_ref = PortRef::new(source_component, source_port);

        let target_spec = self.registry.get_input(&target_ref.component, &target_ref.port)?;
        let source_spec = self.registry.get_output(source_component, source_port)?;

        ConnectionValidator::check_type_compatibility(&source_ref, source_spec, &target_ref, target_spec)?;
        ConnectionValidator::check_input_port_collision(&self.connections, &target_ref)?;

        let type_tag = target_spec.type_tag.clone();
        self.logger.debug("explicit_connection", &[("input", &target_ref), ("source", &source_ref)]);
        self.connections.add_connection(Connection {
            source: source_ref,
            target: target_ref,
            type_tag,
            origin: ConnectionOrigin::Explicit,
        })
    }

    /// Wire the unconnected required inputs of automatically wired components.
    ///
    /// Inputs that already hold a connection are skipped, so explicit
    /// connections are never overwritten. Calling this again only handles
    /// inputs still open. Returns the number of connections created.
    pub fn resolve(&mut self) -> Result<usize, SetupError> {
        let resolver = AutoWiringResolver::new(&self.registry, self.logger.as_ref());
        let created = resolver.resolve_all(&mut self.connections)?;
        self.logger.info("automatic_wiring_resolved", &[("connections", &created)]);
        Ok(created)
    }

    /// Resolve automatic wiring and validate into an executable graph
    pub fn build(mut self) -> Result<SimulationGraph, SetupError> {
        self.resolve()?;
        SimulationGraph::validate(self.parameters, self.registry, self.connections, self.logger.as_ref())
    }

    /// All component IDs in registration order
    pub fn component_ids(&self) -> Vec<&ComponentId> {
        self.registry.component_ids()
    }

    /// Check if component exists
    pub fn has_component(&self, name: &str) -> bool {
        self.registry.has_component(name)
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }
}

use crate::core::components::parameters::SimulationParameters;
use crate::core::components::port_specs::PortSpec;
use crate::core::components::registry::{ComponentInstance, ComponentRegistry};
use crate::core::connections::manager::{Connection, ConnectionManager};
use crate::core::errors::SetupError;
use crate::core::execution::execution_order::{ExecutionOrderBuilder, Ordering};
use crate::core::types::{ComponentId, PortRef};
use crate::logging::SimulationLogger;
use serde::Serialize;

/// A validated, frozen component graph.
///
/// Only [`Simulation::build`](crate::core::builder::simulation_builder::Simulation::build)
/// produces one. Holding a `SimulationGraph` means every required input has
/// exactly one source and the required-input edges form a DAG.
#[derive(Debug)]
pub struct SimulationGraph {
    parameters: SimulationParameters,
    components: Vec<ComponentInstance>,
    connections: ConnectionManager,
    stages: Vec<Vec<usize>>,
    summary: GraphSummary,
}

impl SimulationGraph {
    /// Run the pre-execution checks, in order:
    /// 1. every required input has a connection (all offenders reported),
    /// 2. required-input edges are acyclic (one witnessing cycle reported).
    ///
    /// Unused outputs are fine.
    pub(crate) fn validate(
        parameters: SimulationParameters,
        registry: ComponentRegistry,
        connections: ConnectionManager,
        logger: &dyn SimulationLogger,
    ) -> Result<Self, SetupError> {
        parameters.validate()?;

        let missing: Vec<PortRef> = registry
            .iter()
            .flat_map(|instance| {
                instance
                    .input_ports()
                    .iter()
                    .filter(|spec| spec.is_required_input())
                    .map(move |spec| PortRef::new(instance.name(), &spec.name))
            })
            .filter(|target| !connections.is_connected(target))
            .collect();
        if !missing.is_empty() {
            logger.error("graph_validation_failed", &[("missing_connections", &missing.len())]);
            return Err(SetupError::MissingConnections(missing));
        }

        let edges = Self::required_edges(&registry, &connections);
        let stages = match ExecutionOrderBuilder::build_execution_order_stages(registry.len(), &edges) {
            Ordering::Stages(stages) => stages,
            Ordering::Cycle(cycle) => {
                let names: Vec<String> = cycle
                    .into_iter()
                    .filter_map(|position| registry.iter().nth(position))
                    .map(|instance| instance.name().to_string())
                    .collect();
                logger.error("graph_validation_failed", &[("cycle", &names.join(" -> "))]);
                return Err(SetupError::CyclicGraph(names));
            }
        };

        let summary = GraphSummary::capture(&parameters, &registry, &connections);
        let stats = connections.stats();
        logger.info(
            "graph_validated",
            &[
                ("components", &registry.len()),
                ("explicit_connections", &stats.explicit),
                ("automatic_connections", &stats.automatic),
                ("stages", &stages.len()),
            ],
        );

        Ok(Self {
            parameters,
            components: registry.into_instances(),
            connections,
            stages,
            summary,
        })
    }

    /// Component-level edges induced by connections into required inputs
    fn required_edges(registry: &ComponentRegistry, connections: &ConnectionManager) -> Vec<(usize, usize)> {
        connections
            .connections()
            .filter(|connection| {
                registry
                    .get(&connection.target.component)
                    .and_then(|instance| instance.input(&connection.target.port))
                    .map_or(false, PortSpec::is_required_input)
            })
            .filter_map(|connection| {
                let source = registry.position(&connection.source.component)?;
                let target = registry.position(&connection.target.component)?;
                Some((source, target))
            })
            .collect()
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Components in registration order
    pub fn components(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.components.iter()
    }

    pub fn component(&self, name: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|instance| instance.name() == name)
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    /// Stages of components that may be evaluated together
    pub fn stages(&self) -> Vec<Vec<&ComponentId>> {
        self.stages
            .iter()
            .map(|stage| stage.iter().map(|&position| self.components[position].id()).collect())
            .collect()
    }

    /// Flattened evaluation order
    pub fn execution_order(&self) -> Vec<&ComponentId> {
        self.stages
            .iter()
            .flatten()
            .map(|&position| self.components[position].id())
            .collect()
    }

    pub fn summary(&self) -> &GraphSummary {
        &self.summary
    }

    pub(crate) fn into_parts(self) -> GraphParts {
        GraphParts {
            parameters: self.parameters,
            components: self.components,
            connections: self.connections,
            order: self.stages.into_iter().flatten().collect(),
            summary: self.summary,
        }
    }
}

/// Owned pieces of a graph handed to the execution engine
pub(crate) struct GraphParts {
    pub parameters: SimulationParameters,
    pub components: Vec<ComponentInstance>,
    pub connections: ConnectionManager,
    pub order: Vec<usize>,
    pub summary: GraphSummary,
}

/// Serializable description of a validated graph, used by reports and exports
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub parameters: SimulationParameters,
    pub components: Vec<ComponentSummary>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    pub name: String,
    pub component_type: String,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl GraphSummary {
    fn capture(parameters: &SimulationParameters, registry: &ComponentRegistry, connections: &ConnectionManager) -> Self {
        Self {
            parameters: parameters.clone(),
            components: registry
                .iter()
                .map(|instance| ComponentSummary {
                    name: instance.name().to_string(),
                    component_type: instance.id().component_type().to_string(),
                    inputs: instance.input_ports().to_vec(),
                    outputs: instance.output_ports().to_vec(),
                    config: instance.component().config_json(),
                })
                .collect(),
            connections: connections.connections().cloned().collect(),
        }
    }

    pub fn component(&self, name: &str) -> Option<&ComponentSummary> {
        self.components.iter().find(|component| component.name == name)
    }
}

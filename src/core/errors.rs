use crate::core::components::types::{PortDirection, TypeTag};
use crate::core::types::PortRef;
use thiserror::Error;

/// Structural configuration errors raised while assembling a simulation graph.
///
/// All of these are fatal at setup time and are raised before any simulation
/// step executes. Each variant names the offending component and port.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("component '{0}' is already registered")]
    DuplicateName(String),

    #[error("component '{component}' declares port '{port}' more than once")]
    DuplicatePort { component: String, port: String },

    #[error("{direction} port '{port}' not found on component '{component}'. Valid {direction} ports: {available:?}")]
    UnknownPort {
        component: String,
        port: String,
        direction: PortDirection,
        available: Vec<String>,
    },

    #[error("cannot connect {source_port} ({found}) to {target} ({expected}): type tags differ")]
    TypeMismatch {
        target: PortRef,
        expected: TypeTag,
        source_port: PortRef,
        found: TypeTag,
    },

    #[error("input port {target} is already connected to {existing}")]
    AlreadyConnected { target: PortRef, existing: PortRef },

    #[error("no previously registered component exposes an output of type '{type_tag}' for input {input}")]
    UnresolvedInput { input: PortRef, type_tag: TypeTag },

    #[error("required inputs without a connection: {}", format_ports(.0))]
    MissingConnections(Vec<PortRef>),

    #[error("component graph contains a cycle: {}", .0.join(" -> "))]
    CyclicGraph(Vec<String>),

    #[error("invalid simulation parameters: {0}")]
    InvalidParameters(String),
}

fn format_ports(ports: &[PortRef]) -> String {
    ports
        .iter()
        .map(|port| port.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error returned by a component's per-step evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("port '{0}' is not declared by this component")]
    UnknownPort(String),
    #[error("input '{0}' has no connection")]
    UnconnectedInput(String),
    #[error("{0}")]
    Failed(String),
}

/// Error raised while stepping a validated graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("component '{component}' failed at timestep {timestep}: {source}")]
    Component {
        component: String,
        timestep: usize,
        #[source]
        source: ComponentError,
    },
    #[error("simulation horizon of {0} timesteps already reached")]
    HorizonReached(usize),
}

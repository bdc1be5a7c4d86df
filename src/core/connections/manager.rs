use crate::core::components::types::TypeTag;
use crate::core::errors::SetupError;
use crate::core::types::PortRef;
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether an edge was requested by name or found by the automatic resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionOrigin {
    Explicit,
    Automatic,
}

/// Edge from an output port to an input port
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub source: PortRef,
    pub target: PortRef,
    pub type_tag: TypeTag,
    pub origin: ConnectionOrigin,
}

/// Connection registry keyed by target input port.
///
/// Each input maps to at most one source. Outputs fan out freely.
#[derive(Debug, Clone, Default)]
pub struct ConnectionManager {
    connections: BTreeMap<PortRef, Connection>,
}

impl ConnectionManager {
    /// Create a new connection manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a connection; an occupied input is never overwritten
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), SetupError> {
        if let Some(existing) = self.connections.get(&connection.target) {
            return Err(SetupError::AlreadyConnected {
                target: connection.target,
                existing: existing.source.clone(),
            });
        }
        self.connections.insert(connection.target.clone(), connection);
        Ok(())
    }

    /// Get the connection feeding an input port
    pub fn get(&self, target: &PortRef) -> Option<&Connection> {
        self.connections.get(target)
    }

    /// Check if an input port already has a source
    pub fn is_connected(&self, target: &PortRef) -> bool {
        self.connections.contains_key(target)
    }

    /// All connections, ordered by target port
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Connections feeding the inputs of one component
    pub fn incoming<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .values()
            .filter(move |connection| connection.target.component == component)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Get connection statistics
    pub fn stats(&self) -> ConnectionStats {
        let automatic = self
            .connections
            .values()
            .filter(|connection| connection.origin == ConnectionOrigin::Automatic)
            .count();
        ConnectionStats {
            explicit: self.connections.len() - automatic,
            automatic,
        }
    }
}

/// Connection statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    pub explicit: usize,
    pub automatic: usize,
}

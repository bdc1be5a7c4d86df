use super::manager::{Connection, ConnectionManager, ConnectionOrigin};
use crate::core::components::port_specs::PortSpec;
use crate::core::components::registry::{ComponentInstance, ComponentRegistry, Wiring};
use crate::core::errors::SetupError;
use crate::core::types::PortRef;
use crate::logging::SimulationLogger;

/// Wires unconnected required inputs by type tag.
///
/// For each such input the resolver scans the components registered *before*
/// the consumer, in registration order, and within each candidate its output
/// ports in declaration order. The first output with an equal type tag wins.
/// This is first-match, not best-match: registering a compatible producer
/// earlier changes the wiring. Register producers before the consumers that
/// rely on automatic resolution.
pub struct AutoWiringResolver<'a> {
    registry: &'a ComponentRegistry,
    logger: &'a dyn SimulationLogger,
}

impl<'a> AutoWiringResolver<'a> {
    pub fn new(registry: &'a ComponentRegistry, logger: &'a dyn SimulationLogger) -> Self {
        Self { registry, logger }
    }

    /// Resolve every component registered with [`Wiring::Automatic`], in registration order.
    ///
    /// Returns the number of connections created.
    pub fn resolve_all(&self, connections: &mut ConnectionManager) -> Result<usize, SetupError> {
        let mut created = 0;
        for (position, consumer) in self.registry.iter().enumerate() {
            if consumer.wiring() == Wiring::Automatic {
                created += self.resolve_component(position, consumer, connections)?;
            }
        }
        Ok(created)
    }

    /// Resolve the unconnected required inputs of one component.
    ///
    /// Inputs that already hold a connection (explicit or from an earlier
    /// pass) are left untouched.
    pub fn resolve_component(
        &self,
        position: usize,
        consumer: &ComponentInstance,
        connections: &mut ConnectionManager,
    ) -> Result<usize, SetupError> {
        let mut created = 0;
        for input in consumer.input_ports().iter().filter(|spec| spec.is_required_input()) {
            let target = PortRef::new(consumer.name(), &input.name);
            if connections.is_connected(&target) {
                continue;
            }

            let (producer, output, candidates) =
                self.find_source(position, input)
                    .ok_or_else(|| SetupError::UnresolvedInput {
                        input: target.clone(),
                        type_tag: input.type_tag.clone(),
                    })?;

            let source = PortRef::new(producer.name(), &output.name);
            if candidates > 1 {
                self.logger.warn(
                    "auto_wiring_ambiguous",
                    &[("input", &target), ("chosen", &source), ("candidates", &candidates)],
                );
            }
            self.logger.debug("auto_connected", &[("input", &target), ("source", &source)]);

            connections.add_connection(Connection {
                source,
                target,
                type_tag: input.type_tag.clone(),
                origin: ConnectionOrigin::Automatic,
            })?;
            created += 1;
        }
        Ok(created)
    }

    /// First compatible output among components registered before `position`,
    /// plus how many components could have supplied one
    fn find_source(
        &self,
        position: usize,
        input: &PortSpec,
    ) -> Option<(&'a ComponentInstance, &'a PortSpec, usize)> {
        let mut chosen = None;
        let mut candidates = 0;
        for producer in self.registry.iter().take(position) {
            let matching = producer
                .output_ports()
                .iter()
                .find(|output| output.type_tag == input.type_tag);
            if let Some(output) = matching {
                candidates += 1;
                if chosen.is_none() {
                    chosen = Some((producer, output));
                }
            }
        }
        chosen.map(|(producer, output)| (producer, output, candidates))
    }
}

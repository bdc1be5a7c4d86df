use super::manager::ConnectionManager;
use crate::core::components::port_specs::PortSpec;
use crate::core::errors::SetupError;
use crate::core::types::PortRef;

/// Centralized connection validation logic
pub struct ConnectionValidator;

impl ConnectionValidator {
    /// Type tags must match exactly; there is no implicit unit conversion
    pub fn check_type_compatibility(
        source: &PortRef,
        source_spec: &PortSpec,
        target: &PortRef,
        target_spec: &PortSpec,
    ) -> Result<(), SetupError> {
        debug_assert!(source_spec.direction.can_connect_to(&target_spec.direction));
        if source_spec.type_tag != target_spec.type_tag {
            return Err(SetupError::TypeMismatch {
                target: target.clone(),
                expected: target_spec.type_tag.clone(),
                source_port: source.clone(),
                found: source_spec.type_tag.clone(),
            });
        }
        Ok(())
    }

    /// Check if an input port is already connected (prevents multiple drivers)
    pub fn check_input_port_collision(connections: &ConnectionManager, target: &PortRef) -> Result<(), SetupError> {
        match connections.get(target) {
            Some(existing) => Err(SetupError::AlreadyConnected {
                target: target.clone(),
                existing: existing.source.clone(),
            }),
            None => Ok(()),
        }
    }
}

pub mod connection_validator;
pub mod manager;
pub mod port_validator;
pub mod resolver;

// Re-export commonly used types
pub use connection_validator::ConnectionValidator;
pub use manager::{Connection, ConnectionManager, ConnectionOrigin, ConnectionStats};
pub use port_validator::PortValidator;
pub use resolver::AutoWiringResolver;

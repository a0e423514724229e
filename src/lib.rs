pub mod core;
pub mod network;

// Re-export commonly used types
pub use crate::core::config::SimulationConfig;
pub use crate::core::errors::{ConfigError, InvariantViolation, SimError, SimResult};
pub use crate::core::event::Event;
pub use crate::core::types::{CustomerId, SimTime, StationId};
pub use crate::network::{NetworkDescription, NetworkSimulation, SimulationReport};

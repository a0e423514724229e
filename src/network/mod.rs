pub mod customer;
pub mod generator;
pub mod model;
pub mod report;
pub mod routing;
pub mod simulation;
pub mod station;
pub mod stats;
pub mod topology;

pub use model::{QueueingModel, StationNetwork};
pub use report::SimulationReport;
pub use simulation::NetworkSimulation;
pub use topology::NetworkDescription;

//! Error types for building and running a queueing network

use super::types::{CustomerId, SimTime, StationId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type; every variant is fatal for the run
#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("resource exhaustion: {0}")]
    ResourceExhausted(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialise report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Problems with the network description or the run parameters
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unexpected end of input, expected {expected}")]
    MissingToken { expected: String },

    #[error("invalid {expected}: '{token}'")]
    InvalidNumber { token: String, expected: String },

    #[error(
        "the first token must be a positive integer giving the number of components, found '{0}'"
    )]
    InvalidComponentCount(String),

    #[error("component {id} has type '{tag}'; component types must be one of G, E or Q")]
    InvalidComponentType { id: StationId, tag: String },

    #[error("station {0} is declared more than once")]
    DuplicateStation(StationId),

    #[error("station {station} has invalid mean time {value}; means must be positive and finite")]
    InvalidMean { station: StationId, value: f64 },

    #[error("station {station} declares {count} routes; at least one is required")]
    InvalidRouteCount { station: StationId, count: String },

    #[error("station {station} has route probability {value} outside [0, 1]")]
    InvalidProbability { station: StationId, value: f64 },

    #[error("probabilities for destinations of station {station} sum to {total}, not 1")]
    ProbabilitiesDoNotSum { station: StationId, total: f64 },

    #[error("station {from} routes to station {to}, which does not exist")]
    UnknownDestination { from: StationId, to: StationId },

    #[error("station {from} routes to generator {to}; destinations must be queues or exits")]
    InvalidDestination { from: StationId, to: StationId },

    #[error("end time must be finite and non-negative, got {0}")]
    InvalidEndTime(f64),

    #[error("probability tolerance must be finite and non-negative, got {0}")]
    InvalidTolerance(f64),
}

/// Logic defects detected while the simulation is running
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("illegal event: {0}")]
    IllegalEvent(String),

    #[error("event references unknown customer {0}")]
    UnknownCustomer(CustomerId),

    #[error("departure of customer {customer} at station {station}, which is not at the head of its queue")]
    NotAtHead {
        customer: CustomerId,
        station: StationId,
    },

    #[error("routing at station {station} exhausted: draw {draw} exceeds cumulative probability {total}")]
    RoutingExhausted {
        station: StationId,
        draw: f64,
        total: f64,
    },

    #[error("cannot schedule at {requested} when the clock is at {now}")]
    CausalityViolation { now: SimTime, requested: SimTime },
}

pub type SimResult<T> = Result<T, SimError>;

use super::generator::GeneratorStation;
use super::routing::RouteTable;
use super::stats::RunningStats;
use crate::core::types::{CustomerId, SimTime, StationId};
use rand::Rng;
use rand_distr::{Distribution, Exp};
use std::collections::VecDeque;

/// Exponential sampler parameterised by its mean
#[derive(Debug, Clone, Copy)]
pub struct ExpSampler {
    mean: f64,
    dist: Exp<f64>,
}

impl ExpSampler {
    /// Build a sampler; None unless `mean` is positive and finite
    pub fn with_mean(mean: f64) -> Option<Self> {
        if !(mean.is_finite() && mean > 0.0) {
            return None;
        }
        let dist = Exp::new(1.0 / mean).ok()?;
        Some(Self { mean, dist })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        self.dist.sample(rng)
    }
}

/// Single-server FIFO station
#[derive(Debug, Clone)]
pub struct QueueStation {
    pub id: StationId,
    pub service: ExpSampler,
    pub routes: RouteTable,
    /// Customers at the station in arrival order; the head is in service
    line: VecDeque<CustomerId>,
    /// Customers present, including the one in service
    present: usize,
    /// Time spent waiting before service by each departed customer
    pub wait_stats: RunningStats,
}

impl QueueStation {
    pub fn new(id: StationId, service: ExpSampler, routes: RouteTable) -> Self {
        Self {
            id,
            service,
            routes,
            line: VecDeque::new(),
            present: 0,
            wait_stats: RunningStats::new(),
        }
    }

    /// Add a customer at the tail; returns true if it went straight into service
    pub fn enqueue(&mut self, customer: CustomerId) -> bool {
        self.present += 1;
        self.line.push_back(customer);
        self.present == 1
    }

    /// Remove the customer in service
    pub fn dequeue(&mut self) -> Option<CustomerId> {
        let head = self.line.pop_front()?;
        self.present -= 1;
        Some(head)
    }

    /// Customer currently in service
    pub fn head(&self) -> Option<CustomerId> {
        self.line.front().copied()
    }

    pub fn present(&self) -> usize {
        self.present
    }

    /// Customers waiting behind the one in service
    pub fn waiting(&self) -> usize {
        self.line.len().saturating_sub(1)
    }

    /// Customers that completed service here
    pub fn processed(&self) -> u64 {
        self.wait_stats.count
    }
}

/// Terminal sink
#[derive(Debug, Clone)]
pub struct ExitStation {
    pub id: StationId,
    pub completed: u64,
}

impl ExitStation {
    pub fn new(id: StationId) -> Self {
        Self { id, completed: 0 }
    }
}

#[derive(Debug, Clone)]
pub enum Station {
    Generator(GeneratorStation),
    Queue(QueueStation),
    Exit(ExitStation),
}

impl Station {
    pub fn id(&self) -> StationId {
        match self {
            Station::Generator(g) => g.id,
            Station::Queue(q) => q.id,
            Station::Exit(e) => e.id,
        }
    }

    /// Type tag as written in a network description
    pub fn tag(&self) -> char {
        match self {
            Station::Generator(_) => 'G',
            Station::Queue(_) => 'Q',
            Station::Exit(_) => 'E',
        }
    }

    pub fn as_queue(&self) -> Option<&QueueStation> {
        match self {
            Station::Queue(q) => Some(q),
            _ => None,
        }
    }
}

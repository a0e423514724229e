use super::customer::CustomerLedger;
use super::generator::GeneratorStation;
use super::routing::{Route, RouteTable};
use super::station::{ExitStation, ExpSampler, QueueStation, Station};
use super::stats::RunningStats;
use super::topology::{ComponentSpec, NetworkDescription};
use crate::core::config::SimulationConfig;
use crate::core::errors::{ConfigError, InvariantViolation, SimResult};
use crate::core::event::Event;
use crate::core::event_scheduler::EventScheduler;
use crate::core::simulation_engine::EventHandler;
use crate::core::types::{CustomerId, StationId};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Every station of the network, indexed by id
#[derive(Debug, Default)]
pub struct StationNetwork {
    stations: BTreeMap<StationId, Station>,
}

impl StationNetwork {
    pub fn new() -> Self {
        Self {
            stations: BTreeMap::new(),
        }
    }

    fn insert(&mut self, station: Station) -> Result<(), ConfigError> {
        let id = station.id();
        if self.stations.insert(id, station).is_some() {
            return Err(ConfigError::DuplicateStation(id));
        }
        Ok(())
    }

    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn get_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.get_mut(&id)
    }

    /// Stations in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Queue stations in ascending id order
    pub fn queues(&self) -> impl Iterator<Item = &QueueStation> {
        self.stations.values().filter_map(Station::as_queue)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// The queueing network under simulation.
///
/// Owns the stations, the customer ledger, the global exit statistics and
/// the run's random source. The engine drives it through [`EventHandler`].
#[derive(Debug)]
pub struct QueueingModel {
    stations: StationNetwork,
    customers: CustomerLedger,
    /// Time in system of each customer, recorded as it exits
    system_stats: RunningStats,
    rng: StdRng,
    seed: u64,
}

impl QueueingModel {
    /// Build the stations of `description` and schedule every generator's arrivals.
    ///
    /// Generators run in declaration order and draw from the shared random
    /// source, so the same seed always yields the same arrival streams.
    pub fn build(
        description: &NetworkDescription,
        config: &SimulationConfig,
        scheduler: &mut EventScheduler<Event>,
    ) -> SimResult<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("Building network with random seed {}", seed);

        let mut model = Self {
            stations: StationNetwork::new(),
            customers: CustomerLedger::new(),
            system_stats: RunningStats::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        };

        for component in description.components() {
            let station = match component {
                ComponentSpec::Generator {
                    id,
                    mean_interarrival,
                    destination,
                } => {
                    let mut generator =
                        GeneratorStation::new(*id, sampler(*id, *mean_interarrival)?, *destination);
                    generator.generate_arrivals(
                        config.end_time,
                        &mut model.rng,
                        &mut model.customers,
                        scheduler,
                    )?;
                    Station::Generator(generator)
                }
                ComponentSpec::Exit { id } => Station::Exit(ExitStation::new(*id)),
                ComponentSpec::Queue {
                    id,
                    mean_service,
                    probabilities,
                    destinations,
                } => {
                    let routes = probabilities
                        .iter()
                        .zip(destinations)
                        .map(|(&probability, &destination)| Route {
                            probability,
                            destination,
                        })
                        .collect();
                    Station::Queue(QueueStation::new(
                        *id,
                        sampler(*id, *mean_service)?,
                        RouteTable::new(routes).with_tolerance(config.probability_tolerance),
                    ))
                }
            };
            model.stations.insert(station)?;
        }

        info!(
            "Network ready: {} stations, {} customers generated",
            model.stations.len(),
            model.customers.len()
        );
        Ok(model)
    }

    pub fn stations(&self) -> &StationNetwork {
        &self.stations
    }

    pub fn customers(&self) -> &CustomerLedger {
        &self.customers
    }

    /// Time-in-system statistics accumulated as customers exit
    pub fn system_stats(&self) -> &RunningStats {
        &self.system_stats
    }

    /// Seed the run's random source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Customers created by the generators
    pub fn entered(&self) -> u64 {
        self.customers.len() as u64
    }

    /// Customers that reached an exit
    pub fn exited(&self) -> u64 {
        self.system_stats.count
    }

    fn arrival(
        &mut self,
        customer: CustomerId,
        station: StationId,
        scheduler: &mut EventScheduler<Event>,
    ) -> SimResult<()> {
        let now = scheduler.current_time();
        match self.stations.get_mut(station) {
            Some(Station::Exit(exit)) => {
                let record = self.customers.get_mut(customer)?;
                if record.has_exited() {
                    return Err(InvariantViolation::IllegalEvent(format!(
                        "customer {} reached exit {} after already leaving the network",
                        customer, station
                    ))
                    .into());
                }
                record.exit_time = Some(now);
                let time_in_system = now - record.entry_time;
                self.system_stats.record(time_in_system);
                exit.completed += 1;
                debug!(
                    "t={:.6}: customer {} exits at {} after {:.6}",
                    now, customer, station, time_in_system
                );
            }
            Some(Station::Queue(queue)) => {
                let record = self.customers.get_mut(customer)?;
                record.queue_arrival_time = now;
                if queue.enqueue(customer) {
                    let service = queue.service.sample(&mut self.rng);
                    record.service_time = service;
                    scheduler.schedule(now + service, Event::departure(customer, station))?;
                }
                debug!(
                    "t={:.6}: customer {} arrives at queue {} ({} present)",
                    now,
                    customer,
                    station,
                    queue.present()
                );
            }
            Some(Station::Generator(_)) => {
                return Err(InvariantViolation::IllegalEvent(format!(
                    "arrival of customer {} at generator {}",
                    customer, station
                ))
                .into());
            }
            None => {
                return Err(InvariantViolation::IllegalEvent(format!(
                    "arrival of customer {} at unknown station {}",
                    customer, station
                ))
                .into());
            }
        }
        Ok(())
    }

    fn departure(
        &mut self,
        customer: CustomerId,
        station: StationId,
        scheduler: &mut EventScheduler<Event>,
    ) -> SimResult<()> {
        let now = scheduler.current_time();
        let queue = match self.stations.get_mut(station) {
            Some(Station::Queue(queue)) => queue,
            Some(other) => {
                return Err(InvariantViolation::IllegalEvent(format!(
                    "departure of customer {} from station {} of type {}",
                    customer,
                    station,
                    other.tag()
                ))
                .into());
            }
            None => {
                return Err(InvariantViolation::IllegalEvent(format!(
                    "departure of customer {} from unknown station {}",
                    customer, station
                ))
                .into());
            }
        };
        if queue.head() != Some(customer) {
            return Err(InvariantViolation::NotAtHead { customer, station }.into());
        }

        let record = self.customers.get_mut(customer)?;
        let waited = queue_wait(now, record.queue_arrival_time, record.service_time);
        if waited < 0.0 {
            warn!(
                "t={:.6}: customer {} at queue {} has negative wait {}",
                now, customer, station, waited
            );
        }
        queue.wait_stats.record(waited);

        let next = queue.routes.choose(station, &mut self.rng)?;
        scheduler.schedule(now, Event::arrival(customer, next))?;
        queue.dequeue();
        debug!(
            "t={:.6}: customer {} leaves queue {} for {} ({} present)",
            now,
            customer,
            station,
            next,
            queue.present()
        );

        if let Some(head) = queue.head() {
            let service = queue.service.sample(&mut self.rng);
            let record = self.customers.get_mut(head)?;
            record.service_time = service;
            record.waiting_time += now - record.queue_arrival_time;
            scheduler.schedule(now + service, Event::departure(head, station))?;
        }
        Ok(())
    }
}

impl EventHandler for QueueingModel {
    type Event = Event;

    fn handle(&mut self, event: Event, scheduler: &mut EventScheduler<Event>) -> SimResult<()> {
        match event {
            Event::Arrival { customer, station } => self.arrival(customer, station, scheduler),
            Event::Departure { customer, station } => self.departure(customer, station, scheduler),
        }
    }
}

/// Relative slack under which a negative wait is treated as rounding
const WAIT_ROUNDING_SLACK: f64 = 1e-9;

/// Time spent waiting before service, `now - arrival - service`.
///
/// A customer served on arrival can come out a few ulps below zero; that is
/// snapped to 0. Anything more negative is returned as is.
fn queue_wait(now: f64, arrival: f64, service: f64) -> f64 {
    let raw = now - arrival - service;
    if raw < 0.0 && raw >= -WAIT_ROUNDING_SLACK * now.abs().max(1.0) {
        0.0
    } else {
        raw
    }
}

fn sampler(station: StationId, mean: f64) -> Result<ExpSampler, ConfigError> {
    ExpSampler::with_mean(mean).ok_or(ConfigError::InvalidMean {
        station,
        value: mean,
    })
}

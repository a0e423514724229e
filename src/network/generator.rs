use super::customer::CustomerLedger;
use super::station::ExpSampler;
use crate::core::errors::SimResult;
use crate::core::event::Event;
use crate::core::event_scheduler::EventScheduler;
use crate::core::types::{SimTime, StationId};
use log::info;
use rand::Rng;

/// Source of exogenous arrivals.
///
/// A generator produces its whole arrival stream when the network is built:
/// every customer it will ever create is admitted to the ledger and has its
/// first arrival scheduled before the run starts.
#[derive(Debug, Clone)]
pub struct GeneratorStation {
    pub id: StationId,
    pub interarrival: ExpSampler,
    pub destination: StationId,
    /// Customers generated for the horizon
    pub generated: u64,
}

impl GeneratorStation {
    pub fn new(id: StationId, interarrival: ExpSampler, destination: StationId) -> Self {
        Self {
            id,
            interarrival,
            destination,
            generated: 0,
        }
    }

    /// Materialise every arrival up to `end_time`.
    ///
    /// Exponential gaps are accumulated from t=0; the first arrival past the
    /// end time is discarded and generation stops.
    pub fn generate_arrivals<R: Rng + ?Sized>(
        &mut self,
        end_time: SimTime,
        rng: &mut R,
        ledger: &mut CustomerLedger,
        scheduler: &mut EventScheduler<Event>,
    ) -> SimResult<u64> {
        let mut clock = 0.0;
        loop {
            clock += self.interarrival.sample(rng);
            if clock > end_time {
                break;
            }
            let customer = ledger.admit(clock)?;
            scheduler.schedule(clock, Event::arrival(customer, self.destination))?;
            self.generated += 1;
        }

        info!(
            "Generator {} scheduled {} arrivals at station {}",
            self.id, self.generated, self.destination
        );
        Ok(self.generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CustomerId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(mean: f64) -> GeneratorStation {
        GeneratorStation::new(StationId(0), ExpSampler::with_mean(mean).unwrap(), StationId(1))
    }

    #[test]
    fn test_zero_horizon_generates_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ledger = CustomerLedger::new();
        let mut scheduler = EventScheduler::new();

        let count = generator(5.0)
            .generate_arrivals(0.0, &mut rng, &mut ledger, &mut scheduler)
            .unwrap();

        assert_eq!(count, 0);
        assert!(ledger.is_empty());
        assert!(!scheduler.has_events());
    }

    #[test]
    fn test_arrivals_are_increasing_and_within_horizon() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ledger = CustomerLedger::new();
        let mut scheduler = EventScheduler::new();

        let count = generator(2.0)
            .generate_arrivals(500.0, &mut rng, &mut ledger, &mut scheduler)
            .unwrap();

        assert!(count > 0);
        assert_eq!(ledger.len() as u64, count);
        assert_eq!(scheduler.pending() as u64, count);

        let entries: Vec<f64> = ledger.iter().map(|c| c.entry_time).collect();
        assert!(entries.windows(2).all(|w| w[0] <= w[1]));
        assert!(entries.iter().all(|&t| t > 0.0 && t <= 500.0));

        // Scheduled arrivals carry the ledger's customers in creation order
        let mut expected = 1;
        while let Some((time, event)) = scheduler.pop_next() {
            assert_eq!(event, Event::arrival(CustomerId(expected), StationId(1)));
            assert_eq!(time, ledger.get(CustomerId(expected)).unwrap().entry_time);
            expected += 1;
        }
    }
}

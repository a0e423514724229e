use super::errors::SimResult;
use super::event_scheduler::EventScheduler;
use super::types::SimTime;
use log::{info, trace};

/// Model side of the engine boundary: receives each due event exactly once
pub trait EventHandler {
    type Event;

    /// Handle one event. New work is requested through `scheduler`.
    fn handle(
        &mut self,
        event: Self::Event,
        scheduler: &mut EventScheduler<Self::Event>,
    ) -> SimResult<()>;
}

/// Observer trait for simulation events
pub trait SimulationObserver<E> {
    /// Called when the simulation clock advances
    fn on_time_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called after an event has been handled
    fn on_event_complete(&mut self, time: SimTime, event: &E);
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub events_processed: u64,
    pub final_time: SimTime,
    /// Events left in the queue because they were due after the end time
    pub pending_events: usize,
}

pub struct SimulationEngine<E> {
    scheduler: EventScheduler<E>,
    end_time: SimTime,
    events_processed: u64,
    observers: Vec<Box<dyn SimulationObserver<E>>>,
}

impl<E> SimulationEngine<E>
where
    E: Clone + std::fmt::Display,
{
    /// Create a new SimulationEngine that stops after `end_time`
    pub fn new(end_time: SimTime) -> Self {
        Self {
            scheduler: EventScheduler::new(),
            end_time,
            events_processed: 0,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<E>>) {
        self.observers.push(observer);
    }

    /// Scheduler used to seed the initial events before `run`
    pub fn scheduler_mut(&mut self) -> &mut EventScheduler<E> {
        &mut self.scheduler
    }

    /// Run until no event is due at or before the end time
    pub fn run<H>(&mut self, handler: &mut H) -> SimResult<RunSummary>
    where
        H: EventHandler<Event = E>,
    {
        info!(
            "Running simulation to t={} with {} scheduled events",
            self.end_time,
            self.scheduler.pending()
        );

        while self.step(handler)? {}

        let summary = RunSummary {
            events_processed: self.events_processed,
            final_time: self.scheduler.current_time(),
            pending_events: self.scheduler.pending(),
        };
        info!(
            "Simulation finished at t={} after {} events ({} pending beyond end time)",
            summary.final_time, summary.events_processed, summary.pending_events
        );
        Ok(summary)
    }

    /// Deliver the next due event, returns false once nothing is due
    pub fn step<H>(&mut self, handler: &mut H) -> SimResult<bool>
    where
        H: EventHandler<Event = E>,
    {
        match self.scheduler.peek_next_time() {
            Some(next) if next <= self.end_time => {}
            _ => return Ok(false),
        }

        let old_time = self.scheduler.current_time();
        let Some((time, event)) = self.scheduler.pop_next() else {
            return Ok(false);
        };

        if old_time != time {
            for observer in &mut self.observers {
                observer.on_time_advance(old_time, time);
            }
        }

        trace!("t={:.6}: {}", time, event);
        if self.observers.is_empty() {
            handler.handle(event, &mut self.scheduler)?;
        } else {
            // The handler consumes the event; observers see a copy afterwards.
            let observed = event.clone();
            handler.handle(event, &mut self.scheduler)?;
            for observer in &mut self.observers {
                observer.on_event_complete(time, &observed);
            }
        }
        self.events_processed += 1;

        Ok(true)
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimTime {
        self.scheduler.current_time()
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }
}

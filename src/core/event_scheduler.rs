use super::errors::InvariantViolation;
use super::types::SimTime;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent<E> {
    pub timestamp: SimTime,
    pub sequence_num: u64,
    pub event: E,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .timestamp
            .total_cmp(&self.timestamp)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Time-ordered pending events plus the virtual clock.
///
/// Events with equal timestamps come out in the order they were scheduled.
pub struct EventScheduler<E> {
    event_queue: BinaryHeap<ScheduledEvent<E>>,
    sequence_counter: u64,
    now: SimTime,
}

impl<E> EventScheduler<E> {
    /// Create a new EventScheduler with the clock at zero
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            now: 0.0,
        }
    }

    /// Schedule an event at an absolute timestamp, which must not lie in the past
    pub fn schedule(&mut self, timestamp: SimTime, event: E) -> Result<(), InvariantViolation> {
        if !timestamp.is_finite() || timestamp < self.now {
            return Err(InvariantViolation::CausalityViolation {
                now: self.now,
                requested: timestamp,
            });
        }

        self.event_queue.push(ScheduledEvent {
            timestamp,
            sequence_num: self.sequence_counter,
            event,
        });
        self.sequence_counter += 1;
        Ok(())
    }

    /// Current simulation time
    pub fn current_time(&self) -> SimTime {
        self.now
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Number of events still waiting to be delivered
    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }

    /// Get the next event timestamp without removing it
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.timestamp)
    }

    /// Remove the earliest event and advance the clock to its timestamp
    pub fn pop_next(&mut self) -> Option<(SimTime, E)> {
        let scheduled = self.event_queue.pop()?;
        self.now = scheduled.timestamp;
        Some((scheduled.timestamp, scheduled.event))
    }
}

impl<E> Default for EventScheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_come_out_in_time_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(3.0, "c").unwrap();
        scheduler.schedule(1.0, "a").unwrap();
        scheduler.schedule(2.0, "b").unwrap();

        assert_eq!(scheduler.pop_next(), Some((1.0, "a")));
        assert_eq!(scheduler.pop_next(), Some((2.0, "b")));
        assert_eq!(scheduler.pop_next(), Some((3.0, "c")));
        assert_eq!(scheduler.pop_next(), None);
    }

    #[test]
    fn test_equal_timestamps_keep_insertion_order() {
        let mut scheduler = EventScheduler::new();
        for i in 0..5 {
            scheduler.schedule(1.0, i).unwrap();
        }
        let order: Vec<i32> = std::iter::from_fn(|| scheduler.pop_next().map(|(_, e)| e)).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pop_advances_clock() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(2.5, ()).unwrap();
        assert_eq!(scheduler.current_time(), 0.0);
        scheduler.pop_next();
        assert_eq!(scheduler.current_time(), 2.5);
    }

    #[test]
    fn test_rejects_past_and_non_finite_timestamps() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(5.0, ()).unwrap();
        scheduler.pop_next();

        assert!(matches!(
            scheduler.schedule(4.0, ()),
            Err(InvariantViolation::CausalityViolation { .. })
        ));
        assert!(scheduler.schedule(f64::NAN, ()).is_err());
        assert!(scheduler.schedule(f64::INFINITY, ()).is_err());
        // Scheduling at the current instant is allowed
        assert!(scheduler.schedule(5.0, ()).is_ok());
        assert_eq!(scheduler.pending(), 1);
    }
}

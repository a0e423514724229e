use super::types::{CustomerId, StationId};

/// Something that happens to one customer at one station.
///
/// An event is owned by the scheduler until it is due, then moved into the
/// handler, which consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The customer reaches the station
    Arrival {
        customer: CustomerId,
        station: StationId,
    },
    /// The customer finishes service at the station
    Departure {
        customer: CustomerId,
        station: StationId,
    },
}

impl Event {
    pub fn arrival(customer: CustomerId, station: StationId) -> Self {
        Event::Arrival { customer, station }
    }

    pub fn departure(customer: CustomerId, station: StationId) -> Self {
        Event::Departure { customer, station }
    }

    /// Customer the event concerns
    pub fn customer(&self) -> CustomerId {
        match self {
            Event::Arrival { customer, .. } | Event::Departure { customer, .. } => *customer,
        }
    }

    /// Station the event is delivered to
    pub fn station(&self) -> StationId {
        match self {
            Event::Arrival { station, .. } | Event::Departure { station, .. } => *station,
        }
    }

    /// Short name used in logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Arrival { .. } => "arrival",
            Event::Departure { .. } => "departure",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of customer {} at station {}",
            self.kind(),
            self.customer(),
            self.station()
        )
    }
}

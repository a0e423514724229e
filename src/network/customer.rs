use crate::core::errors::{InvariantViolation, SimError, SimResult};
use crate::core::types::{CustomerId, SimTime};

/// One entity travelling through the network
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    /// Time the customer was generated
    pub entry_time: SimTime,
    /// Time the customer reached an exit, None while still in the network
    pub exit_time: Option<SimTime>,
    /// Time the customer joined the queue it is currently at
    pub queue_arrival_time: SimTime,
    /// Total time spent waiting in queues, excluding service
    pub waiting_time: SimTime,
    /// Duration of the most recent service
    pub service_time: SimTime,
}

impl Customer {
    /// Create a customer entering the network at `entry_time`
    pub fn new(id: CustomerId, entry_time: SimTime) -> Self {
        Self {
            id,
            entry_time,
            exit_time: None,
            queue_arrival_time: 0.0,
            waiting_time: 0.0,
            service_time: 0.0,
        }
    }

    pub fn has_exited(&self) -> bool {
        self.exit_time.is_some()
    }

    /// Exit time minus entry time, for customers that left the network
    pub fn time_in_system(&self) -> Option<SimTime> {
        self.exit_time.map(|exit| exit - self.entry_time)
    }
}

/// Owner of every customer created during a run, in creation order.
///
/// Customer ids start at 1 and index the ledger directly.
#[derive(Debug, Default)]
pub struct CustomerLedger {
    customers: Vec<Customer>,
}

impl CustomerLedger {
    pub fn new() -> Self {
        Self {
            customers: Vec::new(),
        }
    }

    /// Create and store a new customer, returning its id
    pub fn admit(&mut self, entry_time: SimTime) -> SimResult<CustomerId> {
        self.customers.try_reserve(1).map_err(|e| {
            SimError::ResourceExhausted(format!(
                "cannot allocate customer {}: {}",
                self.customers.len() + 1,
                e
            ))
        })?;
        let id = CustomerId(self.customers.len() as u64 + 1);
        self.customers.push(Customer::new(id, entry_time));
        Ok(id)
    }

    pub fn get(&self, id: CustomerId) -> Option<&Customer> {
        let index = (id.value() as usize).checked_sub(1)?;
        self.customers.get(index)
    }

    /// Mutable access to a customer the model is handling
    pub fn get_mut(&mut self, id: CustomerId) -> Result<&mut Customer, InvariantViolation> {
        (id.value() as usize)
            .checked_sub(1)
            .and_then(|index| self.customers.get_mut(index))
            .ok_or(InvariantViolation::UnknownCustomer(id))
    }

    /// Number of customers ever created
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// All customers in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }
}

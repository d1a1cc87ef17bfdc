use super::errors::DomainError;
use super::order::Iteration;

/// Destination of generated rows. One call writes and commits one iteration.
pub trait LoadSink {
    /// Upserts the customer, inserts the order and, when present, the
    /// payment, all inside a single transaction.
    fn write(&mut self, iteration: &Iteration) -> Result<(), DomainError>;
}

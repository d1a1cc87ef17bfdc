use std::time::Duration;

use crate::domain::errors::DomainError;
use crate::domain::order::{Customer, Iteration};
use crate::domain::ports::LoadSink;
use crate::domain::synth::Synthesizer;

/// Counts of what a completed run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u32,
    pub orders: u32,
    pub payments: u32,
}

/// Drives the generate-insert-commit-pause loop.
pub struct LoadGenerator<S, G> {
    sink: S,
    synth: G,
    rows: u32,
    interval: Duration,
}

impl<S: LoadSink, G: Synthesizer> LoadGenerator<S, G> {
    pub fn new(sink: S, synth: G, rows: u32, interval: Duration) -> Self {
        Self {
            sink,
            synth,
            rows,
            interval,
        }
    }

    /// Synthesizes and writes a single iteration. The payment is only drawn
    /// for placed orders.
    pub fn step(&mut self, index: i32) -> Result<Iteration, DomainError> {
        let order = self.synth.order();
        let (first_name, last_name) = self.synth.customer_name();
        let payment = if order.is_placed() {
            log::info!("{}", order.status);
            Some(self.synth.payment())
        } else {
            None
        };

        let iteration = Iteration {
            index,
            customer: Customer {
                id: order.user_id,
                first_name,
                last_name,
            },
            order,
            payment,
        };
        self.sink.write(&iteration)?;
        Ok(iteration)
    }

    /// Runs iterations `1..=rows`, pausing after each commit. The first
    /// failed write stops the run and is returned.
    pub fn run(&mut self) -> Result<RunSummary, DomainError> {
        let last = i32::try_from(self.rows).map_err(|_| {
            DomainError::InvalidInput(format!("row count {} is out of range", self.rows))
        })?;

        let mut summary = RunSummary::default();
        for index in 1..=last {
            let iteration = self.step(index)?;
            summary.iterations += 1;
            summary.orders += 1;
            if iteration.payment.is_some() {
                summary.payments += 1;
            }

            if !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
        }
        Ok(summary)
    }
}

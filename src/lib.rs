pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod infrastructure;
pub mod schema;

pub use application::load_generator::{LoadGenerator, RunSummary};
pub use config::{DbSettings, LoadgenConfig, PaymentOrderRef};
pub use errors::LoadgenError;

use domain::synth::RandomSynthesizer;
use infrastructure::load_repo::DieselLoadSink;

/// How a run ended when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The database could not be reached; nothing was written.
    ConnectionFailed(String),
}

/// Connect, run the configured number of iterations, and close.
///
/// A connection failure is logged and reported as
/// [`RunOutcome::ConnectionFailed`] rather than as an error. Any failure
/// after that aborts the in-flight transaction and is returned.
pub fn run(config: &LoadgenConfig) -> Result<RunOutcome, LoadgenError> {
    let conn = match db::establish(&config.db) {
        Ok(conn) => conn,
        Err(e) => {
            log::error!("postgres connect error: {}", e);
            return Ok(RunOutcome::ConnectionFailed(e.to_string()));
        }
    };
    log::info!("connected to postgres: {:?}", config.db);

    let sink = DieselLoadSink::new(conn, config.payment_order_ref);
    let synth = RandomSynthesizer::with_seed(config.seed);
    let mut generator = LoadGenerator::new(sink, synth, config.rows, config.interval);
    let summary = generator.run()?;
    Ok(RunOutcome::Completed(summary))
}

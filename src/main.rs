use dotenvy::dotenv;
use jaffle_loadgen::{run, LoadgenConfig, LoadgenError, RunOutcome};

fn main() -> Result<(), LoadgenError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = LoadgenConfig::from_env()?;
    log::info!(
        "Generating {} rows, pausing {:?} between commits",
        config.rows,
        config.interval
    );

    match run(&config)? {
        RunOutcome::Completed(summary) => log::info!(
            "Done: {} orders, {} payments over {} iterations",
            summary.orders,
            summary.payments,
            summary.iterations
        ),
        // Already reported; a missing database is not a failed run.
        RunOutcome::ConnectionFailed(_) => {}
    }
    Ok(())
}

//! Tracekey benchmark binary.
//!
//! Generates daily tracing keys for a simulated population, then derives
//! every proximity identifier for them across all cores and reports how long
//! that took.
//!
//! # Usage
//!
//! ```bash
//! # Default population: 50 000 people, 10 days each, all 144 intervals
//! tracekey-bench
//!
//! # Smaller smoke run on 4 workers, 143 intervals per key
//! tracekey-bench --people 1000 --workers 4 --sample-intervals 143
//! ```

mod system_env;

use std::{num::NonZeroUsize, time::Duration};

use clap::Parser;
use tokio::task::{JoinError, JoinHandle};
use tracekey_core::{
    IdentifierMode, ParallelRunner, PopulationConfig, Progress, RunnerConfig, generate_daily_keys,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::system_env::SystemEnv;

// Worker failures are reported by joining panicked threads, which needs
// unwinding.
#[cfg(not(panic = "unwind"))]
compile_error!("tracekey-bench must be built with panic = \"unwind\"");

/// How often the progress monitor samples the shared counter
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Proximity identifier derivation benchmark
#[derive(Parser, Debug)]
#[command(name = "tracekey-bench")]
#[command(about = "Derive rolling proximity identifiers for a simulated population")]
#[command(version)]
struct Args {
    /// Number of simulated people
    #[arg(long, default_value_t = PopulationConfig::default().people)]
    people: usize,

    /// Daily keys per person, counting back from today
    #[arg(long, default_value_t = PopulationConfig::default().days_per_person)]
    days: usize,

    /// Worker threads (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    /// Derive only intervals 0..N per key instead of the whole day
    #[arg(long)]
    sample_intervals: Option<u8>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let env = SystemEnv::new();
    let population = PopulationConfig { people: args.people, days_per_person: args.days };
    let runner = ParallelRunner::new(RunnerConfig {
        workers: args.workers,
        mode: args.sample_intervals.map_or(IdentifierMode::AllIntervals, IdentifierMode::Sample),
    });

    let keys = tokio::task::spawn_blocking({
        let env = env.clone();
        move || generate_daily_keys(&env, population)
    })
    .await??;

    let total = keys.len();
    tracing::info!(keys = total, workers = runner.workers().get(), "processing daily keys");

    let progress = Progress::new();
    let run = tokio::task::spawn_blocking({
        let progress = progress.clone();
        move || runner.run(&env, &keys, Some(&progress))
    });

    let report = monitor_progress(run, &progress, total).await??;

    tracing::info!(
        identifiers = report.identifiers_derived,
        chunks = report.chunks,
        "took {:.2} seconds",
        report.elapsed.as_secs_f64()
    );

    Ok(())
}

/// Log the completion percentage once per interval until `task` finishes.
///
/// Reads are unsynchronized with the workers, so a sample may lag behind.
async fn monitor_progress<T>(
    mut task: JoinHandle<T>,
    progress: &Progress,
    total: usize,
) -> Result<T, JoinError> {
    let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
    loop {
        tokio::select! {
            result = &mut task => return result,
            _ = ticker.tick() => {
                tracing::info!("processing daily keys ({:.0}%)", progress.percent_of(total));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn workers_unwind_on_panic() {
        // A panicking worker must be joinable so the run can report it
        assert!(cfg!(panic = "unwind"));
        let fail = true;
        let joined = std::thread::spawn(move || assert!(!fail, "worker failed")).join();
        assert!(joined.is_err());
    }
}

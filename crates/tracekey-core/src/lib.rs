//! Tracekey population harness.
//!
//! Generates daily tracing keys for a simulated population and derives their
//! proximity identifiers across all available cores.
//!
//! # Architecture
//!
//! Everything here is synchronous, deterministic logic over in-memory keys.
//! The clock and the random source come in through [`Environment`], so tests
//! run with a seeded RNG and a fixed day while the `tracekey-bench` binary
//! plugs in the OS RNG and system time.
//!
//! ```text
//! Environment (clock, RNG)
//!        │
//!        ▼
//! generate_daily_keys → [DailyTracingKey] (person-major, day-minor)
//!        │
//!        ▼
//! ParallelRunner → partition → one worker per chunk → RunReport
//!                                      │
//!                                      └─► Progress (shared counter)
//! ```
//!
//! # Components
//!
//! - [`generate_daily_keys`]: builds the (person × day) key set
//! - [`ParallelRunner`]: chunked, concurrent identifier derivation
//! - [`Progress`]: live count of finished keys, sampled by the caller
//! - [`Environment`]: time and randomness capability

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod error;
pub mod population;
pub mod progress;
pub mod runner;

pub use env::Environment;
pub use error::{GenerationError, RandomnessError, RunError};
pub use population::{
    PopulationConfig, SECONDS_PER_DAY, day_number_from_unix_secs, day_numbers_descending,
    generate_daily_keys, generate_person,
};
pub use progress::Progress;
pub use runner::{ChunkOutput, IdentifierMode, ParallelRunner, RunReport, RunnerConfig, partition};

//! Error types for population generation and parallel runs.
//!
//! Every error here is fatal to the run that produced it. Nothing is retried:
//! the inputs are in-memory and deterministic, so the only failure sources
//! are entropy exhaustion and broken workers.

use thiserror::Error;
use tracekey_crypto::{DayNumber, DerivationError};

/// The secure random source could not supply the requested bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("secure random source failed to supply {requested} bytes: {reason}")]
pub struct RandomnessError {
    /// Number of bytes requested
    pub requested: usize,
    /// Description from the underlying source
    pub reason: String,
}

/// Population generation failed. Carries the indices needed to reproduce it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Drawing the tracing key for a person failed
    #[error("generating person {person}: {source}")]
    Person {
        /// Index of the person being generated
        person: usize,
        /// Underlying randomness failure
        source: RandomnessError,
    },

    /// Deriving one of a person's daily keys failed
    #[error("generating person {person}, daily key for day {day}: {source}")]
    DailyKey {
        /// Index of the person whose key failed
        person: usize,
        /// Day number being derived
        day: DayNumber,
        /// Underlying derivation failure
        source: DerivationError,
    },

    /// The key set cannot be counted or allocated
    #[error("cannot hold {people} people x {days_per_person} daily keys in memory")]
    TooManyKeys {
        /// Requested population size
        people: usize,
        /// Requested keys per person
        days_per_person: usize,
    },
}

impl GenerationError {
    /// Index of the person that triggered the failure, if one did.
    pub fn person(&self) -> Option<usize> {
        match self {
            Self::Person { person, .. } | Self::DailyKey { person, .. } => Some(*person),
            Self::TooManyKeys { .. } => None,
        }
    }
}

/// A parallel run did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// A worker stopped before finishing its chunk
    #[error("worker for chunk {chunk} failed: {reason}")]
    WorkerFailed {
        /// Index of the lowest failing chunk
        chunk: usize,
        /// Panic message of the worker, if it had one
        reason: String,
    },
}

//! Tracing key hierarchy: tracing keys, daily keys, proximity identifiers.

mod daily;
mod derivation;
mod error;
mod person;

pub use daily::{DailyTracingKey, ProximityIdentifier};
pub use derivation::{
    DAILY_KEY_SIZE, INTERVALS_PER_DAY, MAX_INTERVAL, PROXIMITY_IDENTIFIER_SIZE, TRACING_KEY_SIZE,
    derive_all_proximity_identifiers, derive_daily_key, derive_proximity_identifier,
};
pub use error::DerivationError;
pub use person::{Person, TracingKey};

/// Days since the Unix epoch (1970-01-01 UTC).
pub type DayNumber = u32;

/// Index of a ten-minute interval within a day, in `0..=MAX_INTERVAL`.
pub type TimeIntervalNumber = u8;

//! Tracekey Cryptographic Primitives
//!
//! Key derivation for decentralized proximity tracing. Pure functions with
//! deterministic outputs. Callers provide random bytes for the root secret so
//! that tests stay deterministic.
//!
//! # Key Hierarchy
//!
//! Each person holds one long-lived random tracing key. A daily tracing key is
//! derived from it for every day number, and from each daily key one rolling
//! proximity identifier is derived per ten-minute interval of the day.
//!
//! ```text
//! Tracing Key (32 random bytes, per person)
//!        │
//!        ▼
//! HKDF-Expand("CT-DTK" || day) → Daily Tracing Key (16 bytes, per day)
//!        │
//!        ▼
//! HMAC("CT-RPI" || interval) → Proximity Identifier (16 bytes, 144 per day)
//! ```
//!
//! Proximity identifiers are broadcast in the clear. Daily keys are only
//! revealed on diagnosis, which links the identifiers of that day without
//! exposing any other day or the tracing key itself.
//!
//! # Security
//!
//! Unlinkability:
//! - Identifiers of one day reveal nothing about identifiers of another day
//! - Identifiers of different intervals cannot be linked without the daily key
//!
//! Key Hygiene:
//! - Tracing keys and daily keys are zeroized on drop
//! - `Debug` output never contains secret bytes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod keys;

pub use keys::{
    DAILY_KEY_SIZE, DailyTracingKey, DayNumber, DerivationError, INTERVALS_PER_DAY, MAX_INTERVAL,
    PROXIMITY_IDENTIFIER_SIZE, Person, ProximityIdentifier, TRACING_KEY_SIZE, TimeIntervalNumber,
    TracingKey, derive_all_proximity_identifiers, derive_daily_key, derive_proximity_identifier,
};

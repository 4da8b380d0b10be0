//! Per-person root secret

use std::fmt;

use zeroize::Zeroize;

use super::{
    DayNumber,
    daily::DailyTracingKey,
    derivation::{TRACING_KEY_SIZE, derive_daily_key},
    error::DerivationError,
};

/// Long-lived 32-byte secret from which all of a person's daily keys derive.
///
/// Never derived and never shared between people. Not `Clone`: a tracing key
/// has exactly one owner.
pub struct TracingKey {
    key: [u8; TRACING_KEY_SIZE],
}

impl TracingKey {
    /// Wrap 32 bytes drawn from a cryptographically secure source.
    pub fn from_bytes(key: [u8; TRACING_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; TRACING_KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for TracingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TracingKey(<redacted>)")
    }
}

impl Drop for TracingKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// A simulated person, modeled purely as a source of daily tracing keys.
///
/// Immutable after creation.
#[derive(Debug)]
pub struct Person {
    tracing_key: TracingKey,
}

impl Person {
    /// Create a person owning `tracing_key`.
    pub fn new(tracing_key: TracingKey) -> Self {
        Self { tracing_key }
    }

    /// Create a person from 32 freshly drawn random bytes.
    pub fn from_random_bytes(bytes: [u8; TRACING_KEY_SIZE]) -> Self {
        Self::new(TracingKey::from_bytes(bytes))
    }

    /// This person's tracing key.
    pub fn tracing_key(&self) -> &TracingKey {
        &self.tracing_key
    }

    /// Derive the daily tracing key for `day`.
    pub fn daily_tracing_key(&self, day: DayNumber) -> Result<DailyTracingKey, DerivationError> {
        derive_daily_key(self.tracing_key.as_bytes(), day).map(DailyTracingKey::from_bytes)
    }
}

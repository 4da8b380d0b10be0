//! Daily tracing keys and the proximity identifiers derived from them

use std::fmt;

use zeroize::Zeroize;

use super::{
    TimeIntervalNumber,
    derivation::{
        DAILY_KEY_SIZE, INTERVALS_PER_DAY, PROXIMITY_IDENTIFIER_SIZE,
        derive_all_proximity_identifiers, derive_proximity_identifier,
    },
};

/// 16-byte secret for one (person, day) pair.
///
/// Plain immutable value: it carries no cached hash state, so every
/// derivation is a pure function of the key bytes and the interval.
#[derive(Clone, PartialEq, Eq)]
pub struct DailyTracingKey {
    key: [u8; DAILY_KEY_SIZE],
}

impl DailyTracingKey {
    /// Wrap previously derived (or revealed) daily key bytes.
    pub fn from_bytes(key: [u8; DAILY_KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; DAILY_KEY_SIZE] {
        &self.key
    }

    /// Proximity identifier broadcast during `interval`.
    pub fn proximity_identifier(&self, interval: TimeIntervalNumber) -> ProximityIdentifier {
        ProximityIdentifier(derive_proximity_identifier(&self.key, interval))
    }

    /// Proximity identifiers for all 144 intervals, indexed by interval.
    pub fn all_proximity_identifiers(&self) -> [ProximityIdentifier; INTERVALS_PER_DAY] {
        derive_all_proximity_identifiers(&self.key).map(ProximityIdentifier)
    }
}

impl fmt::Debug for DailyTracingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DailyTracingKey(<redacted>)")
    }
}

impl Drop for DailyTracingKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Rolling proximity identifier for one ten-minute interval.
///
/// Public value: this is what gets broadcast, so it is `Copy` and prints as
/// lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProximityIdentifier(pub [u8; PROXIMITY_IDENTIFIER_SIZE]);

impl ProximityIdentifier {
    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; PROXIMITY_IDENTIFIER_SIZE] {
        &self.0
    }
}

impl fmt::Display for ProximityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ProximityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProximityIdentifier({self})")
    }
}

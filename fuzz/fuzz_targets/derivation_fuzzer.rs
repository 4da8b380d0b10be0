//! Fuzz target for daily key and proximity identifier derivation
//!
//! Tests HKDF and HMAC derivation under arbitrary keys, days and intervals.
//!
//! # Strategy
//!
//! - Arbitrary tracing keys (zero, saturated, random)
//! - Boundary day numbers (0, MAX)
//! - Arbitrary interval sequences, including values past the last interval
//!
//! # Invariants
//!
//! - Derivation is deterministic (same inputs → same output)
//! - Neighboring days produce different daily keys
//! - Batch derivation matches single-interval derivation
//! - Person wrapper matches the free functions

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tracekey_crypto::{
    derive_all_proximity_identifiers, derive_daily_key, derive_proximity_identifier,
    DailyTracingKey, Person, INTERVALS_PER_DAY,
};

#[derive(Debug, Clone, Arbitrary)]
struct DerivationScenario {
    /// Tracing key shape
    tracing_key: TracingKeyInput,
    /// Day number to derive
    day: u32,
    /// Intervals to derive individually
    intervals: Vec<u8>,
}

#[derive(Debug, Clone, Arbitrary)]
enum TracingKeyInput {
    Zero,
    Saturated,
    Random([u8; 32]),
}

impl TracingKeyInput {
    fn bytes(&self) -> [u8; 32] {
        match self {
            TracingKeyInput::Zero => [0u8; 32],
            TracingKeyInput::Saturated => [0xFF; 32],
            TracingKeyInput::Random(b) => *b,
        }
    }
}

fuzz_target!(|scenario: DerivationScenario| {
    let tracing_key = scenario.tracing_key.bytes();

    // INVARIANT 1: Derivation never fails for a 32-byte key
    let daily_key = derive_daily_key(&tracing_key, scenario.day)
        .unwrap_or_else(|err| unreachable!("daily key derivation failed: {err}"));

    // INVARIANT 2: Derivation is deterministic
    let again = derive_daily_key(&tracing_key, scenario.day).ok();
    assert_eq!(Some(daily_key), again, "derivation must be deterministic");

    // INVARIANT 3: Neighboring day produces different key
    if let Ok(next) = derive_daily_key(&tracing_key, scenario.day.wrapping_add(1)) {
        assert_ne!(daily_key, next, "different days must produce different keys");
    }

    // INVARIANT 4: Person wrapper matches free function
    let person = Person::from_random_bytes(tracing_key);
    if let Ok(wrapped) = person.daily_tracing_key(scenario.day) {
        assert_eq!(wrapped.as_bytes(), &daily_key, "person must match free function");
    }

    // INVARIANT 5: Batch derivation matches single derivation
    let batch = derive_all_proximity_identifiers(&daily_key);
    assert_eq!(batch.len(), INTERVALS_PER_DAY);

    let wrapped = DailyTracingKey::from_bytes(daily_key);
    for interval in scenario.intervals {
        let single = derive_proximity_identifier(&daily_key, interval);
        assert_eq!(wrapped.proximity_identifier(interval).0, single);

        if usize::from(interval) < INTERVALS_PER_DAY {
            assert_eq!(batch[usize::from(interval)], single, "batch must match single");
        }
    }
});

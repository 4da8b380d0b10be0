//! Property-based tests for the tracing key hierarchy
//!
//! These tests verify the fundamental invariants of key derivation:
//!
//! 1. **Determinism**: Same inputs always produce same outputs
//! 2. **Batch equivalence**: Batch derivation matches per-interval derivation
//! 3. **Isolation**: Different tracing keys, days and intervals produce
//!    different outputs

use proptest::prelude::*;
use tracekey_crypto::{
    DailyTracingKey, INTERVALS_PER_DAY, MAX_INTERVAL, Person, derive_all_proximity_identifiers,
    derive_daily_key, derive_proximity_identifier,
};

fn key_32() -> impl Strategy<Value = [u8; 32]> {
    prop::collection::vec(any::<u8>(), 32..=32).prop_map(|v| {
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&v);
        arr
    })
}

fn key_16() -> impl Strategy<Value = [u8; 16]> {
    prop::collection::vec(any::<u8>(), 16..=16).prop_map(|v| {
        let mut arr = [0u8; 16];
        arr.copy_from_slice(&v);
        arr
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_daily_key_deterministic(tracing_key in key_32(), day in any::<u32>()) {
        let key1 = derive_daily_key(&tracing_key, day).unwrap();
        let key2 = derive_daily_key(&tracing_key, day).unwrap();
        prop_assert_eq!(key1, key2);
    }

    #[test]
    fn prop_person_matches_free_function(tracing_key in key_32(), day in any::<u32>()) {
        let person = Person::from_random_bytes(tracing_key);
        let via_person = person.daily_tracing_key(day).unwrap();
        let direct = derive_daily_key(&tracing_key, day).unwrap();
        prop_assert_eq!(via_person.as_bytes(), &direct);
    }

    #[test]
    fn prop_identifier_deterministic(daily_key in key_16(), interval in 0u8..=MAX_INTERVAL) {
        let id1 = derive_proximity_identifier(&daily_key, interval);
        let id2 = derive_proximity_identifier(&daily_key, interval);
        prop_assert_eq!(id1, id2);
    }

    #[test]
    fn prop_different_days_isolated(tracing_key in key_32(), day1 in any::<u32>(), day2 in any::<u32>()) {
        prop_assume!(day1 != day2);

        let key1 = derive_daily_key(&tracing_key, day1).unwrap();
        let key2 = derive_daily_key(&tracing_key, day2).unwrap();
        prop_assert_ne!(key1, key2);
    }

    #[test]
    fn prop_different_tracing_keys_isolated(a in key_32(), b in key_32(), day in any::<u32>()) {
        prop_assume!(a != b);

        let key_a = derive_daily_key(&a, day).unwrap();
        let key_b = derive_daily_key(&b, day).unwrap();
        prop_assert_ne!(key_a, key_b);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn prop_batch_matches_single(daily_key in key_16()) {
        let batch = derive_all_proximity_identifiers(&daily_key);
        prop_assert_eq!(batch.len(), INTERVALS_PER_DAY);

        for (interval, identifier) in batch.iter().enumerate() {
            prop_assert_eq!(
                *identifier,
                derive_proximity_identifier(&daily_key, interval as u8),
                "interval {} must match",
                interval
            );
        }
    }

    #[test]
    fn prop_intervals_distinct(daily_key in key_16()) {
        let key = DailyTracingKey::from_bytes(daily_key);
        let mut identifiers = key.all_proximity_identifiers().to_vec();
        identifiers.sort_unstable();
        identifiers.dedup();
        prop_assert_eq!(identifiers.len(), INTERVALS_PER_DAY);
    }
}

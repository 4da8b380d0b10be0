//! Fuzz target for chunk partitioning
//!
//! # Invariants
//!
//! - Exactly one range per worker
//! - Ranges are contiguous, in order, and cover `0..len` exactly once
//! - No range is longer than `ceil(len / workers)`

#![no_main]

use std::num::NonZeroUsize;

use libfuzzer_sys::fuzz_target;
use tracekey_core::partition;

fuzz_target!(|input: (u32, u16)| {
    let (len, workers) = input;
    let len = len as usize;
    let Some(workers) = NonZeroUsize::new(usize::from(workers)) else {
        return;
    };

    let ranges = partition(len, workers);
    assert_eq!(ranges.len(), workers.get());

    let chunk_size = len.div_ceil(workers.get());
    let mut next = 0;
    for range in &ranges {
        assert_eq!(range.start, next, "ranges must be contiguous");
        assert!(range.end >= range.start);
        assert!(range.len() <= chunk_size);
        next = range.end;
    }
    assert_eq!(next, len, "ranges must cover every index");
});

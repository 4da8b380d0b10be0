//! Environment abstraction for deterministic testing.
//!
//! Decouples key generation from system resources (time, randomness). Tests
//! use a seeded RNG and a pinned wall clock; production uses the OS RNG and
//! system time.

use std::time::Duration;

use tracekey_crypto::DayNumber;

use crate::{error::RandomnessError, population::day_number_from_unix_secs};

/// Abstract environment providing time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - `random_bytes()` either fills the whole buffer or returns an error
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic). Used to measure run duration.
    fn now(&self) -> Self::Instant;

    /// Seconds since the Unix epoch. Used to pick the current day number.
    fn wall_clock_secs(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Given the same RNG seed, this produces the same sequence of bytes
    /// - Uses cryptographically secure RNG
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), RandomnessError>;

    /// Current day number, `wall_clock_secs() / 86400`.
    fn today(&self) -> DayNumber {
        day_number_from_unix_secs(self.wall_clock_secs())
    }
}

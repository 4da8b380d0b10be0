//! Daily key generation for a simulated population.

use tracekey_crypto::{DailyTracingKey, DayNumber, Person, TRACING_KEY_SIZE};

use crate::{
    env::Environment,
    error::{GenerationError, RandomnessError},
};

/// Length of a day number step in seconds
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Population size and key count used by the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationConfig {
    /// Number of simulated people
    pub people: usize,
    /// Daily keys per person, counting back from today
    pub days_per_person: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self { people: 50_000, days_per_person: 10 }
    }
}

impl PopulationConfig {
    /// Total number of daily keys this population produces, or `None` if
    /// the count does not fit in `usize`.
    pub fn total_keys(&self) -> Option<usize> {
        self.people.checked_mul(self.days_per_person)
    }
}

/// Day number containing `unix_secs` (floor division by 86400).
///
/// Truncates to 32 bits like the day numbers carried in the protocol.
pub fn day_number_from_unix_secs(unix_secs: u64) -> DayNumber {
    (unix_secs / SECONDS_PER_DAY) as DayNumber
}

/// `[today, today - 1, ..., today - (count - 1)]`.
///
/// Subtraction wraps at zero, matching 32-bit day arithmetic.
pub fn day_numbers_descending(today: DayNumber, count: usize) -> Vec<DayNumber> {
    (0..count).map(|offset| today.wrapping_sub(offset as DayNumber)).collect()
}

/// Create a person with a tracing key drawn from the environment's RNG.
pub fn generate_person<E: Environment>(env: &E) -> Result<Person, RandomnessError> {
    let mut tracing_key = [0u8; TRACING_KEY_SIZE];
    env.random_bytes(&mut tracing_key)?;
    Ok(Person::from_random_bytes(tracing_key))
}

/// Generate the daily keys of a whole population.
///
/// Each person gets keys for the `days_per_person` most recent days, newest
/// first. The result is person-major, day-minor: all of person 0's keys, then
/// all of person 1's, and so on.
///
/// Stops at the first failure. No partial population is returned.
pub fn generate_daily_keys<E: Environment>(
    env: &E,
    config: PopulationConfig,
) -> Result<Vec<DailyTracingKey>, GenerationError> {
    let too_large = GenerationError::TooManyKeys {
        people: config.people,
        days_per_person: config.days_per_person,
    };
    let total = config.total_keys().ok_or_else(|| too_large.clone())?;
    let mut daily_keys = Vec::new();
    daily_keys.try_reserve_exact(total).map_err(|_| too_large)?;

    let today = env.today();
    let days = day_numbers_descending(today, config.days_per_person);

    tracing::info!(
        people = config.people,
        days_per_person = config.days_per_person,
        today,
        "generating daily keys"
    );
    for person_index in 0..config.people {
        let person = generate_person(env)
            .map_err(|source| GenerationError::Person { person: person_index, source })?;

        for &day in &days {
            let daily_key = person.daily_tracing_key(day).map_err(|source| {
                GenerationError::DailyKey { person: person_index, day, source }
            })?;
            daily_keys.push(daily_key);
        }
    }

    tracing::debug!(keys = daily_keys.len(), "daily keys generated");

    Ok(daily_keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_number_uses_floor_division() {
        assert_eq!(day_number_from_unix_secs(0), 0);
        assert_eq!(day_number_from_unix_secs(SECONDS_PER_DAY - 1), 0);
        assert_eq!(day_number_from_unix_secs(SECONDS_PER_DAY), 1);
        // 2020-05-01T12:00:00Z
        assert_eq!(day_number_from_unix_secs(1_588_334_400), 18_383);
    }

    #[test]
    fn days_descend_from_today() {
        assert_eq!(day_numbers_descending(100, 3), vec![100, 99, 98]);
    }

    #[test]
    fn zero_days_is_empty() {
        assert!(day_numbers_descending(100, 0).is_empty());
    }

    #[test]
    fn days_wrap_below_epoch() {
        assert_eq!(day_numbers_descending(1, 3), vec![1, 0, u32::MAX]);
    }

    #[test]
    fn total_keys_overflow_is_none() {
        let config = PopulationConfig { people: usize::MAX, days_per_person: 2 };
        assert_eq!(config.total_keys(), None);
    }

    #[test]
    fn default_config_matches_benchmark_population() {
        let config = PopulationConfig::default();
        assert_eq!(config.people, 50_000);
        assert_eq!(config.days_per_person, 10);
        assert_eq!(config.total_keys(), Some(500_000));
    }
}

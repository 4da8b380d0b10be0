//! Parallel proximity identifier derivation.
//!
//! Keys are split into one contiguous chunk per worker. Workers share nothing
//! but the optional [`Progress`] counter, and the caller blocks until every
//! worker has been joined.
//!
//! # Failure Policy
//!
//! All workers always run to completion and are joined. If any of them
//! panicked, the run reports [`RunError::WorkerFailed`] for the lowest
//! failing chunk and discards every result. A failing chunk never touches
//! another chunk's data.
//!
//! Joining a panicked worker needs `panic = "unwind"`. Under `abort` the
//! first failing worker terminates the process instead.

use std::{any::Any, hint::black_box, num::NonZeroUsize, ops::Range, thread, time::Duration};

use tracekey_crypto::{DailyTracingKey, INTERVALS_PER_DAY, ProximityIdentifier};

use crate::{env::Environment, error::RunError, progress::Progress};

/// Which identifiers each worker derives per daily key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierMode {
    /// All 144 intervals through the batch derivation
    #[default]
    AllIntervals,
    /// Intervals `0..n`, one call each. Lighter load for smoke runs.
    Sample(u8),
}

impl IdentifierMode {
    /// Identifiers derived for each daily key.
    pub fn identifiers_per_key(self) -> usize {
        match self {
            Self::AllIntervals => INTERVALS_PER_DAY,
            Self::Sample(count) => usize::from(count).min(INTERVALS_PER_DAY),
        }
    }
}

/// Runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunnerConfig {
    /// Worker count. `None` uses the available parallelism.
    pub workers: Option<NonZeroUsize>,
    /// Identifiers to derive per key
    pub mode: IdentifierMode,
}

/// Outcome of a measured run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Daily keys processed
    pub keys_processed: usize,
    /// Proximity identifiers derived across all keys
    pub identifiers_derived: u64,
    /// Chunks the keys were split into (one per worker)
    pub chunks: usize,
    /// Wall-clock time from first spawn to last join
    pub elapsed: Duration,
}

/// Identifiers derived by one worker, tagged so the caller can restore order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutput {
    /// Position of the chunk in the partition
    pub chunk: usize,
    /// Indices of the input keys this chunk covered
    pub range: Range<usize>,
    /// Identifiers per key, in input order within the chunk
    pub identifiers: Vec<Vec<ProximityIdentifier>>,
}

/// Split `len` items into `workers` contiguous ranges.
///
/// Chunk `i` covers `[i * size, min((i + 1) * size, len))` where
/// `size = ceil(len / workers)`. Always returns exactly `workers` ranges;
/// trailing ones are empty when `len` does not fill them.
pub fn partition(len: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let chunk_size = len.div_ceil(workers.get());
    (0..workers.get())
        .map(|index| {
            let start = (index * chunk_size).min(len);
            let end = ((index + 1) * chunk_size).min(len);
            start..end
        })
        .collect()
}

/// Drives identifier derivation over all cores.
#[derive(Debug, Clone)]
pub struct ParallelRunner {
    workers: NonZeroUsize,
    mode: IdentifierMode,
}

impl ParallelRunner {
    /// Create a runner. Without a worker override, uses one worker per
    /// available execution unit.
    pub fn new(config: RunnerConfig) -> Self {
        let workers = config.workers.unwrap_or_else(|| {
            thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
        });
        Self { workers, mode: config.mode }
    }

    /// Number of workers (and chunks) per run.
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Identifier mode.
    pub fn mode(&self) -> IdentifierMode {
        self.mode
    }

    /// Derive identifiers for every key and discard them, measuring the run.
    ///
    /// `progress`, if given, is bumped once per finished key.
    pub fn run<E: Environment>(
        &self,
        env: &E,
        keys: &[DailyTracingKey],
        progress: Option<&Progress>,
    ) -> Result<RunReport, RunError> {
        tracing::info!(keys = keys.len(), workers = self.workers.get(), mode = ?self.mode, "starting run");

        let mode = self.mode;
        let started = env.now();
        let counts = self.execute(keys, |chunk_index, chunk| {
            let mut derived = 0u64;
            for key in chunk {
                derived += derive_discarding(mode, key);
                if let Some(progress) = progress {
                    progress.record();
                }
            }
            tracing::debug!(chunk = chunk_index, keys = chunk.len(), "chunk finished");
            derived
        })?;
        let elapsed = env.now() - started;

        let report = RunReport {
            keys_processed: keys.len(),
            identifiers_derived: counts.iter().sum(),
            chunks: counts.len(),
            elapsed,
        };

        tracing::info!(
            identifiers = report.identifiers_derived,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "run finished"
        );

        Ok(report)
    }

    /// Derive identifiers for every key and return them per chunk.
    ///
    /// Outputs are sorted by chunk index, so concatenating their
    /// `identifiers` restores the input order.
    pub fn run_collect(
        &self,
        keys: &[DailyTracingKey],
        progress: Option<&Progress>,
    ) -> Result<Vec<ChunkOutput>, RunError> {
        let mode = self.mode;
        let ranges = partition(keys.len(), self.workers);

        let identifiers = self.execute(keys, |_, chunk| {
            chunk
                .iter()
                .map(|key| {
                    let derived = derive_collecting(mode, key);
                    if let Some(progress) = progress {
                        progress.record();
                    }
                    derived
                })
                .collect::<Vec<_>>()
        })?;

        Ok(ranges
            .into_iter()
            .zip(identifiers)
            .enumerate()
            .map(|(chunk, (range, identifiers))| ChunkOutput { chunk, range, identifiers })
            .collect())
    }

    /// Run `work` on every chunk in its own scoped thread and join them all.
    ///
    /// Results come back in chunk order regardless of completion order.
    fn execute<T, F>(&self, keys: &[DailyTracingKey], work: F) -> Result<Vec<T>, RunError>
    where
        T: Send,
        F: Fn(usize, &[DailyTracingKey]) -> T + Sync,
    {
        let ranges = partition(keys.len(), self.workers);
        let work = &work;

        thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .enumerate()
                .map(|(index, range)| {
                    let chunk = &keys[range];
                    (index, scope.spawn(move || work(index, chunk)))
                })
                .collect();

            let mut results = Vec::with_capacity(handles.len());
            let mut failure: Option<RunError> = None;
            for (index, handle) in handles {
                match handle.join() {
                    Ok(output) => results.push(output),
                    Err(payload) => record_failure(&mut failure, index, payload.as_ref()),
                }
            }

            match failure {
                Some(err) => Err(err),
                None => Ok(results),
            }
        })
    }
}

fn record_failure(failure: &mut Option<RunError>, chunk: usize, payload: &(dyn Any + Send)) {
    tracing::warn!(chunk, "worker failed");
    if failure.is_none() {
        *failure = Some(RunError::WorkerFailed { chunk, reason: panic_reason(payload) });
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

fn derive_discarding(mode: IdentifierMode, key: &DailyTracingKey) -> u64 {
    match mode {
        IdentifierMode::AllIntervals => {
            let _ = black_box(key.all_proximity_identifiers());
        },
        IdentifierMode::Sample(_) => {
            for interval in 0..mode.identifiers_per_key() {
                let _ = black_box(key.proximity_identifier(interval as u8));
            }
        },
    }
    mode.identifiers_per_key() as u64
}

fn derive_collecting(mode: IdentifierMode, key: &DailyTracingKey) -> Vec<ProximityIdentifier> {
    match mode {
        IdentifierMode::AllIntervals => key.all_proximity_identifiers().to_vec(),
        IdentifierMode::Sample(_) => (0..mode.identifiers_per_key())
            .map(|interval| key.proximity_identifier(interval as u8))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::error::RandomnessError;

    #[derive(Clone)]
    struct FixedEnv;

    impl Environment for FixedEnv {
        type Instant = Instant;

        fn now(&self) -> Self::Instant {
            Instant::now()
        }

        fn wall_clock_secs(&self) -> u64 {
            0
        }

        fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), RandomnessError> {
            buffer.fill(0);
            Ok(())
        }
    }

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn keys(count: usize) -> Vec<DailyTracingKey> {
        (0..count).map(|i| DailyTracingKey::from_bytes([i as u8; 16])).collect()
    }

    fn runner(n: usize, mode: IdentifierMode) -> ParallelRunner {
        ParallelRunner::new(RunnerConfig { workers: Some(workers(n)), mode })
    }

    #[test]
    fn partition_even_split() {
        assert_eq!(partition(8, workers(4)), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn partition_last_chunk_shorter() {
        assert_eq!(partition(10, workers(4)), vec![0..3, 3..6, 6..9, 9..10]);
    }

    #[test]
    fn partition_trailing_chunks_empty() {
        // size = ceil(5 / 4) = 2, so the fourth chunk starts past the end
        assert_eq!(partition(5, workers(4)), vec![0..2, 2..4, 4..5, 5..5]);
    }

    #[test]
    fn partition_more_workers_than_items() {
        assert_eq!(partition(2, workers(4)), vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    fn partition_empty_input() {
        assert_eq!(partition(0, workers(3)), vec![0..0, 0..0, 0..0]);
    }

    #[test]
    fn sample_mode_is_capped_at_one_day() {
        assert_eq!(IdentifierMode::Sample(143).identifiers_per_key(), 143);
        assert_eq!(IdentifierMode::Sample(u8::MAX).identifiers_per_key(), INTERVALS_PER_DAY);
        assert_eq!(IdentifierMode::AllIntervals.identifiers_per_key(), INTERVALS_PER_DAY);
    }

    #[test]
    fn run_counts_every_key() {
        let keys = keys(10);
        let progress = Progress::new();

        let report = runner(3, IdentifierMode::AllIntervals)
            .run(&FixedEnv, &keys, Some(&progress))
            .unwrap();

        assert_eq!(report.keys_processed, 10);
        assert_eq!(report.identifiers_derived, 10 * 144);
        assert_eq!(report.chunks, 3);
        assert_eq!(progress.completed(), 10);
    }

    #[test]
    fn run_in_sample_mode() {
        let keys = keys(4);
        let report = runner(2, IdentifierMode::Sample(143)).run(&FixedEnv, &keys, None).unwrap();
        assert_eq!(report.identifiers_derived, 4 * 143);
    }

    #[test]
    fn run_with_no_keys() {
        let progress = Progress::new();
        let report = runner(4, IdentifierMode::AllIntervals)
            .run(&FixedEnv, &[], Some(&progress))
            .unwrap();

        assert_eq!(report.keys_processed, 0);
        assert_eq!(report.identifiers_derived, 0);
        assert_eq!(progress.completed(), 0);
    }

    #[test]
    fn collect_preserves_chunk_order() {
        let keys = keys(7);
        let outputs = runner(3, IdentifierMode::AllIntervals).run_collect(&keys, None).unwrap();

        assert_eq!(outputs.len(), 3);
        for (index, output) in outputs.iter().enumerate() {
            assert_eq!(output.chunk, index);
            assert_eq!(output.identifiers.len(), output.range.len());
        }

        let flattened: Vec<_> = outputs.into_iter().flat_map(|o| o.identifiers).collect();
        for (key, identifiers) in keys.iter().zip(&flattened) {
            assert_eq!(identifiers.as_slice(), key.all_proximity_identifiers().as_slice());
        }
    }

    #[test]
    fn worker_failure_names_lowest_chunk() {
        let keys = keys(6);
        let runner = runner(3, IdentifierMode::AllIntervals);

        let result = runner.execute(&keys, |index, chunk| {
            assert!(index == 0, "chunk {index} refused");
            chunk.len()
        });

        match result {
            Err(RunError::WorkerFailed { chunk, reason }) => {
                assert_eq!(chunk, 1);
                assert_eq!(reason, "chunk 1 refused");
            },
            _ => unreachable!("expected WorkerFailed"),
        }
    }

    #[test]
    fn worker_failure_does_not_stop_other_chunks() {
        let keys = keys(6);
        let progress = Progress::new();
        let runner = runner(3, IdentifierMode::AllIntervals);

        let result = runner.execute(&keys, |index, chunk| {
            assert!(index != 1, "chunk {index} refused");
            for _ in chunk {
                progress.record();
            }
        });

        assert!(result.is_err());
        assert_eq!(progress.completed(), 4, "chunks 0 and 2 must still finish");
    }
}

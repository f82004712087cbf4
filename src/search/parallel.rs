//! Parallel trial evaluation on a worker pool.

use core::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use rayon::iter::{ParallelBridge, ParallelIterator};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::evaluate::EvalStrategy;
use crate::generator::CandidateGenerator;
use crate::model::ModelBuilder;
use crate::search::{Search, SearchSummary};
use crate::tracker::{TrialRecord, TrialTracker};
use crate::types::SearchStatus;

impl Search {
    /// Runs the search with trial evaluation spread over `workers` threads.
    ///
    /// Configurations are still pulled from a single sequential stream (the
    /// generator sits behind a mutex), so the configuration *set* matches a
    /// sequential run with the same seed. Trial indices denote generation
    /// order (assigned when a configuration is pulled, before its
    /// evaluation is scheduled), so history order may differ from index
    /// order. The tracker is the only shared-mutation point; each worker
    /// builds its own model instance.
    ///
    /// Cancellation takes effect at the next pull; in-flight evaluations
    /// drain. The first structurally-failing trial stops the stream and its
    /// error is returned once in-flight trials finish, with all completed
    /// history intact in `tracker`.
    ///
    /// # Errors
    ///
    /// Same error surface as [`run`](Self::run), plus
    /// [`Error::TaskError`] if the worker pool cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is zero.
    pub fn run_parallel<X, Y, B, S, G>(
        &self,
        generator: G,
        builder: &B,
        data: &Dataset<X, Y>,
        strategy: &S,
        tracker: &TrialTracker<B::Model>,
        workers: usize,
    ) -> Result<SearchSummary<B::Model>>
    where
        X: Sync,
        Y: Sync,
        B: ModelBuilder<X, Y> + Sync,
        B::Model: Send + Sync,
        S: EvalStrategy<X, Y> + Sync,
        G: CandidateGenerator + Send,
    {
        assert!(workers > 0, "workers must be at least 1");

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "search_parallel",
            workers,
            metric = self.objective().metric(),
            direction = ?self.objective().direction()
        )
        .entered();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::TaskError(e.to_string()))?;

        let generator = Mutex::new(generator);
        let abort: Mutex<Option<Error>> = Mutex::new(None);
        let next_index = AtomicU64::new(tracker.len() as u64);
        let trials = AtomicUsize::new(0);
        let exhausted = AtomicBool::new(false);
        let cancel = self.cancel_ref();

        pool.install(|| {
            let source = core::iter::from_fn(|| {
                if cancel.is_cancelled() || abort.lock().is_some() {
                    return None;
                }
                let candidate = generator.lock().next_candidate();
                match candidate {
                    Some(config) => {
                        Some((next_index.fetch_add(1, Ordering::SeqCst), config))
                    }
                    None => {
                        exhausted.store(true, Ordering::SeqCst);
                        None
                    }
                }
            });

            source.par_bridge().for_each(|(index, config)| {
                let started = Instant::now();
                match strategy.evaluate(builder, &config, data, self.objective()) {
                    Ok(mut result) => {
                        if !self.keep_artifacts() {
                            result.model = None;
                        }
                        trace_info!(trial = index, value = result.objective, "trial completed");
                        tracker.record(TrialRecord {
                            index,
                            config,
                            result,
                            duration: started.elapsed(),
                        });
                        trials.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(error) => {
                        trace_debug!(trial = index, "trial aborted the search");
                        let mut slot = abort.lock();
                        if slot.is_none() {
                            *slot = Some(error);
                        }
                    }
                }
            });
        });

        if let Some(error) = abort.into_inner() {
            return Err(error);
        }

        let status = if exhausted.load(Ordering::SeqCst) {
            SearchStatus::Completed
        } else {
            SearchStatus::Aborted
        };
        self.finish(
            status,
            trials.load(Ordering::SeqCst),
            builder,
            data,
            tracker,
        )
    }
}

//! The search orchestrator: drive the generate/evaluate/record loop to
//! completion and return the best trial.

#[cfg(feature = "parallel")]
mod parallel;

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::evaluate::EvalStrategy;
use crate::generator::CandidateGenerator;
use crate::model::{Model, ModelBuilder};
use crate::objective::Objective;
use crate::tracker::{TrialRecord, TrialTracker};
use crate::types::SearchStatus;

/// A cloneable handle for cancelling an in-flight search between trials.
///
/// Cancellation is cooperative: the orchestrator checks the token before
/// requesting the next configuration, so an in-flight fit is never
/// preempted. History recorded up to the cancellation point stays valid.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation at the next trial boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// The outcome of a finished search run.
pub struct SearchSummary<M> {
    /// How the run ended.
    pub status: SearchStatus,
    /// The best trial, if any trial was recorded.
    pub best: Option<TrialRecord<M>>,
    /// The number of trials evaluated by this run.
    pub trials: usize,
    /// A model refit on the full training data with the best
    /// configuration, when requested and the run completed.
    pub refit: Option<M>,
}

impl<M> core::fmt::Debug for SearchSummary<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SearchSummary")
            .field("status", &self.status)
            .field("best", &self.best)
            .field("trials", &self.trials)
            .field("has_refit", &self.refit.is_some())
            .finish()
    }
}

/// Orchestrates one hyperparameter search.
///
/// The search owns the objective and the run policies; the caller supplies
/// the moving parts per run: generator, model builder, training data,
/// evaluation strategy, and the tracker that receives the history. Because
/// the tracker is caller-owned, partial history survives an aborting
/// error.
///
/// # Examples
///
/// ```no_run
/// use tuner::prelude::*;
/// # fn builder(_: &Configuration) -> Result<DummyModel, TrainError> { unimplemented!() }
/// # struct DummyModel;
/// # impl Model<f64, f64> for DummyModel {
/// #     fn fit(&mut self, _: &[f64], _: &[f64]) -> Result<(), TrainError> { Ok(()) }
/// #     fn predict(&self, i: &[f64]) -> Vec<f64> { vec![0.0; i.len()] }
/// #     fn score(&self, _: &[f64], _: &[f64]) -> Result<f64, TrainError> { Ok(0.0) }
/// # }
/// # fn demo(data: Dataset<f64, f64>) -> tuner::Result<()> {
/// let mut space = SearchSpace::new();
/// space.declare(ParamSpec::int("depth", 1, 8))?;
///
/// let search = Search::builder(Objective::maximize("val_accuracy")).build();
/// let tracker = TrialTracker::new(search.objective().direction());
/// let mut generator = RandomGenerator::new(space, 42, 25);
/// let strategy = KFold::new(5, 0);
///
/// let summary = search.run(&mut generator, &builder, &data, &strategy, &tracker)?;
/// println!("best: {:?}", summary.best.map(|b| b.result.objective));
/// # Ok(())
/// # }
/// ```
pub struct Search {
    objective: Objective,
    keep_artifacts: bool,
    refit_best: bool,
    cancel: CancelToken,
}

impl Search {
    /// Creates a search with default policies (no artifact retention, no
    /// refit).
    #[must_use]
    pub fn new(objective: Objective) -> Self {
        Self::builder(objective).build()
    }

    /// Returns a [`SearchBuilder`] for configuring run policies.
    #[must_use]
    pub fn builder(objective: Objective) -> SearchBuilder {
        SearchBuilder::new(objective)
    }

    /// Returns the search objective.
    #[must_use]
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Returns a handle for cancelling this search between trials.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Runs the search loop to completion or cancellation.
    ///
    /// Pulls configurations from `generator` one at a time, evaluates each
    /// with `strategy`, and records a [`TrialRecord`] in `tracker`. Trial
    /// indices continue from the tracker's current length, so a tracker
    /// may be reused across runs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) (or a
    /// data error) when a trial evaluation fails structurally; history up
    /// to that trial remains in `tracker`. Returns
    /// [`Error::Refit`](crate::Error::Refit) when the final refit fails.
    /// Numeric per-trial failures do not abort: they are recorded as
    /// sentinel-scored trials.
    pub fn run<X, Y, B, S, G>(
        &self,
        generator: &mut G,
        builder: &B,
        data: &Dataset<X, Y>,
        strategy: &S,
        tracker: &TrialTracker<B::Model>,
    ) -> Result<SearchSummary<B::Model>>
    where
        B: ModelBuilder<X, Y>,
        S: EvalStrategy<X, Y>,
        G: CandidateGenerator,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "search",
            metric = self.objective.metric(),
            direction = ?self.objective.direction()
        )
        .entered();

        let mut next_index = tracker.len() as u64;
        let mut trials = 0usize;

        let status = loop {
            if self.cancel.is_cancelled() {
                trace_info!("search cancelled");
                break SearchStatus::Aborted;
            }
            let Some(config) = generator.next_candidate() else {
                break SearchStatus::Completed;
            };

            let started = Instant::now();
            let mut result = strategy.evaluate(builder, &config, data, &self.objective)?;
            if !self.keep_artifacts {
                result.model = None;
            }

            if let Some(_reason) = &result.failure {
                trace_debug!(
                    trial = next_index,
                    reason = %_reason,
                    "trial failed, sentinel recorded"
                );
            } else {
                trace_info!(
                    trial = next_index,
                    value = result.objective,
                    "trial completed"
                );
            }

            tracker.record(TrialRecord {
                index: next_index,
                config,
                result,
                duration: started.elapsed(),
            });
            next_index += 1;
            trials += 1;
        };

        self.finish(status, trials, builder, data, tracker)
    }

    /// Builds the summary and performs the optional refit.
    pub(crate) fn finish<X, Y, B>(
        &self,
        status: SearchStatus,
        trials: usize,
        builder: &B,
        data: &Dataset<X, Y>,
        tracker: &TrialTracker<B::Model>,
    ) -> Result<SearchSummary<B::Model>>
    where
        B: ModelBuilder<X, Y>,
    {
        let best = tracker.best().ok();
        let refit = if self.refit_best && status == SearchStatus::Completed {
            match &best {
                Some(best) => Some(self.refit(builder, best, data)?),
                None => None,
            }
        } else {
            None
        };
        Ok(SearchSummary {
            status,
            best,
            trials,
            refit,
        })
    }

    /// Final non-validated fit of the best configuration on the full
    /// training data.
    fn refit<X, Y, B>(
        &self,
        builder: &B,
        best: &TrialRecord<B::Model>,
        data: &Dataset<X, Y>,
    ) -> Result<B::Model>
    where
        B: ModelBuilder<X, Y>,
    {
        trace_info!(trial = best.index, "refitting best configuration");
        let mut model = builder
            .build(&best.config)
            .map_err(|e| crate::Error::Refit(e.to_string()))?;
        model
            .fit(data.inputs(), data.targets())
            .map_err(|e| crate::Error::Refit(e.to_string()))?;
        Ok(model)
    }

    pub(crate) fn keep_artifacts(&self) -> bool {
        self.keep_artifacts
    }

    pub(crate) fn cancel_ref(&self) -> &CancelToken {
        &self.cancel
    }
}

/// A builder for constructing [`Search`] instances with a fluent API.
///
/// # Defaults
///
/// - Artifact retention: off (trained models are dropped after scoring)
/// - Refit of the best configuration: off
/// - Cancel token: a fresh, uncancelled token
pub struct SearchBuilder {
    objective: Objective,
    keep_artifacts: bool,
    refit_best: bool,
    cancel: Option<CancelToken>,
}

impl SearchBuilder {
    fn new(objective: Objective) -> Self {
        Self {
            objective,
            keep_artifacts: false,
            refit_best: false,
            cancel: None,
        }
    }

    /// Keeps each trial's trained artifact in its record (memory
    /// permitting). Off by default.
    #[must_use]
    pub fn keep_artifacts(mut self, keep: bool) -> Self {
        self.keep_artifacts = keep;
        self
    }

    /// Retrains a model on the full training data with the best
    /// configuration once the search completes. Off by default.
    #[must_use]
    pub fn refit_best(mut self, refit: bool) -> Self {
        self.refit_best = refit;
        self
    }

    /// Uses an externally-owned cancel token instead of a fresh one.
    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the configured [`Search`].
    #[must_use]
    pub fn build(self) -> Search {
        Search {
            objective: self.objective,
            keep_artifacts: self.keep_artifacts,
            refit_best: self.refit_best,
            cancel: self.cancel.unwrap_or_default(),
        }
    }
}

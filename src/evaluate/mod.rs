//! Evaluation strategies: train and score one candidate configuration.
//!
//! An [`EvalStrategy`] turns a configuration into an [`EvaluationResult`]
//! by building a fresh model, fitting it, and scoring it. Two strategies
//! are provided: a single held-out validation split ([`Holdout`]) and
//! k-fold cross-validation with mean aggregation ([`KFold`]).
//!
//! Failure policy: a [`TrainError::Numeric`] from build, fit, or score is
//! absorbed: the strategy returns a result carrying the objective's
//! sentinel score and the failure message, so one bad trial cannot abort
//! an otherwise-successful search. A [`TrainError::Configuration`]
//! propagates as [`Error::Configuration`](crate::Error::Configuration) and
//! aborts the search.

pub mod holdout;
pub mod kfold;

pub use holdout::Holdout;
pub use kfold::KFold;

use core::ops::ControlFlow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Configuration;
use crate::dataset::Dataset;
use crate::error::{Error, Result, TrainError};
use crate::model::ModelBuilder;
use crate::objective::Objective;
use crate::types::Direction;

/// The outcome of evaluating one candidate configuration.
pub struct EvaluationResult<M> {
    /// The scalar objective value (a sentinel if the trial failed).
    pub objective: f64,
    /// The objective's metric name.
    pub metric: String,
    /// The objective's direction.
    pub direction: Direction,
    /// Auxiliary metrics reported by the strategy (e.g. per-fold scores).
    pub metrics: HashMap<String, f64>,
    /// The trained artifact, when the strategy retains one.
    pub model: Option<Arc<M>>,
    /// The failure message when the sentinel score was substituted.
    pub failure: Option<String>,
}

impl<M> EvaluationResult<M> {
    /// A successfully scored result.
    pub(crate) fn scored(objective: &Objective, value: f64) -> Self {
        Self {
            objective: value,
            metric: objective.metric().to_string(),
            direction: objective.direction(),
            metrics: HashMap::new(),
            model: None,
            failure: None,
        }
    }

    /// A failed trial, carrying the sentinel score.
    pub(crate) fn failed(objective: &Objective, reason: String) -> Self {
        Self {
            objective: objective.sentinel(),
            metric: objective.metric().to_string(),
            direction: objective.direction(),
            metrics: HashMap::new(),
            model: None,
            failure: Some(reason),
        }
    }

    /// Returns `true` if the sentinel score was substituted for a failed
    /// training run.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

impl<M> Clone for EvaluationResult<M> {
    fn clone(&self) -> Self {
        Self {
            objective: self.objective,
            metric: self.metric.clone(),
            direction: self.direction,
            metrics: self.metrics.clone(),
            model: self.model.clone(),
            failure: self.failure.clone(),
        }
    }
}

impl<M> core::fmt::Debug for EvaluationResult<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EvaluationResult")
            .field("objective", &self.objective)
            .field("metric", &self.metric)
            .field("direction", &self.direction)
            .field("metrics", &self.metrics)
            .field("has_model", &self.model.is_some())
            .field("failure", &self.failure)
            .finish()
    }
}

/// Trains and scores exactly one candidate configuration.
///
/// Strategies never mutate the training data; every call builds a fresh
/// model through the builder.
pub trait EvalStrategy<X, Y> {
    /// Evaluates `config` against `train`, returning the scored result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) when
    /// the configuration violates a model-builder precondition, or a data
    /// error such as
    /// [`Error::InsufficientData`](crate::Error::InsufficientData). Numeric
    /// training failures are not errors: they come back as `Ok` results
    /// carrying the sentinel score.
    fn evaluate<B: ModelBuilder<X, Y>>(
        &self,
        builder: &B,
        config: &Configuration,
        train: &Dataset<X, Y>,
        objective: &Objective,
    ) -> Result<EvaluationResult<B::Model>>;
}

/// Applies the failure policy to one build/fit/score step.
///
/// `Continue` carries the step's value; `Break` carries the ready-made
/// sentinel result for an absorbed numeric failure.
pub(crate) fn check_step<T, M>(
    step: core::result::Result<T, TrainError>,
    objective: &Objective,
) -> Result<ControlFlow<EvaluationResult<M>, T>> {
    match step {
        Ok(value) => Ok(ControlFlow::Continue(value)),
        Err(TrainError::Numeric(reason)) => {
            Ok(ControlFlow::Break(EvaluationResult::failed(objective, reason)))
        }
        Err(TrainError::Configuration(reason)) => Err(Error::Configuration(reason)),
    }
}

//! Holdout evaluation: one fit, scored on a fixed validation split.

use core::ops::ControlFlow;
use std::sync::Arc;

use crate::config::Configuration;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::evaluate::{EvalStrategy, EvaluationResult, check_step};
use crate::model::{Model, ModelBuilder};
use crate::objective::Objective;

/// Scores each candidate by training once on the full training data and
/// scoring on a caller-supplied validation split.
///
/// The trained model is attached to the result as the trial's artifact
/// (the orchestrator strips it unless artifact retention is enabled).
pub struct Holdout<X, Y> {
    validation: Dataset<X, Y>,
}

impl<X, Y> Holdout<X, Y> {
    /// Creates a holdout strategy over the given validation split.
    #[must_use]
    pub fn new(validation: Dataset<X, Y>) -> Self {
        Self { validation }
    }

    /// Returns the validation split.
    #[must_use]
    pub fn validation(&self) -> &Dataset<X, Y> {
        &self.validation
    }
}

impl<X, Y> EvalStrategy<X, Y> for Holdout<X, Y> {
    fn evaluate<B: ModelBuilder<X, Y>>(
        &self,
        builder: &B,
        config: &Configuration,
        train: &Dataset<X, Y>,
        objective: &Objective,
    ) -> Result<EvaluationResult<B::Model>> {
        let mut model = match check_step(builder.build(config), objective)? {
            ControlFlow::Continue(model) => model,
            ControlFlow::Break(failed) => return Ok(failed),
        };
        match check_step(model.fit(train.inputs(), train.targets()), objective)? {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(failed) => return Ok(failed),
        }
        let score = match check_step(
            model.score(self.validation.inputs(), self.validation.targets()),
            objective,
        )? {
            ControlFlow::Continue(score) => score,
            ControlFlow::Break(failed) => return Ok(failed),
        };

        let mut result = EvaluationResult::scored(objective, score);
        result.model = Some(Arc::new(model));
        Ok(result)
    }
}

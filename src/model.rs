//! The model-building capability consumed by evaluation strategies.
//!
//! The engine never inspects a model's internals: it builds one fresh
//! model per trial via [`ModelBuilder`], fits it, and asks it for a scalar
//! score. Anything exposing that narrow surface can be tuned: a neural
//! network, a decision tree, or a closure around an external process.
//!
//! For simple cases a closure works directly thanks to the blanket impl:
//!
//! ```
//! use tuner::{Configuration, Model, TrainError};
//!
//! struct ConstModel {
//!     value: f64,
//! }
//!
//! impl Model<f64, f64> for ConstModel {
//!     fn fit(&mut self, _inputs: &[f64], _targets: &[f64]) -> Result<(), TrainError> {
//!         Ok(())
//!     }
//!
//!     fn predict(&self, inputs: &[f64]) -> Vec<f64> {
//!         inputs.iter().map(|_| self.value).collect()
//!     }
//!
//!     fn score(&self, _inputs: &[f64], targets: &[f64]) -> Result<f64, TrainError> {
//!         let mse = targets
//!             .iter()
//!             .map(|t| (t - self.value).powi(2))
//!             .sum::<f64>()
//!             / targets.len() as f64;
//!         Ok(-mse)
//!     }
//! }
//!
//! // A `Fn(&Configuration) -> Result<M, TrainError>` is a ModelBuilder.
//! let builder = |config: &Configuration| -> Result<ConstModel, TrainError> {
//!     Ok(ConstModel {
//!         value: config.get_float("value")?,
//!     })
//! };
//! # let _ = &builder;
//! ```

use crate::config::Configuration;
use crate::error::TrainError;

/// A trainable model: fit on rows, predict rows, score itself under the
/// caller's objective metric.
pub trait Model<X, Y> {
    /// Trains the model on row-aligned inputs and targets.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Numeric`] on a numerical training failure
    /// (recorded as a sentinel-scored trial) or
    /// [`TrainError::Configuration`] on a structural precondition violation
    /// (aborts the search).
    fn fit(&mut self, inputs: &[X], targets: &[Y]) -> Result<(), TrainError>;

    /// Predicts targets for the given inputs.
    fn predict(&self, inputs: &[X]) -> Vec<Y>;

    /// Scores the fitted model on the given rows under the objective
    /// metric the builder was set up for.
    ///
    /// # Errors
    ///
    /// Same failure classes as [`fit`](Self::fit).
    fn score(&self, inputs: &[X], targets: &[Y]) -> Result<f64, TrainError>;
}

/// Builds a fresh model for a candidate configuration.
///
/// Every trial gets its own model instance, so trials stay independent and
/// may run on worker threads without shared mutable state.
///
/// Blanket-implemented for `Fn(&Configuration) -> Result<M, TrainError>`
/// closures.
pub trait ModelBuilder<X, Y> {
    /// The model type this builder produces.
    type Model: Model<X, Y>;

    /// Builds an untrained model for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Configuration`] if `config` violates a builder
    /// precondition, or [`TrainError::Numeric`] if construction itself
    /// fails numerically.
    fn build(&self, config: &Configuration) -> Result<Self::Model, TrainError>;
}

impl<X, Y, M, F> ModelBuilder<X, Y> for F
where
    M: Model<X, Y>,
    F: Fn(&Configuration) -> Result<M, TrainError>,
{
    type Model = M;

    fn build(&self, config: &Configuration) -> Result<M, TrainError> {
        self(config)
    }
}

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Hyperparameter search and model selection engine: declare a search
//! space, generate candidate configurations by grid or random search,
//! score each candidate by holdout or k-fold cross-validation, and keep
//! the best one under a named objective.
//!
//! # Getting Started
//!
//! Tune a toy model's single knob with ten random trials:
//!
//! ```
//! use tuner::prelude::*;
//!
//! // A model whose quality depends on a "shrink" hyperparameter: it
//! // predicts shrink * mean(train targets).
//! struct Shrunk {
//!     shrink: f64,
//!     mean: f64,
//! }
//!
//! impl Model<f64, f64> for Shrunk {
//!     fn fit(&mut self, _inputs: &[f64], targets: &[f64]) -> Result<(), TrainError> {
//!         self.mean = targets.iter().sum::<f64>() / targets.len() as f64;
//!         Ok(())
//!     }
//!
//!     fn predict(&self, inputs: &[f64]) -> Vec<f64> {
//!         inputs.iter().map(|_| self.shrink * self.mean).collect()
//!     }
//!
//!     fn score(&self, inputs: &[f64], targets: &[f64]) -> Result<f64, TrainError> {
//!         let predictions = self.predict(inputs);
//!         let mse = predictions
//!             .iter()
//!             .zip(targets)
//!             .map(|(p, t)| (p - t).powi(2))
//!             .sum::<f64>()
//!             / targets.len() as f64;
//!         Ok(-mse)
//!     }
//! }
//!
//! fn main() -> tuner::Result<()> {
//!     let mut space = SearchSpace::new();
//!     space.declare(ParamSpec::float("shrink", 0.1, 2.0))?;
//!
//!     let train = Dataset::new(vec![0.0; 32], vec![1.0; 32])?;
//!     let validation = Dataset::new(vec![0.0; 8], vec![1.0; 8])?;
//!
//!     let builder = |config: &Configuration| -> Result<Shrunk, TrainError> {
//!         Ok(Shrunk {
//!             shrink: config.get_float("shrink")?,
//!             mean: 0.0,
//!         })
//!     };
//!
//!     let search = Search::new(Objective::maximize("neg_mse"));
//!     let tracker = TrialTracker::new(search.objective().direction());
//!     let mut generator = RandomGenerator::new(space, 42, 10);
//!     let strategy = Holdout::new(validation);
//!
//!     let summary = search.run(&mut generator, &builder, &train, &strategy, &tracker)?;
//!     let best = summary.best.expect("ten trials ran");
//!     assert_eq!(tracker.len(), 10);
//!     println!("best shrink: {}", best.config.get_float("shrink").unwrap());
//!     Ok(())
//! }
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`SearchSpace`] | Declare hyperparameters and their domains ([`ParamSpec`](space::ParamSpec)). |
//! | [`CandidateGenerator`](generator::CandidateGenerator) | Produce configurations: [`RandomGenerator`](generator::RandomGenerator) (seeded, budgeted) or [`GridGenerator`](generator::GridGenerator) (exhaustive). |
//! | [`EvalStrategy`](evaluate::EvalStrategy) | Train and score one candidate: [`Holdout`](evaluate::Holdout) or [`KFold`](evaluate::KFold). |
//! | [`Model`] / [`ModelBuilder`] | The opaque trainable capability being tuned. |
//! | [`TrialTracker`] | Append-only history with best-so-far under a [`Direction`]. |
//! | [`Search`] | Drive the loop; return the best trial and optionally a refit model. |
//!
//! # Failure Policy
//!
//! A trial whose training fails numerically ([`TrainError::Numeric`]) is
//! recorded with the worst-possible sentinel score and the search
//! continues. A configuration that violates a model-builder precondition
//! ([`TrainError::Configuration`]) aborts the whole search, because every
//! subsequent trial would be broken the same way. Partial history is
//! preserved either way.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `parallel` | [`Search::run_parallel`]: trial evaluation on a rayon worker pool | off |
//! | `serde` | `Serialize`/`Deserialize` on the declarative types | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at trial boundaries | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod config;
mod dataset;
mod error;
pub mod evaluate;
pub mod generator;
mod model;
mod objective;
mod param;
mod search;
pub mod space;
mod tracker;
mod types;

pub use config::Configuration;
pub use dataset::Dataset;
pub use error::{Error, Result, TrainError};
pub use model::{Model, ModelBuilder};
pub use objective::Objective;
pub use param::ParamValue;
pub use search::{CancelToken, Search, SearchBuilder, SearchSummary};
pub use space::SearchSpace;
pub use tracker::{TrialRecord, TrialTracker};
pub use types::{Direction, SearchStatus};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use tuner::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Configuration;
    pub use crate::dataset::Dataset;
    pub use crate::error::{Error, Result, TrainError};
    pub use crate::evaluate::{EvalStrategy, EvaluationResult, Holdout, KFold};
    pub use crate::generator::{CandidateGenerator, GridGenerator, RandomGenerator};
    pub use crate::model::{Model, ModelBuilder};
    pub use crate::objective::Objective;
    pub use crate::param::ParamValue;
    pub use crate::search::{CancelToken, Search, SearchBuilder, SearchSummary};
    pub use crate::space::{Domain, ParamSpec, SearchSpace};
    pub use crate::tracker::{TrialRecord, TrialTracker};
    pub use crate::types::{Direction, SearchStatus};
}

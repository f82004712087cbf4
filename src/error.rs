#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a hyperparameter name is declared twice in a search space.
    #[error("duplicate hyperparameter '{name}'")]
    DuplicateParam {
        /// The name that was already declared.
        name: String,
    },

    /// Returned when a categorical domain has no choices.
    #[error("categorical choices for '{name}' cannot be empty")]
    EmptyChoices {
        /// The name of the offending hyperparameter.
        name: String,
    },

    /// Returned when a range's lower bound is not below its upper bound.
    #[error("invalid bounds for '{name}': low ({low}) must be less than high ({high})")]
    InvalidBounds {
        /// The name of the offending hyperparameter.
        name: String,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when log scale is used with a non-positive lower bound.
    #[error("invalid log bounds for '{name}': low must be positive for log scale")]
    InvalidLogBounds {
        /// The name of the offending hyperparameter.
        name: String,
    },

    /// Returned when an integer step size is not positive.
    #[error("invalid step for '{name}': step must be positive")]
    InvalidStep {
        /// The name of the offending hyperparameter.
        name: String,
    },

    /// Returned when a declared default value lies outside its domain.
    #[error("invalid default for '{name}': default must lie inside the declared domain")]
    InvalidDefault {
        /// The name of the offending hyperparameter.
        name: String,
    },

    /// Returned when grid enumeration is requested over a space containing a
    /// continuous float range.
    #[error("search space is not enumerable: '{name}' is a continuous float range")]
    NotEnumerable {
        /// The name of the hyperparameter that blocks enumeration.
        name: String,
    },

    /// Returned when a dataset's inputs and targets have different row counts.
    #[error("row count mismatch: {inputs} inputs vs {targets} targets")]
    LengthMismatch {
        /// The number of input rows.
        inputs: usize,
        /// The number of target rows.
        targets: usize,
    },

    /// Returned when a dataset has fewer rows than the requested fold count.
    #[error("dataset has {rows} rows but {folds} folds were requested")]
    InsufficientData {
        /// The number of rows available.
        rows: usize,
        /// The number of folds requested.
        folds: usize,
    },

    /// Returned when the best trial is requested from an empty tracker.
    #[error("no trials recorded")]
    NoTrials,

    /// Returned when a candidate configuration violates a model-builder
    /// precondition. Unlike a numerical training failure, this indicates a
    /// systemic problem and aborts the search.
    #[error("configuration rejected by model builder: {0}")]
    Configuration(String),

    /// Returned when the final fit of the best configuration on the full
    /// training data fails.
    #[error("refit of the best configuration failed: {0}")]
    Refit(String),

    /// Returned when the worker pool cannot be constructed.
    #[cfg(feature = "parallel")]
    #[error("worker pool error: {0}")]
    TaskError(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Error type for the model-building capability.
///
/// The two variants encode the search engine's failure policy: a
/// [`Numeric`](TrainError::Numeric) failure is absorbed into a
/// sentinel-scored trial and the search continues, while a
/// [`Configuration`](TrainError::Configuration) failure propagates and
/// aborts the whole search.
///
/// # Examples
///
/// ```
/// use tuner::{Configuration, TrainError};
///
/// fn check_width(config: &Configuration) -> Result<i64, TrainError> {
///     let width = config.get_int("width")?;
///     if width % 8 != 0 {
///         return Err(TrainError::Configuration(format!(
///             "width {width} is not a multiple of 8"
///         )));
///     }
///     Ok(width)
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    /// A numerical failure during building, fitting, or scoring
    /// (non-convergence, overflow, degenerate data). The trial is recorded
    /// with the worst-possible sentinel score and the search continues.
    #[error("numerical failure: {0}")]
    Numeric(String),

    /// The configuration violates a precondition of the model builder.
    /// Propagates as [`Error::Configuration`] and aborts the search.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

//! The scalar metric a search ranks configurations by.

use crate::types::Direction;

/// A named scalar metric with a declared direction.
///
/// The name is informational (it travels into every
/// [`EvaluationResult`](crate::evaluate::EvaluationResult)); the direction
/// drives best-so-far comparisons and the sentinel score for failed
/// trials.
///
/// # Examples
///
/// ```
/// use tuner::{Direction, Objective};
///
/// let accuracy = Objective::maximize("val_accuracy");
/// assert_eq!(accuracy.direction(), Direction::Maximize);
///
/// let rmse = Objective::minimize("rmse");
/// assert_eq!(rmse.sentinel(), f64::INFINITY);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    metric: String,
    direction: Direction,
}

impl Objective {
    /// An objective where higher metric values are better.
    #[must_use]
    pub fn maximize(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            direction: Direction::Maximize,
        }
    }

    /// An objective where lower metric values are better.
    #[must_use]
    pub fn minimize(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            direction: Direction::Minimize,
        }
    }

    /// Returns the metric name.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Returns the direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the worst-possible score under this objective, substituted
    /// for trials that failed numerically.
    #[must_use]
    pub fn sentinel(&self) -> f64 {
        self.direction.worst()
    }
}

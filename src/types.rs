//! Core types shared across the search engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction of the objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Lower objective values are better (e.g. RMSE).
    Minimize,
    /// Higher objective values are better (e.g. validation accuracy).
    Maximize,
}

impl Direction {
    /// The worst possible objective value under this direction.
    ///
    /// Used as the sentinel score for trials whose training failed
    /// numerically, so they can never win a best-so-far comparison.
    #[must_use]
    pub fn worst(self) -> f64 {
        match self {
            Direction::Minimize => f64::INFINITY,
            Direction::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Returns `true` if `candidate` strictly improves on `incumbent`.
    ///
    /// Strict comparison gives the first-found-wins tie-break: an equal
    /// score never displaces an earlier trial. `NaN` never improves.
    #[must_use]
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Minimize => candidate < incumbent,
            Direction::Maximize => candidate > incumbent,
        }
    }
}

/// Terminal state of a search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SearchStatus {
    /// The generator was exhausted; every candidate was evaluated.
    Completed,
    /// The search was cancelled between trials; history up to the
    /// cancellation point is intact.
    Aborted,
}

//! Trial history and best-so-far tracking.

use core::time::Duration;

use parking_lot::RwLock;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::evaluate::EvaluationResult;
use crate::types::Direction;

/// One completed trial: a configuration, its evaluation, and how long the
/// evaluation took. Immutable once recorded.
pub struct TrialRecord<M> {
    /// Sequential trial index, assigned in generation order: the order in
    /// which configurations were pulled from the generator. Under parallel
    /// evaluation, history order may differ from index order.
    pub index: u64,
    /// The evaluated configuration.
    pub config: Configuration,
    /// The evaluation outcome.
    pub result: EvaluationResult<M>,
    /// Wall-clock duration of the evaluation.
    pub duration: Duration,
}

impl<M> Clone for TrialRecord<M> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            config: self.config.clone(),
            result: self.result.clone(),
            duration: self.duration,
        }
    }
}

impl<M> core::fmt::Debug for TrialRecord<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TrialRecord")
            .field("index", &self.index)
            .field("config", &self.config)
            .field("result", &self.result)
            .field("duration", &self.duration)
            .finish()
    }
}

struct TrackerState<M> {
    records: Vec<TrialRecord<M>>,
    best: Option<usize>,
}

/// Append-only trial history with a best-so-far under a direction.
///
/// The tracker is the single shared-mutation point of a search:
/// [`record`](Self::record) takes `&self` behind a write lock, so worker
/// threads can feed one tracker concurrently while each record stays
/// atomic and best-so-far updates stay linearizable.
///
/// The best trial is updated only on strict improvement, so ties keep the
/// earlier trial. A sentinel-scored (failed) trial can seed the best when
/// it is the only history, but can never displace a real score.
///
/// # Examples
///
/// ```
/// use tuner::{Direction, TrialTracker};
///
/// let tracker: TrialTracker<()> = TrialTracker::new(Direction::Maximize);
/// assert!(tracker.best().is_err());
/// ```
pub struct TrialTracker<M> {
    direction: Direction,
    state: RwLock<TrackerState<M>>,
}

impl<M> TrialTracker<M> {
    /// Creates an empty tracker comparing under `direction`.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            state: RwLock::new(TrackerState {
                records: Vec::new(),
                best: None,
            }),
        }
    }

    /// Returns the comparison direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Appends a trial to the history, updating the best on strict
    /// improvement.
    pub fn record(&self, record: TrialRecord<M>) {
        let mut state = self.state.write();
        let improves = match state.best {
            None => true,
            Some(best) => self
                .direction
                .improves(record.result.objective, state.records[best].result.objective),
        };
        if improves {
            state.best = Some(state.records.len());
        }
        state.records.push(record);
    }

    /// Returns the best trial recorded so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTrials`] if nothing has been recorded.
    pub fn best(&self) -> Result<TrialRecord<M>> {
        let state = self.state.read();
        state
            .best
            .map(|index| state.records[index].clone())
            .ok_or(Error::NoTrials)
    }

    /// Returns the full history in record order.
    #[must_use]
    pub fn history(&self) -> Vec<TrialRecord<M>> {
        self.state.read().records.clone()
    }

    /// Returns the number of recorded trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Returns `true` if no trials have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }
}

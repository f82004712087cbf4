//! Random search: seeded sampling up to a trial budget.

use crate::config::Configuration;
use crate::generator::CandidateGenerator;
use crate::space::SearchSpace;

/// Generates configurations by uniform sampling from the space.
///
/// The generator is deterministic given its seed: the same seed, space,
/// and budget reproduce the identical configuration sequence. Sampled
/// configurations are not de-duplicated: repeats are possible and
/// allowed.
///
/// An empty space yields exactly one empty configuration (re-sampling it
/// `budget` times would only repeat the same candidate); a zero budget
/// yields nothing.
///
/// # Examples
///
/// ```
/// use tuner::generator::{CandidateGenerator, RandomGenerator};
/// use tuner::space::{ParamSpec, SearchSpace};
///
/// let mut space = SearchSpace::new();
/// space.declare(ParamSpec::int("depth", 1, 3)).unwrap();
///
/// let mut generator = RandomGenerator::new(space, 42, 5);
/// let mut count = 0;
/// while let Some(config) = generator.next_candidate() {
///     assert!((1..=3).contains(&config.get_int("depth").unwrap()));
///     count += 1;
/// }
/// assert_eq!(count, 5);
/// ```
pub struct RandomGenerator {
    space: SearchSpace,
    rng: fastrand::Rng,
    remaining: usize,
}

impl RandomGenerator {
    /// Creates a generator over `space` that samples `trial_budget`
    /// configurations from a stream seeded with `seed`.
    #[must_use]
    pub fn new(space: SearchSpace, seed: u64, trial_budget: usize) -> Self {
        let remaining = if space.is_empty() && trial_budget > 0 {
            1
        } else {
            trial_budget
        };
        Self {
            space,
            rng: fastrand::Rng::with_seed(seed),
            remaining,
        }
    }

    /// Returns the number of candidates still to be generated.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl CandidateGenerator for RandomGenerator {
    fn next_candidate(&mut self) -> Option<Configuration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.space.sample(&mut self.rng))
    }
}

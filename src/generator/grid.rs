//! Grid search: exhaustive enumeration of a finite space.

use crate::config::Configuration;
use crate::error::Result;
use crate::generator::CandidateGenerator;
use crate::space::SearchSpace;

/// Generates every configuration in the space's Cartesian product, in the
/// deterministic order defined by
/// [`SearchSpace::enumerate`](crate::space::SearchSpace::enumerate).
///
/// The trial budget equals the enumeration size. Construction fails for a
/// space containing a continuous float range.
///
/// # Examples
///
/// ```
/// use tuner::generator::{CandidateGenerator, GridGenerator};
/// use tuner::space::{ParamSpec, SearchSpace};
///
/// let mut space = SearchSpace::new();
/// space
///     .declare(ParamSpec::categorical("optimizer", ["sgd", "adam"]))
///     .unwrap();
/// space.declare(ParamSpec::int("depth", 1, 3)).unwrap();
///
/// let mut generator = GridGenerator::new(&space).unwrap();
/// assert_eq!(generator.len(), 6);
/// ```
pub struct GridGenerator {
    configs: std::vec::IntoIter<Configuration>,
}

impl GridGenerator {
    /// Enumerates `space` into a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnumerable`](crate::Error::NotEnumerable) if the
    /// space contains a continuous float range.
    pub fn new(space: &SearchSpace) -> Result<Self> {
        Ok(Self {
            configs: space.enumerate()?.into_iter(),
        })
    }

    /// Returns the number of candidates still to be generated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns `true` if the grid is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.len() == 0
    }
}

impl CandidateGenerator for GridGenerator {
    fn next_candidate(&mut self) -> Option<Configuration> {
        self.configs.next()
    }
}

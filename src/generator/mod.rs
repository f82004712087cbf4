//! Candidate generation strategies for a search space.
//!
//! A [`CandidateGenerator`] produces the stream of configurations a search
//! evaluates. Two strategies are provided: seeded random sampling up to a
//! trial budget ([`RandomGenerator`]) and exhaustive Cartesian enumeration
//! ([`GridGenerator`]).

pub mod grid;
pub mod random;

pub use grid::GridGenerator;
pub use random::RandomGenerator;

use crate::config::Configuration;

/// A source of candidate configurations.
///
/// Generators are pulled sequentially by the orchestrator, one stream per
/// search, so the set of generated configurations is reproducible even
/// when evaluation itself is parallelized.
pub trait CandidateGenerator {
    /// Returns the next candidate, or `None` once the stream is exhausted.
    fn next_candidate(&mut self) -> Option<Configuration>;
}

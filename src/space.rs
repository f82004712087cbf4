//! Search space declaration: named hyperparameters and their domains.
//!
//! A [`SearchSpace`] is an ordered collection of [`ParamSpec`]s. Candidate
//! generators draw [`Configuration`](crate::Configuration)s from it either
//! by seeded sampling ([`sample`](SearchSpace::sample)) or by exhaustive
//! Cartesian enumeration ([`enumerate`](SearchSpace::enumerate)).
//!
//! # Example
//!
//! ```
//! use tuner::space::{ParamSpec, SearchSpace};
//!
//! let mut space = SearchSpace::new();
//! space.declare(ParamSpec::int("depth", 1, 3)).unwrap();
//! space
//!     .declare(ParamSpec::float("rate", 0.01, 1.0).log_scale())
//!     .unwrap();
//! space
//!     .declare(ParamSpec::categorical("optimizer", ["sgd", "adam"]))
//!     .unwrap();
//!
//! let mut rng = fastrand::Rng::with_seed(42);
//! let config = space.sample(&mut rng);
//! assert_eq!(config.len(), 3);
//! ```

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::param::ParamValue;

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// The domain a hyperparameter draws its values from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// An explicit set of categorical choices.
    Categorical {
        /// The available choices, in declaration order.
        choices: Vec<String>,
    },
    /// An inclusive integer range, optionally log-scaled or stepped.
    Int {
        /// Lower bound (inclusive).
        low: i64,
        /// Upper bound (inclusive).
        high: i64,
        /// Whether to sample in log space.
        log_scale: bool,
        /// Optional stride; also the grid resolution for enumeration.
        step: Option<i64>,
    },
    /// An inclusive float range, optionally log-scaled.
    Float {
        /// Lower bound (inclusive).
        low: f64,
        /// Upper bound (inclusive).
        high: f64,
        /// Whether to sample in log space.
        log_scale: bool,
    },
}

/// A single named hyperparameter and its domain.
///
/// Constructed with [`categorical`](Self::categorical),
/// [`int`](Self::int), or [`float`](Self::float), then refined with the
/// builder methods. Validation happens when the spec is
/// [`declare`](SearchSpace::declare)d into a space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamSpec {
    name: String,
    domain: Domain,
    default: Option<ParamValue>,
}

impl ParamSpec {
    /// Creates a categorical hyperparameter over the given choices.
    #[must_use]
    pub fn categorical(
        name: impl Into<String>,
        choices: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Categorical {
                choices: choices.into_iter().map(Into::into).collect(),
            },
            default: None,
        }
    }

    /// Creates an integer hyperparameter over `[low, high]` inclusive.
    #[must_use]
    pub fn int(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Int {
                low,
                high,
                log_scale: false,
                step: None,
            },
            default: None,
        }
    }

    /// Creates a float hyperparameter over `[low, high]` inclusive.
    #[must_use]
    pub fn float(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Float {
                low,
                high,
                log_scale: false,
            },
            default: None,
        }
    }

    /// Enables log-scale sampling. No effect on categorical domains.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        match &mut self.domain {
            Domain::Int { log_scale, .. } | Domain::Float { log_scale, .. } => *log_scale = true,
            Domain::Categorical { .. } => {}
        }
        self
    }

    /// Sets an integer stride. No effect on float and categorical domains.
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        if let Domain::Int { step: s, .. } = &mut self.domain {
            *s = Some(step);
        }
        self
    }

    /// Sets a declared default value, validated against the domain on
    /// declaration.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the hyperparameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the domain.
    #[must_use]
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Returns the declared default value, if any.
    #[must_use]
    pub fn declared_default(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }

    /// Validates the spec configuration.
    #[allow(clippy::cast_precision_loss)]
    fn validate(&self) -> Result<()> {
        match &self.domain {
            Domain::Categorical { choices } => {
                if choices.is_empty() {
                    return Err(Error::EmptyChoices {
                        name: self.name.clone(),
                    });
                }
            }
            Domain::Int {
                low,
                high,
                log_scale,
                step,
            } => {
                if low >= high {
                    return Err(Error::InvalidBounds {
                        name: self.name.clone(),
                        low: *low as f64,
                        high: *high as f64,
                    });
                }
                if *log_scale && *low < 1 {
                    return Err(Error::InvalidLogBounds {
                        name: self.name.clone(),
                    });
                }
                if let Some(step) = step
                    && *step <= 0
                {
                    return Err(Error::InvalidStep {
                        name: self.name.clone(),
                    });
                }
            }
            Domain::Float {
                low,
                high,
                log_scale,
            } => {
                if low >= high {
                    return Err(Error::InvalidBounds {
                        name: self.name.clone(),
                        low: *low,
                        high: *high,
                    });
                }
                if *log_scale && *low <= 0.0 {
                    return Err(Error::InvalidLogBounds {
                        name: self.name.clone(),
                    });
                }
            }
        }
        self.validate_default()
    }

    fn validate_default(&self) -> Result<()> {
        let Some(default) = &self.default else {
            return Ok(());
        };
        let in_domain = match (&self.domain, default) {
            (Domain::Categorical { choices }, ParamValue::Str(v)) => choices.contains(v),
            (Domain::Int { low, high, .. }, ParamValue::Int(v)) => (*low..=*high).contains(v),
            (Domain::Float { low, high, .. }, ParamValue::Float(v)) => (*low..=*high).contains(v),
            _ => false,
        };
        if in_domain {
            Ok(())
        } else {
            Err(Error::InvalidDefault {
                name: self.name.clone(),
            })
        }
    }

    /// Draws one in-domain value from the spec.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn sample(&self, rng: &mut fastrand::Rng) -> ParamValue {
        match &self.domain {
            Domain::Categorical { choices } => {
                let index = rng.usize(0..choices.len());
                ParamValue::Str(choices[index].clone())
            }
            Domain::Int {
                low,
                high,
                log_scale,
                step,
            } => {
                let value = if *log_scale {
                    // Sample uniformly in log space, then round
                    let log_low = (*low as f64).ln();
                    let log_high = (*high as f64).ln();
                    let log_value = f64_range(rng, log_low, log_high);
                    let raw = log_value.exp().round() as i64;
                    // Clamp to bounds since rounding might push outside
                    raw.clamp(*low, *high)
                } else if let Some(step) = step {
                    // Sample from the step grid
                    let n_steps = (high - low) / step;
                    let k = rng.i64(0..=n_steps);
                    low + k * step
                } else {
                    rng.i64(*low..=*high)
                };
                ParamValue::Int(value)
            }
            Domain::Float {
                low,
                high,
                log_scale,
            } => {
                let value = if *log_scale {
                    // Sample uniformly in log space
                    let log_value = f64_range(rng, low.ln(), high.ln());
                    log_value.exp()
                } else {
                    f64_range(rng, *low, *high)
                };
                ParamValue::Float(value)
            }
        }
    }

    /// Returns the spec's finite value grid in ascending order.
    ///
    /// Integer ranges are walked by their declared step (default 1); the
    /// log-scale flag only affects sampling, not enumeration.
    pub(crate) fn grid_values(&self) -> Result<Vec<ParamValue>> {
        match &self.domain {
            Domain::Categorical { choices } => Ok(choices
                .iter()
                .map(|c| ParamValue::Str(c.clone()))
                .collect()),
            Domain::Int {
                low, high, step, ..
            } => {
                let step = step.unwrap_or(1);
                let mut points = Vec::new();
                let mut current = *low;
                while current <= *high {
                    points.push(ParamValue::Int(current));
                    let next = current.saturating_add(step);
                    if next == current {
                        break;
                    }
                    current = next;
                }
                Ok(points)
            }
            Domain::Float { .. } => Err(Error::NotEnumerable {
                name: self.name.clone(),
            }),
        }
    }

    /// Resolves the spec's baseline value: the declared default, or the
    /// first choice for categorical domains.
    fn baseline(&self) -> Option<ParamValue> {
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        match &self.domain {
            Domain::Categorical { choices } => Some(ParamValue::Str(choices[0].clone())),
            _ => None,
        }
    }
}

/// An ordered, name-unique collection of hyperparameter specs.
///
/// The space is immutable once a search starts: generators take it by
/// value, so later declarations cannot affect a running search.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpace {
    specs: Vec<ParamSpec>,
}

impl SearchSpace {
    /// Creates an empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a hyperparameter in the space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateParam`] if the name is already declared,
    /// or the spec's own validation error ([`Error::EmptyChoices`],
    /// [`Error::InvalidBounds`], [`Error::InvalidLogBounds`],
    /// [`Error::InvalidStep`], [`Error::InvalidDefault`]).
    pub fn declare(&mut self, spec: ParamSpec) -> Result<()> {
        spec.validate()?;
        if self.specs.iter().any(|s| s.name == spec.name) {
            return Err(Error::DuplicateParam { name: spec.name });
        }
        self.specs.push(spec);
        Ok(())
    }

    /// Returns the number of declared hyperparameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no hyperparameters are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Returns the declared specs in declaration order.
    #[must_use]
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Looks up a spec by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Draws one complete in-domain configuration.
    ///
    /// Specs are sampled in declaration order, so a given RNG state always
    /// produces the same configuration for the same space.
    #[must_use]
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Configuration {
        let mut config = Configuration::new();
        for spec in &self.specs {
            config.set(spec.name.clone(), spec.sample(rng));
        }
        config
    }

    /// Enumerates the Cartesian product of all per-spec value grids.
    ///
    /// The order is deterministic: specs by declaration order (earlier
    /// specs vary slowest), values ascending within each spec. The empty
    /// space enumerates to exactly one empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnumerable`] if any spec is a continuous float
    /// range.
    pub fn enumerate(&self) -> Result<Vec<Configuration>> {
        let mut configs = vec![Configuration::new()];
        for spec in &self.specs {
            let values = spec.grid_values()?;
            let mut next = Vec::with_capacity(configs.len() * values.len());
            for base in &configs {
                for value in &values {
                    let mut config = base.clone();
                    config.set(spec.name.clone(), value.clone());
                    next.push(config);
                }
            }
            configs = next;
        }
        Ok(configs)
    }

    /// Returns the baseline configuration, if every spec has one.
    ///
    /// The baseline of a spec is its declared default; categorical specs
    /// without a declared default fall back to their first choice. Returns
    /// `None` as soon as any range spec lacks a default.
    #[must_use]
    pub fn default_configuration(&self) -> Option<Configuration> {
        let mut config = Configuration::new();
        for spec in &self.specs {
            config.set(spec.name.clone(), spec.baseline()?);
        }
        Some(config)
    }
}

//! Complete hyperparameter assignments passed to model builders.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::error::TrainError;
use crate::param::ParamValue;

/// A fully-specified assignment of values to the hyperparameters of a
/// search space: one in-domain value per declared name.
///
/// Configurations are produced by candidate generators and consumed by
/// model builders. The typed accessors return
/// [`TrainError::Configuration`] on a missing or mistyped lookup, so a
/// builder can simply use `?`; a bad lookup then aborts the search as a
/// systemic configuration error rather than a per-trial failure.
///
/// # Examples
///
/// ```
/// use tuner::{Configuration, ParamValue};
///
/// let mut config = Configuration::new();
/// config.set("depth", ParamValue::Int(3));
/// config.set("rate", ParamValue::Float(0.1));
/// config.set("optimizer", ParamValue::from("adam"));
///
/// assert_eq!(config.get_int("depth").unwrap(), 3);
/// assert_eq!(config.get_str("optimizer").unwrap(), "adam");
/// assert!(config.get_float("depth").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    values: BTreeMap<String, ParamValue>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value for a hyperparameter, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the raw value for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns the float value for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Configuration`] if `name` is missing or does
    /// not hold a float value.
    pub fn get_float(&self, name: &str) -> Result<f64, TrainError> {
        match self.require(name)? {
            ParamValue::Float(v) => Ok(*v),
            other => Err(Self::mismatch(name, "a float", other)),
        }
    }

    /// Returns the integer value for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Configuration`] if `name` is missing or does
    /// not hold an integer value.
    pub fn get_int(&self, name: &str) -> Result<i64, TrainError> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(name, "an integer", other)),
        }
    }

    /// Returns the categorical value for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Configuration`] if `name` is missing or does
    /// not hold a categorical value.
    pub fn get_str(&self, name: &str) -> Result<&str, TrainError> {
        match self.require(name)? {
            ParamValue::Str(v) => Ok(v),
            other => Err(Self::mismatch(name, "a categorical choice", other)),
        }
    }

    /// Returns the number of assigned hyperparameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no hyperparameters are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, name: &str) -> Result<&ParamValue, TrainError> {
        self.values
            .get(name)
            .ok_or_else(|| TrainError::Configuration(format!("missing hyperparameter '{name}'")))
    }

    fn mismatch(name: &str, expected: &str, got: &ParamValue) -> TrainError {
        TrainError::Configuration(format!(
            "hyperparameter '{name}' is not {expected}: got {got}"
        ))
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl core::fmt::Display for Configuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        write!(f, "}}")
    }
}

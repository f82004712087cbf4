//! Hyperparameter value storage types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A concrete hyperparameter value drawn from a domain.
///
/// This enum stores the different value kinds uniformly. Categorical
/// values are stored as the chosen string itself so that configurations
/// remain readable without the originating search space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    /// A floating-point value.
    Float(f64),
    /// An integer value.
    Int(i64),
    /// A categorical choice.
    Str(String),
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_raw_values() {
        assert_eq!(ParamValue::Float(0.25).to_string(), "0.25");
        assert_eq!(ParamValue::Int(8).to_string(), "8");
        assert_eq!(ParamValue::from("adam").to_string(), "adam");
    }

    #[test]
    fn from_impls_pick_the_matching_variant() {
        assert_eq!(ParamValue::from(1.5), ParamValue::Float(1.5));
        assert_eq!(ParamValue::from(3i64), ParamValue::Int(3));
        assert_eq!(
            ParamValue::from("sgd".to_string()),
            ParamValue::Str("sgd".to_string())
        );
    }
}

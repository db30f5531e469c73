//! Canonical metric values.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The canonical form of a parsed metric value.
///
/// Numbers are base-10 decimals so accumulated totals never drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Decimal(Decimal),
    /// Seconds.
    Duration(Decimal),
    Text(String),
}

impl Value {
    /// Non-zero numbers and non-empty text.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Decimal(d) | Self::Duration(d) => !d.is_zero(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// The numeric value, if this is a number.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(n) => Some(Decimal::from(*n)),
            Self::Decimal(d) | Self::Duration(d) => Some(*d),
            Self::Text(_) => None,
        }
    }

    /// Name of the representation, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Decimal(_) => "decimal",
            Self::Duration(_) => "duration",
            Self::Text(_) => "text",
        }
    }
}

/// Canonical serialization. Every form parses back to the same value with
/// the unit it came from; durations carry an `s` suffix.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Duration(d) => write!(f, "{d}s"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

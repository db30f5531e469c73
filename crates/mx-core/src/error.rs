//! Error types for unit parsing, metric validation and project configuration.

use thiserror::Error;

use crate::value::Value;

/// A raw text value could not be converted to its unit's canonical form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// The text is not a base-10 integer.
    #[error("invalid int expression: {0}")]
    InvalidInt(String),

    /// The text is an integer too large for a 64-bit value.
    #[error("integer out of range: {0}")]
    IntOutOfRange(String),

    /// The text is not a decimal number.
    #[error("invalid float expression: {0}")]
    InvalidFloat(String),

    /// A duration fragment used a unit word outside the known synonym sets.
    #[error("invalid duration expression: {0}")]
    UnknownDurationUnit(String),

    /// A duration fragment does not fit in a decimal.
    #[error("duration out of range: {0}")]
    DurationOverflow(String),

    /// An enum value outside the metric's allowed set.
    #[error("{value} is not one of: {allowed}")]
    NotAllowed { value: String, allowed: String },

    /// A canonical value of the wrong shape was handed to a unit.
    #[error("{unit} cannot represent {value}")]
    Unsupported { unit: &'static str, value: String },
}

/// A parsed value is not legal for a metric.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is not a member of the metric's value range.
    #[error("{value} is not a legal value for {metric}")]
    OutOfRange { metric: String, value: Value },

    /// The value's representation does not match the metric's unit.
    #[error("{metric} expects a {expected} value, got {value}")]
    TypeMismatch {
        metric: String,
        expected: &'static str,
        value: Value,
    },
}

/// Malformed project or metric definitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A metric with the same name is already registered.
    #[error("a metric named {0} already exists for this project")]
    DuplicateMetric(String),

    /// The unit name is not one of the recognized unit kinds.
    #[error("unknown unit {0}: expected one of Int, Float, Duration, String, Enum")]
    UnknownUnit(String),

    /// The default value is not a member of the value range.
    #[error("default value {value} for metric {metric} is not in its value range")]
    DefaultOutOfRange { metric: String, value: Value },

    /// Enum metrics take their allowed values from the range.
    #[error("enum metric {0} needs a value range")]
    MissingEnumRange(String),

    /// A range entry or default could not be converted to the metric's unit.
    #[error("invalid value for metric {metric}: {source}")]
    InvalidValue {
        metric: String,
        #[source]
        source: ParsingError,
    },

    /// A required name was empty.
    #[error("{field} cannot be empty")]
    EmptyName { field: &'static str },
}

/// A batch task update was rejected.
///
/// Nothing from the batch is recorded when any of these is returned.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// No metric with this name exists in the project.
    #[error("invalid metric: {0}")]
    UnknownMetric(String),

    /// The raw text for a metric did not parse.
    #[error("{metric}: {source}")]
    Parse {
        metric: String,
        #[source]
        source: ParsingError,
    },

    /// The parsed value failed the metric's range check.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store refused the batch.
    #[error("failed to record data points: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

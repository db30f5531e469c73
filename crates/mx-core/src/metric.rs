//! Metrics: named, typed measurements recorded against tasks.

use crate::error::{ConfigError, ParsingError, ValidationError};
use crate::locale::Locale;
use crate::units::UnitKind;
use crate::value::Value;

/// Optional parts of a metric definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricOptions {
    pub description: Option<String>,
    /// Ordered set of legal values.
    pub value_range: Option<Vec<Value>>,
    pub default_value: Option<Value>,
}

/// A named measurement with a unit, an optional value range and an
/// optional default.
///
/// Range entries and the default are stored in the unit's canonical form, and
/// a default always lies inside the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    name: String,
    unit: UnitKind,
    description: Option<String>,
    value_range: Option<Vec<Value>>,
    default_value: Option<Value>,
}

impl Metric {
    /// Builds a metric, rejecting definitions that could never validate.
    pub fn new(
        name: impl Into<String>,
        unit: UnitKind,
        options: MetricOptions,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                field: "metric name",
            });
        }

        let invalid = |source: ParsingError| ConfigError::InvalidValue {
            metric: name.clone(),
            source,
        };

        let value_range = options
            .value_range
            .map(|range| {
                range
                    .into_iter()
                    .map(|value| unit.coerce(value))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(invalid)?;

        let default_value = options
            .default_value
            .map(|value| unit.coerce(value))
            .transpose()
            .map_err(invalid)?;

        if unit == UnitKind::Enum && value_range.is_none() {
            return Err(ConfigError::MissingEnumRange(name));
        }

        if let (Some(range), Some(default)) = (&value_range, &default_value) {
            if !range.contains(default) {
                return Err(ConfigError::DefaultOutOfRange {
                    metric: name,
                    value: default.clone(),
                });
            }
        }

        Ok(Self {
            name,
            unit,
            description: options.description,
            value_range,
            default_value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn unit(&self) -> UnitKind {
        self.unit
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value_range(&self) -> Option<&[Value]> {
        self.value_range.as_deref()
    }

    pub const fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Parses raw text with this metric's unit.
    ///
    /// For `Enum` metrics the value range is the allowed set.
    pub fn parse(&self, raw: &str) -> Result<Value, ParsingError> {
        self.unit.parse_in(raw, self.value_range())
    }

    /// Checks that `value` is legal for this metric.
    pub fn validate(&self, value: Value) -> Result<Value, ValidationError> {
        match &self.value_range {
            Some(range) if range.contains(&value) => Ok(value),
            Some(_) => Err(ValidationError::OutOfRange {
                metric: self.name.clone(),
                value,
            }),
            None if self.unit.accepts(&value) => Ok(value),
            None => Err(ValidationError::TypeMismatch {
                metric: self.name.clone(),
                expected: self.unit.display_name(),
                value,
            }),
        }
    }

    /// The default value, or the unit's zero when none is configured.
    pub fn resolve_default(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.unit.natural_zero())
    }

    pub fn render(&self, value: &Value, locale: &Locale) -> String {
        self.unit.render(value, locale)
    }
}

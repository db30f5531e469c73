//! Declarative project definitions.
//!
//! These are the serde shapes of the `[[projects]]` tables in the config
//! file. [`ProjectConfig::build`] turns one into a validated [`Project`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParsingError};
use crate::metric::{Metric, MetricOptions};
use crate::project::Project;
use crate::units::UnitKind;
use crate::value::Value;

/// A project as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

/// A metric as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    pub name: String,
    /// Unit name: `Int`, `Float`, `Duration`, `String` or `Enum`.
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, alias = "range", skip_serializing_if = "Option::is_none")]
    pub value_range: Option<Vec<ConfigScalar>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ConfigScalar>,
}

/// A literal range entry or default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ConfigScalar {
    fn into_value(self) -> Result<Value, ParsingError> {
        match self {
            Self::Int(n) => Ok(Value::Int(n)),
            Self::Float(f) => {
                let text = f.to_string();
                Decimal::from_str(&text)
                    .map(Value::Decimal)
                    .map_err(|_| ParsingError::InvalidFloat(text))
            }
            Self::Text(s) => Ok(Value::Text(s)),
        }
    }
}

impl MetricConfig {
    pub fn build(&self) -> Result<Metric, ConfigError> {
        let unit: UnitKind = self.units.parse()?;
        let invalid = |source| ConfigError::InvalidValue {
            metric: self.name.clone(),
            source,
        };

        let value_range = self
            .value_range
            .clone()
            .map(|range| {
                range
                    .into_iter()
                    .map(ConfigScalar::into_value)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(invalid)?;
        let default_value = self
            .default_value
            .clone()
            .map(ConfigScalar::into_value)
            .transpose()
            .map_err(invalid)?;

        Metric::new(
            self.name.clone(),
            unit,
            MetricOptions {
                description: self.desc.clone(),
                value_range,
                default_value,
            },
        )
    }
}

impl ProjectConfig {
    /// Builds the project and all of its metrics. The first bad metric
    /// fails the whole project.
    pub fn build(&self) -> Result<Project, ConfigError> {
        let mut project = Project::new(self.name.clone(), self.desc.clone())?;
        if let Some(nickname) = &self.nickname {
            project = project.with_nickname(nickname.clone());
        }
        for metric in &self.metrics {
            project.add_metric(metric.build()?)?;
        }
        Ok(project)
    }
}

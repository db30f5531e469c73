//! Projects and the metrics they track.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{ConfigError, UpdateError};
use crate::metric::Metric;
use crate::task::{DataPoint, TaskName, TaskStore};
use crate::value::Value;

/// A project with a set of uniquely named metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    description: String,
    nickname: Option<String>,
    metrics: HashMap<String, Metric>,
}

impl Project {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                field: "project name",
            });
        }
        Ok(Self {
            name,
            description: description.into(),
            nickname: None,
            metrics: HashMap::new(),
        })
    }

    /// Sets the short name used to select the project and key its tasks.
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Storage key: the nickname, or the name when there is none.
    pub fn key(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }

    /// Registers a metric. Names are case-sensitive and must be unique.
    pub fn add_metric(&mut self, metric: Metric) -> Result<(), ConfigError> {
        if self.metrics.contains_key(metric.name()) {
            return Err(ConfigError::DuplicateMetric(metric.name().to_string()));
        }
        self.metrics.insert(metric.name().to_string(), metric);
        Ok(())
    }

    /// Exact-name lookup.
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.get(name)
    }

    /// Exact-name lookup, falling back to the title-cased form with
    /// underscores as spaces (`story_points` finds `Story Points`).
    pub fn find_metric(&self, name: &str) -> Option<&Metric> {
        self.metric(name)
            .or_else(|| self.metric(&title_case(&name.replace('_', " "))))
    }

    /// Metrics ordered by name.
    pub fn sorted_metrics(&self) -> Vec<&Metric> {
        let mut metrics: Vec<&Metric> = self.metrics.values().collect();
        metrics.sort_by(|a, b| a.name().cmp(b.name()));
        metrics
    }

    /// Resolves, parses and validates a batch of `(metric name, raw text)`
    /// pairs. Returns the first failure; nothing is partially accepted.
    pub fn prepare_update<I, K, V>(&self, pairs: I) -> Result<Vec<(&Metric, Value)>, UpdateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(name, raw)| {
                let name = name.as_ref();
                let metric = self
                    .find_metric(name)
                    .ok_or_else(|| UpdateError::UnknownMetric(name.to_string()))?;
                let value = metric
                    .parse(raw.as_ref())
                    .map_err(|source| UpdateError::Parse {
                        metric: metric.name().to_string(),
                        source,
                    })?;
                Ok((metric, metric.validate(value)?))
            })
            .collect()
    }

    /// Validates and records a batch of raw values against a task.
    ///
    /// Either every pair is recorded or none is.
    pub fn update_task<S, I, K, V>(
        &self,
        store: &mut S,
        task: &TaskName,
        pairs: I,
    ) -> Result<Vec<DataPoint>, UpdateError>
    where
        S: TaskStore,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.update_task_at(store, task, pairs, Utc::now())
    }

    pub fn update_task_at<S, I, K, V>(
        &self,
        store: &mut S,
        task: &TaskName,
        pairs: I,
        now: DateTime<Utc>,
    ) -> Result<Vec<DataPoint>, UpdateError>
    where
        S: TaskStore,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let batch = self.prepare_update(pairs)?;
        self.record_batch(store, task, batch, now)
    }

    /// Records already-parsed values. Each value is validated against its
    /// metric, which must belong to this project.
    pub fn record_batch<S: TaskStore>(
        &self,
        store: &mut S,
        task: &TaskName,
        batch: Vec<(&Metric, Value)>,
        now: DateTime<Utc>,
    ) -> Result<Vec<DataPoint>, UpdateError> {
        let points = batch
            .into_iter()
            .map(|(metric, value)| {
                let own = self
                    .metric(metric.name())
                    .filter(|own| *own == metric)
                    .ok_or_else(|| UpdateError::UnknownMetric(metric.name().to_string()))?;
                Ok(DataPoint {
                    metric: own.name().to_string(),
                    value: own.validate(value)?,
                    recorded_at: now,
                })
            })
            .collect::<Result<Vec<_>, UpdateError>>()?;

        store
            .record(self.key(), task, &points, now)
            .map_err(|e| UpdateError::Store(Box::new(e)))?;
        Ok(points)
    }
}

/// Upper-cases the first letter of every word and lower-cases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

//! Tasks, their data points, and the storage seam that persists them.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value::Value;

/// A validated task name.
///
/// Task names must be non-empty; they are unique within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskName(String);

impl TaskName {
    /// Creates a new task name after validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName { field: "task name" });
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskName {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskName> for String {
    fn from(name: TaskName) -> Self {
        name.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TaskName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One recorded value of a metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Name of the metric the value belongs to.
    pub metric: String,
    pub value: Value,
    pub recorded_at: DateTime<Utc>,
}

/// A unit of work within a project, holding its data points in the order
/// they were recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Key of the owning project.
    pub project: String,
    pub name: TaskName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
}

impl Task {
    /// Creates an empty task.
    pub fn new(project: impl Into<String>, name: TaskName, now: DateTime<Utc>) -> Self {
        Self {
            project: project.into(),
            name,
            created_at: now,
            updated_at: now,
            data_points: Vec::new(),
        }
    }

    /// The most recently recorded data point for a metric.
    pub fn latest(&self, metric: &str) -> Option<&DataPoint> {
        self.data_points.iter().rev().find(|dp| dp.metric == metric)
    }
}

/// Persistence for tasks and their data points.
///
/// Implementations must apply a [`TaskStore::record`] batch all-or-nothing.
pub trait TaskStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads a task with its data points.
    fn task(&self, project: &str, name: &str) -> Result<Option<Task>, Self::Error>;

    /// Lists a project's tasks ordered by name.
    fn tasks(&self, project: &str) -> Result<Vec<Task>, Self::Error>;

    /// Appends a batch of data points to a task, creating the task if needed.
    fn record(
        &mut self,
        project: &str,
        name: &TaskName,
        points: &[DataPoint],
        now: DateTime<Utc>,
    ) -> Result<(), Self::Error>;
}

/// In-process [`TaskStore`].
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: HashMap<(String, String), Task>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryTaskStore {
    type Error = Infallible;

    fn task(&self, project: &str, name: &str) -> Result<Option<Task>, Self::Error> {
        Ok(self
            .tasks
            .get(&(project.to_string(), name.to_string()))
            .cloned())
    }

    fn tasks(&self, project: &str) -> Result<Vec<Task>, Self::Error> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.project == project)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(tasks)
    }

    fn record(
        &mut self,
        project: &str,
        name: &TaskName,
        points: &[DataPoint],
        now: DateTime<Utc>,
    ) -> Result<(), Self::Error> {
        let task = self
            .tasks
            .entry((project.to_string(), name.as_str().to_string()))
            .or_insert_with(|| Task::new(project, name.clone(), now));
        task.data_points.extend_from_slice(points);
        task.updated_at = now;
        Ok(())
    }
}

//! Storage layer for the maxify time tracker.
//!
//! Persists projects, tasks and their data points using `rusqlite`, and
//! implements [`TaskStore`] so validated batches from
//! [`Project::update_task`](mx_core::Project::update_task) land in one
//! transaction.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without a `Mutex`.
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in RFC 3339 format (e.g., `2026-01-28T09:00:00.000Z`),
//! so lexicographic order matches chronological order.
//!
//! Data point values are stored as the JSON encoding of [`Value`], which keeps
//! decimals exact (they are serialized as strings).

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use mx_core::{DataPoint, Project, Task, TaskName, TaskStore, Value};
use rusqlite::{Connection, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored value could not be encoded or decoded.
    #[error("invalid data point value: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for task {task}: {timestamp}")]
    TimestampParse {
        task: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored task name is empty.
    #[error("invalid task name in project {project}: {name:?}")]
    InvalidTaskName { project: String, name: String },
    /// Tasks can only be recorded against a registered project.
    #[error("unknown project: {0}")]
    UnknownProject(String),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Project metadata stored in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub key: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug)]
struct TaskRow {
    id: i64,
    project: String,
    name: String,
    created_at: String,
    updated_at: String,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS projects (
                key TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (project, name),
                FOREIGN KEY (project) REFERENCES projects(key) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project);

            -- value: JSON encoding of the canonical value, e.g. {\"type\":\"int\",\"value\":5}
            CREATE TABLE IF NOT EXISTS data_points (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL,
                metric TEXT NOT NULL,
                value TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_data_points_task ON data_points(task_id);
            ",
        )?;
        Ok(())
    }

    /// Inserts a project or refreshes its name and description.
    pub fn upsert_project(&mut self, project: &Project) -> Result<(), DbError> {
        self.upsert_project_at(project, Utc::now())
    }

    fn upsert_project_at(&mut self, project: &Project, now: DateTime<Utc>) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO projects (key, name, description, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                name = excluded.name,
                description = excluded.description
            ",
            params![
                project.key(),
                project.name(),
                project.description(),
                format_timestamp(now),
            ],
        )?;
        tracing::debug!(project = project.key(), "registered project");
        Ok(())
    }

    /// Lists stored projects ordered by key.
    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, name, description, created_at FROM projects ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(ProjectRecord {
                key: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?);
        }
        Ok(projects)
    }

    /// Deletes a project with all of its tasks and data points.
    ///
    /// Returns whether a project was removed.
    pub fn delete_project(&mut self, key: &str) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM projects WHERE key = ?", [key])?;
        Ok(removed > 0)
    }

    fn project_exists(&self, key: &str) -> Result<bool, DbError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE key = ?)",
            [key],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn task_rows(&self, project: &str, name: Option<&str>) -> Result<Vec<TaskRow>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, project, name, created_at, updated_at
            FROM tasks
            WHERE project = ?1 AND (?2 IS NULL OR name = ?2)
            ORDER BY name ASC
            ",
        )?;
        let rows = stmt.query_map(params![project, name], |row| {
            Ok(TaskRow {
                id: row.get(0)?,
                project: row.get(1)?,
                name: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn load_task(&self, row: TaskRow) -> Result<Task, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT metric, value, recorded_at
            FROM data_points
            WHERE task_id = ?
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([row.id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?;

        let mut data_points = Vec::new();
        for point in rows {
            let (metric, value, recorded_at) = point?;
            let value: Value = serde_json::from_str(&value)?;
            data_points.push(DataPoint {
                metric,
                value,
                recorded_at: parse_timestamp(&recorded_at, &row.name)?,
            });
        }

        let name = TaskName::new(row.name.clone()).map_err(|_| DbError::InvalidTaskName {
            project: row.project.clone(),
            name: row.name.clone(),
        })?;
        Ok(Task {
            created_at: parse_timestamp(&row.created_at, &row.name)?,
            updated_at: parse_timestamp(&row.updated_at, &row.name)?,
            project: row.project,
            name,
            data_points,
        })
    }
}

impl TaskStore for Database {
    type Error = DbError;

    fn task(&self, project: &str, name: &str) -> Result<Option<Task>, DbError> {
        self.task_rows(project, Some(name))?
            .into_iter()
            .next()
            .map(|row| self.load_task(row))
            .transpose()
    }

    fn tasks(&self, project: &str) -> Result<Vec<Task>, DbError> {
        self.task_rows(project, None)?
            .into_iter()
            .map(|row| self.load_task(row))
            .collect()
    }

    fn record(
        &mut self,
        project: &str,
        name: &TaskName,
        points: &[DataPoint],
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        if !self.project_exists(project)? {
            return Err(DbError::UnknownProject(project.to_string()));
        }

        let updated_at = format_timestamp(now);
        let tx = self.conn.transaction()?;
        tx.execute(
            "
            INSERT INTO tasks (project, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(project, name) DO UPDATE SET updated_at = excluded.updated_at
            ",
            params![project, name.as_str(), updated_at],
        )?;
        let task_id: i64 = tx.query_row(
            "SELECT id FROM tasks WHERE project = ? AND name = ?",
            params![project, name.as_str()],
            |row| row.get(0),
        )?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO data_points (task_id, metric, value, recorded_at)
                VALUES (?, ?, ?, ?)
                ",
            )?;
            for point in points {
                stmt.execute(params![
                    task_id,
                    point.metric,
                    serde_json::to_string(&point.value)?,
                    format_timestamp(point.recorded_at),
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!(
            project,
            task = name.as_str(),
            points = points.len(),
            "recorded data points"
        );
        Ok(())
    }
}

fn parse_timestamp(timestamp: &str, task: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            task: task.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

//! CLI subcommand implementations.

use std::io::Write;

use anyhow::{Context, Result};
use mx_db::Database;

use crate::{Config, Registry};

pub mod metrics;
pub mod parse;
pub mod projects;
pub mod shell;
pub mod task;

/// Opens the configured database, creating its directory if needed, and
/// registers every configured project in it.
pub fn open_database(config: &Config, registry: &Registry) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let mut db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    for project in registry.projects() {
        db.upsert_project(project)
            .with_context(|| format!("failed to register project {}", project.name()))?;
    }
    Ok(db)
}

/// Writes a heading underlined with dashes.
fn write_title<W: Write>(writer: &mut W, title: &str) -> Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "-".repeat(title.chars().count().min(80)))?;
    Ok(())
}

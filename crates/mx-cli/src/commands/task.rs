//! Records metric values against a task, or prints a task.

use std::collections::BTreeSet;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use mx_core::{Locale, Project, Task, TaskName, TaskStore};

/// Records `pairs` (alternating metric names and raw values) against a task.
/// With no pairs, prints the task instead.
pub fn run<W: Write, S: TaskStore>(
    writer: &mut W,
    project: &Project,
    store: &mut S,
    task: &str,
    pairs: &[String],
    locale: &Locale,
) -> Result<()> {
    let name = TaskName::new(task)?;
    if pairs.is_empty() {
        let Some(task) = store.task(project.key(), name.as_str())? else {
            bail!("No task found named '{name}'");
        };
        return print_task(writer, project, &task, locale);
    }

    let points = project.update_task(store, &name, metric_pairs(pairs)?)?;
    tracing::debug!(
        project = project.key(),
        task = %name,
        points = points.len(),
        "task updated"
    );
    writeln!(writer, "Task updated")?;
    Ok(())
}

/// Groups alternating `METRIC VALUE` arguments into pairs.
pub fn metric_pairs(args: &[String]) -> Result<Vec<(&str, &str)>> {
    let mut chunks = args.chunks_exact(2);
    let pairs = chunks
        .by_ref()
        .map(|pair| (pair[0].as_str(), pair[1].as_str()))
        .collect();
    if let [metric] = chunks.remainder() {
        bail!("missing value for metric '{metric}'");
    }
    Ok(pairs)
}

/// Prints a task's timestamps and the latest value of each metric.
pub fn print_task<W: Write>(
    writer: &mut W,
    project: &Project,
    task: &Task,
    locale: &Locale,
) -> Result<()> {
    writeln!(writer, "Task: {}", task.name)?;
    writeln!(writer, "Created: {}", format_time(task.created_at))?;
    writeln!(writer, "Last Updated: {}", format_time(task.updated_at))?;
    writeln!(writer)?;

    if task.data_points.is_empty() {
        writeln!(writer, " (no data points)")?;
        return Ok(());
    }

    for metric in project.sorted_metrics() {
        if let Some(point) = task.latest(metric.name()) {
            writeln!(
                writer,
                " {} -> {}",
                metric.name(),
                metric.render(&point.value, locale)
            )?;
        }
    }

    // Values recorded under metrics that are no longer configured.
    let retired: BTreeSet<&str> = task
        .data_points
        .iter()
        .map(|point| point.metric.as_str())
        .filter(|metric| project.metric(metric).is_none())
        .collect();
    for metric in retired {
        if let Some(point) = task.latest(metric) {
            writeln!(writer, " {metric} -> {}", point.value)?;
        }
    }
    Ok(())
}

fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

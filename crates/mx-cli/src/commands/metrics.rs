//! Lists a project's metrics with their units, value ranges and defaults.

use std::io::Write;

use anyhow::Result;
use mx_core::{Locale, Project};

pub fn run<W: Write>(writer: &mut W, project: &Project, locale: &Locale) -> Result<()> {
    let metrics = project.sorted_metrics();
    if metrics.is_empty() {
        writeln!(writer, "Project '{}' has no metrics", project.name())?;
        return Ok(());
    }

    for metric in metrics {
        let unit = metric.unit().display_name();
        match metric.description() {
            Some(desc) => writeln!(writer, "* {} ({unit}) -> {desc}", metric.name())?,
            None => writeln!(writer, "* {} ({unit})", metric.name())?,
        }
        if let Some(range) = metric.value_range() {
            let values: Vec<String> = range
                .iter()
                .map(|value| metric.render(value, locale))
                .collect();
            writeln!(writer, "    values: {}", values.join(", "))?;
        }
        if let Some(default) = metric.default_value() {
            writeln!(writer, "    default: {}", metric.render(default, locale))?;
        }
    }
    Ok(())
}

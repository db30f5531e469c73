//! Parses a single value, with an explicit unit or by inference.

use std::io::Write;

use anyhow::{Result, anyhow};
use mx_core::{Locale, UnitKind, determine_unit_and_value};

/// Prints `<Unit>: <rendered> (<canonical>)` for `value`.
pub fn run<W: Write>(writer: &mut W, value: &str, unit: Option<&str>, locale: &Locale) -> Result<()> {
    let (unit, parsed) = match unit {
        Some(unit) => {
            let unit: UnitKind = unit.parse()?;
            (unit, unit.parse(value)?)
        }
        None => determine_unit_and_value(value)
            .ok_or_else(|| anyhow!("could not infer a unit for '{value}'"))?,
    };

    writeln!(writer, "{unit}: {} ({parsed})", unit.render(&parsed, locale))?;
    Ok(())
}

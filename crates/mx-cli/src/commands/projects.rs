//! Lists configured projects.

use std::io::Write;

use anyhow::Result;

use super::write_title;
use crate::Registry;

pub fn run<W: Write>(writer: &mut W, registry: &Registry) -> Result<()> {
    write_title(writer, "Projects")?;
    if registry.is_empty() {
        writeln!(writer, "No projects configured")?;
        return Ok(());
    }

    for project in registry.projects() {
        match project.nickname() {
            Some(nickname) => writeln!(
                writer,
                "* {} (nickname: {nickname}) -> {}",
                project.name(),
                project.description()
            )?,
            None => writeln!(writer, "* {} -> {}", project.name(), project.description())?,
        }
    }
    Ok(())
}

//! Interactive shell.
//!
//! Reads one command per line and keeps a current project between commands.
//! Errors are printed as `Error: <message>` and the loop carries on.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use mx_core::{Locale, Project, TaskStore};

use super::{metrics, parse, projects, task};
use crate::Registry;

const INTRO: &str = "Maxify programmer time tracker client";
const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  project [NAME]               switch to a project, or list projects
  projects                     list projects
  metrics                      list the current project's metrics
  task NAME [METRIC VALUE]...  record values for a task, or print it
  print [TASK]                 print the current project or a task
  parse VALUE [UNIT]           parse a value, inferring the unit if none is given
  help                         show this help
  exit, quit                   leave the shell
Entering a task name on its own prints that task.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct Shell<'a, S> {
    registry: &'a Registry,
    store: &'a mut S,
    locale: Locale,
    current: Option<&'a Project>,
}

/// Runs the shell until `exit`, `quit` or end of input.
pub fn run<R: BufRead, W: Write, S: TaskStore>(
    mut reader: R,
    writer: &mut W,
    registry: &Registry,
    store: &mut S,
    locale: Locale,
    project: Option<&str>,
) -> Result<()> {
    let mut shell = Shell {
        registry,
        store,
        locale,
        current: None,
    };

    writeln!(writer, "{INTRO}")?;
    if let Some(name) = project {
        writeln!(writer)?;
        match registry.find(name) {
            Some(found) => {
                shell.current = Some(found);
                writeln!(writer, "Switched to project '{}'", found.name())?;
            }
            None => writeln!(writer, "No project found named '{name}'")?,
        }
    }

    let mut buf = Vec::new();
    loop {
        write!(writer, "{PROMPT}")?;
        writer.flush()?;
        buf.clear();
        if reader
            .read_until(b'\n', &mut buf)
            .context("failed to read input")?
            == 0
        {
            writeln!(writer)?;
            break;
        }
        // Undecodable bytes become U+FFFD so a bad line fails on its own.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        match shell.execute(writer, line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => {
                tracing::debug!(%line, error = %err, "shell command failed");
                writeln!(writer, "Error: {err}")?;
            }
        }
    }
    Ok(())
}

impl<'a, S: TaskStore> Shell<'a, S> {
    fn execute<W: Write>(&mut self, writer: &mut W, line: &str) -> Result<Flow> {
        let args = split_args(line)?;
        let Some((command, rest)) = args.split_first() else {
            return Ok(Flow::Continue);
        };

        match command.as_str() {
            "exit" | "quit" => return Ok(Flow::Exit),
            "help" => writeln!(writer, "{HELP}")?,
            "project" if rest.is_empty() => projects::run(writer, self.registry)?,
            "project" => {
                let name = rest.join(" ");
                self.current = self.registry.find(&name);
                match self.current {
                    Some(project) => writeln!(writer, "Switched to project '{}'", project.name())?,
                    None => bail!("No project found named '{name}'"),
                }
            }
            "projects" => projects::run(writer, self.registry)?,
            "metrics" => metrics::run(writer, self.project()?, &self.locale)?,
            "task" => {
                let Some((name, pairs)) = rest.split_first() else {
                    bail!("You must specify a task to create or update.\nUsage: task NAME [METRIC VALUE]...");
                };
                task::run(writer, self.project()?, self.store, name, pairs, &self.locale)?;
            }
            "print" if rest.is_empty() => self.print_project(writer)?,
            "print" => task::run(
                writer,
                self.project()?,
                self.store,
                &rest.join(" "),
                &[],
                &self.locale,
            )?,
            "parse" => match rest {
                [value] => parse::run(writer, value, None, &self.locale)?,
                [value, unit] => parse::run(writer, value, Some(unit.as_str()), &self.locale)?,
                _ => bail!("Usage: parse VALUE [UNIT]"),
            },
            _ => self.print_named_task(writer, line)?,
        }
        Ok(Flow::Continue)
    }

    fn project(&self) -> Result<&'a Project> {
        self.current
            .context("Please select a project first using the 'project' command")
    }

    fn print_project<W: Write>(&self, writer: &mut W) -> Result<()> {
        let project = self.project()?;
        writeln!(writer, "Project: {}", project.name())?;
        if !project.description().is_empty() {
            writeln!(writer, "Description: {}", project.description())?;
        }

        let tasks = self.store.tasks(project.key())?;
        writeln!(writer, "Tasks: {}", tasks.len())?;
        for task in tasks {
            writeln!(writer, " * {}", task.name)?;
        }
        Ok(())
    }

    /// A line that is not a command may be the name of a task.
    fn print_named_task<W: Write>(&self, writer: &mut W, line: &str) -> Result<()> {
        let name = line.trim();
        if let Some(project) = self.current {
            if let Some(found) = self.store.task(project.key(), name)? {
                return task::print_task(writer, project, &found, &self.locale);
            }
        }
        bail!("Unknown syntax: {name}")
    }
}

/// Splits a command line on whitespace. Single or double quotes group words
/// into one argument.
fn split_args(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_arg = true;
            }
            None if ch.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(ch);
                in_arg = true;
            }
        }
    }

    if let Some(open) = quote {
        bail!("unterminated {open} quote");
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

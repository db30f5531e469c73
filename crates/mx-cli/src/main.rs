use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mx_cli::commands::{metrics, open_database, parse, projects, shell, task};
use mx_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let registry = config.build_registry();
    let locale = config.resolve_locale();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // The shell is the default command.
    match cli.command.unwrap_or(Commands::Shell { project: None }) {
        Commands::Projects => projects::run(&mut out, &registry)?,
        Commands::Metrics { project } => {
            metrics::run(&mut out, registry.require(&project)?, &locale)?;
        }
        Commands::Parse { value, unit } => {
            parse::run(&mut out, &value, unit.as_deref(), &locale)?;
        }
        Commands::Task {
            project,
            task: task_name,
            pairs,
        } => {
            let project = registry.require(&project)?;
            let mut db = open_database(&config, &registry)?;
            task::run(&mut out, project, &mut db, &task_name, &pairs, &locale)?;
        }
        Commands::Shell { project } => {
            let mut db = open_database(&config, &registry)?;
            shell::run(io::stdin().lock(), &mut out, &registry, &mut db, locale, project.as_deref())?;
        }
    }

    Ok(())
}

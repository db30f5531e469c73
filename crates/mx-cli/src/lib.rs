//! Maxify CLI library.
//!
//! This crate provides the command-line and interactive shell interface for
//! the maxify time tracker.

mod cli;
pub mod commands;
mod config;
mod registry;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use registry::Registry;

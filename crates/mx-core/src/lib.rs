//! Core domain logic for the maxify time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Units: parsing free-form text (durations, integers, decimals) into
//!   canonical values and rendering them again
//! - Metrics: typed measurements with optional value ranges and defaults
//! - Projects: named metric sets and validated, all-or-nothing task updates
//!
//! Nothing here performs I/O; persistence plugs in through [`TaskStore`].

pub mod config;
pub mod duration;
mod error;
pub mod locale;
pub mod metric;
pub mod project;
pub mod task;
pub mod units;
mod value;

pub use config::{ConfigScalar, MetricConfig, ProjectConfig};
pub use error::{ConfigError, ParsingError, UpdateError, ValidationError};
pub use locale::Locale;
pub use metric::{Metric, MetricOptions};
pub use project::Project;
pub use task::{DataPoint, MemoryTaskStore, Task, TaskName, TaskStore};
pub use units::{UnitKind, determine_unit_and_value};
pub use value::Value;

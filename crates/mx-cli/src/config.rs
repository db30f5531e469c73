//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mx_core::{Locale, ProjectConfig};
use serde::{Deserialize, Serialize};

use crate::registry::Registry;

/// Environment variables consulted, in order, when no locale is configured.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_NUMERIC", "LANG"];

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Locale tag for number formatting, e.g. `en_US.UTF-8`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Project definitions.
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let project_names: Vec<&str> = self.projects.iter().map(|p| p.name.as_str()).collect();
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("locale", &self.locale)
            .field("projects", &project_names)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("maxify.db"),
            locale: None,
            projects: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // MX_DATABASE_PATH, MX_LOCALE
        figment = figment.merge(Env::prefixed("MX_"));

        figment.extract()
    }

    /// Resolves the number-formatting locale, falling back to the process
    /// environment when none is configured.
    pub fn resolve_locale(&self) -> Locale {
        self.resolve_locale_with(|key| std::env::var(key).ok())
    }

    fn resolve_locale_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Locale {
        self.locale
            .clone()
            .or_else(|| {
                LOCALE_VARS
                    .iter()
                    .find_map(|key| lookup(key).filter(|value| !value.is_empty()))
            })
            .map_or_else(Locale::default, |tag| Locale::from_tag(&tag))
    }

    /// Builds every configured project.
    ///
    /// A project with an invalid definition is logged and left out; the rest
    /// are still registered.
    pub fn build_registry(&self) -> Registry {
        let mut registry = Registry::default();
        for config in &self.projects {
            match config.build() {
                Ok(project) => {
                    let key = project.key().to_string();
                    if !registry.insert(project) {
                        tracing::warn!(project = %config.name, %key, "skipping duplicate project");
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        project = %config.name,
                        error = %err,
                        "skipping project with invalid configuration"
                    );
                }
            }
        }
        tracing::debug!(projects = registry.len(), "registered projects");
        registry
    }
}

/// Returns the platform-specific config directory for maxify.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("maxify"))
}

/// Returns the platform-specific data directory for maxify.
///
/// On Linux: `~/.local/share/maxify`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("maxify"))
}

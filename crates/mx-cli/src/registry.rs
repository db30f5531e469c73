//! The set of projects loaded from configuration.

use anyhow::{Result, anyhow};
use mx_core::Project;

/// Configured projects in declaration order.
#[derive(Debug, Default)]
pub struct Registry {
    projects: Vec<Project>,
}

impl Registry {
    /// Adds a project unless its name or key collides with one already
    /// registered. Returns whether it was added.
    pub fn insert(&mut self, project: Project) -> bool {
        let collides = self.projects.iter().any(|existing| {
            [existing.name(), existing.key()]
                .iter()
                .any(|taken| *taken == project.name() || *taken == project.key())
        });
        if collides {
            return false;
        }
        self.projects.push(project);
        true
    }

    /// Looks a project up by name or nickname.
    pub fn find(&self, name: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|project| project.name() == name || project.nickname() == Some(name))
    }

    /// Like [`Registry::find`], failing with a user-facing message.
    pub fn require(&self, name: &str) -> Result<&Project> {
        self.find(name)
            .ok_or_else(|| anyhow!("No project found named '{name}'"))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, nickname: Option<&str>) -> Project {
        let project = Project::new(name, "").unwrap();
        match nickname {
            Some(nickname) => project.with_nickname(nickname),
            None => project,
        }
    }

    #[test]
    fn find_matches_name_or_nickname() {
        let mut registry = Registry::default();
        assert!(registry.insert(project("NEP", Some("nep"))));
        assert!(registry.insert(project("maxify", None)));

        assert_eq!(registry.find("NEP").unwrap().name(), "NEP");
        assert_eq!(registry.find("nep").unwrap().name(), "NEP");
        assert_eq!(registry.find("maxify").unwrap().name(), "maxify");
        assert!(registry.find("Nep").is_none());
    }

    #[test]
    fn insert_rejects_colliding_keys() {
        let mut registry = Registry::default();
        assert!(registry.insert(project("NEP", Some("nep"))));
        assert!(!registry.insert(project("nep", None)));
        assert!(!registry.insert(project("Other", Some("NEP"))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn require_reports_missing_project() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        let err = registry.require("ghost").unwrap_err();
        assert_eq!(err.to_string(), "No project found named 'ghost'");
    }
}

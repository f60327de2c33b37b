//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Settings blob file, `.json`, `.yaml` or `.yml` (default: ./accord-settings.json).
    pub settings_path: PathBuf,

    /// Static site fixture used in place of live platforms.
    pub fixture_path: Option<PathBuf>,

    /// Site-level override of the user profile base slug.
    pub user_base_slug: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let settings_path = lookup("ACCORD_SETTINGS_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./accord-settings.json"));

        let fixture_path = lookup("ACCORD_FIXTURE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let user_base_slug = match lookup("ACCORD_USER_BASE_SLUG") {
            Some(slug) => {
                let trimmed = slug.trim().trim_matches('/');
                if trimmed.is_empty() {
                    None
                } else if trimmed.contains('/') {
                    bail!("ACCORD_USER_BASE_SLUG must be a single path segment, got '{slug}'");
                } else {
                    Some(trimmed.to_string())
                }
            }
            None => None,
        };

        Ok(Self {
            settings_path,
            fixture_path,
            user_base_slug,
        })
    }

    /// The fixture path, required by commands that compose menus.
    pub fn require_fixture(&self) -> Result<&PathBuf> {
        self.fixture_path
            .as_ref()
            .context("ACCORD_FIXTURE_PATH (or --fixture) is required for this command")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.settings_path, PathBuf::from("./accord-settings.json"));
        assert_eq!(config.fixture_path, None);
        assert_eq!(config.user_base_slug, None);
        assert!(config.require_fixture().is_err());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("ACCORD_SETTINGS_PATH", "/etc/accord/settings.yaml"),
            ("ACCORD_FIXTURE_PATH", "site.yml"),
            ("ACCORD_USER_BASE_SLUG", "/members/"),
        ])
        .unwrap();
        assert_eq!(config.settings_path, PathBuf::from("/etc/accord/settings.yaml"));
        assert_eq!(config.require_fixture().unwrap(), &PathBuf::from("site.yml"));
        assert_eq!(config.user_base_slug.as_deref(), Some("members"));
    }

    #[test]
    fn nested_slug_is_rejected() {
        let err = config(&[("ACCORD_USER_BASE_SLUG", "a/b")]).unwrap_err();
        assert!(err.to_string().contains("single path segment"));
    }
}

// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file looked up in the project root.
pub const CONFIG_FILE: &str = "loveweb.json";

pub const DEFAULT_REPOSITORY: &str = "https://github.com/Davidobot/love.js.git";

/// Settings for one web build.
///
/// Every field has a default, so `loveweb.json` only needs to list what differs.
/// Relative paths are taken relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub archive: PathBuf,
    pub toolchain_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File name of the entry document inside `output_dir`.
    pub entry_html: String,
    pub repository: String,
    /// Interpreter the resolved love.js entry point is run with.
    pub runner: String,
    pub title: String,
    pub loading_subtext: String,
    pub description: String,
    pub theme_color: String,
    /// Maximum number of toolchain directory entries shown when no entry point is found.
    pub listing_limit: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::from("dist/MontessoriColorTheory.love"),
            toolchain_dir: PathBuf::from("love.js"),
            output_dir: PathBuf::from("web-build"),
            entry_html: "index.html".to_owned(),
            repository: DEFAULT_REPOSITORY.to_owned(),
            runner: "node".to_owned(),
            title: "Montessori Color Theory".to_owned(),
            loading_subtext: "Please wait...".to_owned(),
            description: "Interactive educational application for exploring color theory \
                through hands-on color mixing. Learn about additive (RGB), subtractive (CYM), \
                and traditional paint (RYB) color mixing."
                .to_owned(),
            theme_color: "#667eea".to_owned(),
            listing_limit: 30,
        }
    }
}

/// Absolute locations derived from a [`BuildConfig`] and a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    pub project_root: PathBuf,
    pub archive: PathBuf,
    pub toolchain_dir: PathBuf,
    pub output_dir: PathBuf,
    pub entry_html: PathBuf,
}

impl BuildConfig {
    /// Loads `loveweb.json` from `project_root`, falling back to defaults when it is absent.
    pub async fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_FILE);
        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        if !exists {
            log::debug!("No {CONFIG_FILE} in {}, using defaults", project_root.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded build settings from {}", path.display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn resolve(&self, project_root: &Path) -> BuildPaths {
        let output_dir = project_root.join(&self.output_dir);
        BuildPaths {
            project_root: project_root.to_path_buf(),
            archive: project_root.join(&self.archive),
            toolchain_dir: project_root.join(&self.toolchain_dir),
            entry_html: output_dir.join(&self.entry_html),
            output_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial_keeps_defaults() {
        let config =
            BuildConfig::from_json(r#"{ "title": "Bouncy", "runner": "python3" }"#).unwrap();
        assert_eq!(config.title, "Bouncy");
        assert_eq!(config.runner, "python3");
        assert_eq!(config.output_dir, PathBuf::from("web-build"));
        assert_eq!(config.listing_limit, 30);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        assert!(BuildConfig::from_json(r#"{ "titel": "typo" }"#).is_err());
    }

    #[test]
    fn test_resolve_joins_relative_and_keeps_absolute() {
        let config = BuildConfig {
            toolchain_dir: PathBuf::from("/opt/love.js"),
            ..BuildConfig::default()
        };
        let paths = config.resolve(Path::new("/work/game"));
        assert_eq!(
            paths.archive,
            PathBuf::from("/work/game/dist/MontessoriColorTheory.love")
        );
        assert_eq!(paths.toolchain_dir, PathBuf::from("/opt/love.js"));
        assert_eq!(
            paths.entry_html,
            PathBuf::from("/work/game/web-build/index.html")
        );
    }

    #[tokio::test]
    async fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig::load(dir.path()).await.unwrap();
        assert_eq!(config, BuildConfig::default());
    }

    #[tokio::test]
    async fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = BuildConfig::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

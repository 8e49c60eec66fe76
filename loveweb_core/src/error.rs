// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use std::path::PathBuf;
use std::process::ExitStatus;

/// Failure to load `loveweb.json`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fatal errors of the build stage. Any of these ends the run with exit status 1.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not determine the project directory: {0}")]
    ProjectRoot(#[source] std::io::Error),

    #[error("{} not found!", .0.display())]
    MissingArchive(PathBuf),

    #[error("could not check {}: {source}", .path.display())]
    Inspect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not run git to download love.js: {source}")]
    CloneSpawn {
        repository: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git clone of {repository} failed ({status})")]
    CloneFailed {
        repository: String,
        status: ExitStatus,
    },

    #[error(
        "could not find love.js CLI file.\nSearched in:\n{}{}",
        bullet_paths(.searched),
        directory_listing(.listing.as_deref())
    )]
    EntryPointNotFound {
        searched: Vec<PathBuf>,
        /// `None` when the toolchain directory could not be read.
        listing: Option<Vec<String>>,
    },

    #[error("could not create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not start `{runner}`: {source}")]
    CompileSpawn {
        runner: String,
        #[source]
        source: std::io::Error,
    },

    #[error("love.js exited unsuccessfully ({status})")]
    CompileFailed { status: ExitStatus },
}

impl BuildError {
    /// Hint lines to print after the diagnostic, if any.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Self::MissingArchive(_) => {
                vec!["Please ensure the .love file exists in dist/ directory.".to_owned()]
            }
            Self::CloneSpawn { repository, .. } | Self::CloneFailed { repository, .. } => vec![
                "Please ensure git is installed and try again.".to_owned(),
                "Alternatively, manually download love.js from:".to_owned(),
                format!("  {repository}"),
            ],
            Self::CompileSpawn { runner, .. } => {
                vec![format!("Please ensure `{runner}` is installed and on PATH.")]
            }
            _ => Vec::new(),
        }
    }
}

/// Failure while rewriting the entry HTML document.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn bullet_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn directory_listing(listing: Option<&[String]>) -> String {
    match listing {
        Some(entries) => {
            let mut out = String::from("\n\nlove.js directory contents:");
            for entry in entries {
                out.push_str("\n  - ");
                out.push_str(entry);
            }
            out
        }
        None => "\n\nCould not read love.js directory".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_point_not_found_lists_every_candidate() {
        let err = BuildError::EntryPointNotFound {
            searched: vec![PathBuf::from("a/love.js"), PathBuf::from("a/index.js")],
            listing: Some(vec!["README.md".to_owned(), "src".to_owned()]),
        };
        let message = err.to_string();
        assert!(message.contains("  - a/love.js"));
        assert!(message.contains("  - a/index.js"));
        assert!(message.contains("directory contents:\n  - README.md\n  - src"));
    }

    #[test]
    fn test_entry_point_not_found_unreadable_directory() {
        let err = BuildError::EntryPointNotFound {
            searched: vec![PathBuf::from("x/love.js")],
            listing: None,
        };
        assert!(err.to_string().ends_with("Could not read love.js directory"));
    }

    #[test]
    fn test_remediation_mentions_repository() {
        let err = BuildError::CloneSpawn {
            repository: "https://example.invalid/love.js.git".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let hints = err.remediation();
        assert!(hints.iter().any(|h| h.contains("https://example.invalid/love.js.git")));
    }
}

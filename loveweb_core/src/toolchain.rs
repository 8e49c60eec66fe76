// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Fetching love.js and locating its command line entry point.

use crate::error::BuildError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Places the love.js CLI has lived across releases, relative to the toolchain directory.
///
/// Searched in order; the first existing file wins.
pub const ENTRY_POINT_CANDIDATES: [&str; 6] = [
    "love.js",
    "compile.js",
    "tools/compile.js",
    "bin/love.js",
    "compile",
    "index.js",
];

/// How the toolchain directory came to be available for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    Present,
    Cloned,
}

/// Makes sure `dir` holds a copy of love.js.
///
/// An existing directory is trusted as-is, whatever its contents. Otherwise a shallow
/// clone of the default branch of `repository` is made, with git's output passed
/// straight through to the terminal. A failed or interrupted clone is left in place.
pub async fn acquire_toolchain(
    dir: &Path,
    repository: &str,
    working_dir: &Path,
) -> Result<Acquisition, BuildError> {
    let present = tokio::fs::try_exists(dir)
        .await
        .map_err(|source| BuildError::Inspect {
            path: dir.to_path_buf(),
            source,
        })?;
    if present {
        log::debug!("love.js already present at {}", dir.display());
        return Ok(Acquisition::Present);
    }

    log::info!("love.js not found. Downloading...");
    log::info!("This may take a few minutes...");
    log::info!("Cloning love.js from {repository}");

    let status = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(repository)
        .arg(dir)
        .current_dir(working_dir)
        .status()
        .await
        .map_err(|source| BuildError::CloneSpawn {
            repository: repository.to_owned(),
            source,
        })?;

    if !status.success() {
        return Err(BuildError::CloneFailed {
            repository: repository.to_owned(),
            status,
        });
    }

    log::info!("love.js downloaded successfully!");
    Ok(Acquisition::Cloned)
}

/// Returns the first of [`ENTRY_POINT_CANDIDATES`] that exists under `dir`.
pub async fn resolve_entry_point(dir: &Path, listing_limit: usize) -> Result<PathBuf, BuildError> {
    let searched: Vec<PathBuf> = ENTRY_POINT_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .collect();

    for path in &searched {
        if tokio::fs::metadata(path)
            .await
            .is_ok_and(|metadata| metadata.is_file())
        {
            log::info!("Found love.js CLI at: {}", path.display());
            return Ok(path.clone());
        }
    }

    Err(BuildError::EntryPointNotFound {
        searched,
        listing: list_directory(dir, listing_limit).await,
    })
}

/// Sorted entry names of `dir`, at most `limit` of them. `None` if it can't be read.
async fn list_directory(dir: &Path, limit: usize) -> Option<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    let mut names = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => names.push(entry.file_name().to_string_lossy().into_owned()),
            Ok(None) => break,
            Err(e) => {
                log::debug!("Stopped listing {} early: {e}", dir.display());
                break;
            }
        }
    }
    names.sort();
    names.truncate(limit);
    Some(names)
}

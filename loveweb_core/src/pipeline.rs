// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::compile::CompileCommand;
use crate::config::{BuildConfig, BuildPaths};
use crate::error::{BuildError, PatchError};
use crate::patch::{PatchAssets, PatchOutcome, optimize_file};
use crate::toolchain::{Acquisition, acquire_toolchain, resolve_entry_point};
use std::path::{Path, PathBuf};

/// What a successful build did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub acquisition: Acquisition,
    pub entry_point: PathBuf,
    pub output_dir: PathBuf,
    /// `None` when the optimisation pass failed; that failure is only a warning.
    pub patch: Option<PatchOutcome>,
}

/// Compiles the game archive to a web build, then optimises the generated page.
///
/// Nothing is written to disk before the archive has been found.
pub async fn build_web(config: &BuildConfig, project_root: &Path) -> Result<BuildReport, BuildError> {
    let paths = config.resolve(project_root);

    let archive_exists = tokio::fs::try_exists(&paths.archive)
        .await
        .map_err(|source| BuildError::Inspect {
            path: paths.archive.clone(),
            source,
        })?;
    if !archive_exists {
        return Err(BuildError::MissingArchive(paths.archive));
    }

    let acquisition =
        acquire_toolchain(&paths.toolchain_dir, &config.repository, &paths.project_root).await?;
    let entry_point = resolve_entry_point(&paths.toolchain_dir, config.listing_limit).await?;

    tokio::fs::create_dir_all(&paths.output_dir)
        .await
        .map_err(|source| BuildError::OutputDir {
            path: paths.output_dir.clone(),
            source,
        })?;

    log::info!("Compiling .love file to web format...");
    log::info!("Input: {}", paths.archive.display());
    log::info!("Output: {}", paths.output_dir.display());

    CompileCommand::new(
        &config.runner,
        &entry_point,
        &paths.archive,
        &paths.output_dir,
        &config.title,
        &paths.toolchain_dir,
    )
    .run()
    .await?;

    log::info!("Optimizing web build...");
    let patch = match optimize(config, &paths).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            log::warn!("Could not run optimization: {e}");
            None
        }
    };

    Ok(BuildReport {
        acquisition,
        entry_point,
        output_dir: paths.output_dir,
        patch,
    })
}

/// Runs only the optimisation pass over an existing web build.
pub async fn optimize_web_build(
    config: &BuildConfig,
    project_root: &Path,
) -> Result<PatchOutcome, PatchError> {
    optimize(config, &config.resolve(project_root)).await
}

async fn optimize(config: &BuildConfig, paths: &BuildPaths) -> Result<PatchOutcome, PatchError> {
    optimize_file(&paths.entry_html, &PatchAssets::from_config(config)).await
}

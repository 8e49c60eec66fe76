// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Builds the game for the web with love.js and optimises the resulting page.
//! Run from the project root; settings come from `loveweb.json` if present.
use loveweb_core::config::BuildConfig;
use loveweb_core::error::BuildError;
use loveweb_core::pipeline::build_web;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = simple_logger::init_with_level(log::Level::Info) {
        use std::io::Write as _;
        #[expect(clippy::let_underscore_must_use)]
        let _ = writeln!(std::io::stderr(), "Error setting up logging: {e}");
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error: {e}");
            for hint in e.remediation() {
                log::error!("{hint}");
            }
            log::error!("Build failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), BuildError> {
    let project_root = std::env::current_dir().map_err(BuildError::ProjectRoot)?;
    let config = BuildConfig::load(&project_root).await?;

    log::info!("Building {} for web...", config.title);

    let report = build_web(&config, &project_root).await?;

    log::info!("Build completed successfully!");
    log::info!("Web build is available in: {}", report.output_dir.display());
    Ok(())
}

// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Adds the loading screen and meta tags to an existing web build's entry page.
//! A missing page is not an error: it just means no web build has been produced yet.
use loveweb_core::config::BuildConfig;
use loveweb_core::pipeline::optimize_web_build;
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
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let project_root = std::env::current_dir()?;
    let config = BuildConfig::load(&project_root).await?;
    optimize_web_build(&config, &project_root).await?;
    Ok(())
}

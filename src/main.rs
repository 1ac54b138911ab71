//! ClipReel
//!
//! Compiles the clips listed in a manifest, wrapped by an intro and an outro,
//! into one browser-playable MP4.
//!
//! # Usage
//!
//! ```bash
//! clipreel compile --manifest data/downloaded_clip_paths.json
//! clipreel plan --json
//! clipreel check
//! clipreel init-config --path clipreel.toml
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use clipreel_cli::cli::{commands, Cli, Commands};
use clipreel_cli::error::PipelineError;

/// Main entry point for the ClipReel application
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = cli.logging().init() {
        eprintln!("{:#}", e);
    }
    info!(version = env!("CARGO_PKG_VERSION"), "Starting ClipReel");

    let config_file = cli.config.as_deref();
    let result = match cli.command {
        Commands::Compile(args) => commands::compile(config_file, args).await,
        Commands::Plan(args) => commands::plan(config_file, args),
        Commands::Check(args) => commands::check(config_file, args).await,
        Commands::InitConfig(args) => commands::init_config(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

/// Print the diagnostic for a failed command, with engine output when present
fn report_failure(err: &anyhow::Error) {
    error!(error = %format!("{:#}", err), "Command failed");
    eprintln!("Error: {:#}", err);
    if let Some(stderr) = err
        .downcast_ref::<PipelineError>()
        .and_then(PipelineError::engine_stderr)
        .filter(|stderr| !stderr.is_empty())
    {
        eprintln!("Engine output:\n{}", stderr);
    }
}

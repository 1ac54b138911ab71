//! CLI module for ClipReel
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

pub mod args;
pub mod commands;

/// ClipReel
///
/// Assembles the clips listed in a manifest, wrapped by an intro and an outro,
/// into one browser-playable MP4.
#[derive(Parser, Debug)]
#[command(name = "clipreel")]
#[command(about = "ClipReel - Compile short clips into one video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: clipreel.toml or config/clipreel.toml)
    #[arg(long, env = "CLIPREEL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "info", env = "CLIPREEL_LOG_LEVEL", global = true)]
    pub log_level: LogLevel,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "compact", env = "CLIPREEL_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize every input and concatenate them into the output file
    Compile(args::CompileArgs),
    /// Show what a compile would do without running the engine
    Plan(args::PlanArgs),
    /// Verify the transcoding engine can be started
    Check(args::CheckArgs),
    /// Write the default configuration file
    InitConfig(args::InitConfigArgs),
}

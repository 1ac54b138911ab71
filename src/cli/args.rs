//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

/// Upper bound for `--jobs`
pub const MAX_JOBS: usize = 64;

fn parse_jobs(s: &str) -> Result<usize, String> {
    number_range(s, 1, MAX_JOBS)
}

fn parse_max_clips(s: &str) -> Result<usize, String> {
    number_range(s, 1, usize::MAX)
}

fn parse_crf(s: &str) -> Result<u8, String> {
    number_range(s, 0, 51)
}

/// Path, limit and engine overrides shared by `compile` and `plan`
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Clip manifest (JSON, or YAML by extension)
    #[arg(long, env = "CLIPREEL_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Intro asset
    #[arg(long, env = "CLIPREEL_INTRO")]
    pub intro: Option<PathBuf>,

    /// Outro asset
    #[arg(long, env = "CLIPREEL_OUTRO")]
    pub outro: Option<PathBuf>,

    /// Scratch directory, purged on every run
    #[arg(long, env = "CLIPREEL_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Compiled output file
    #[arg(short, long, env = "CLIPREEL_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Concurrent normalization workers
    #[arg(short, long, env = "CLIPREEL_JOBS", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Maximum number of manifest clips to include
    #[arg(long, env = "CLIPREEL_MAX_CLIPS", value_parser = parse_max_clips)]
    pub max_clips: Option<usize>,

    /// Engine binary
    #[arg(long, env = "CLIPREEL_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// Constant Rate Factor (0-51)
    #[arg(long, env = "CLIPREEL_CRF", value_parser = parse_crf)]
    pub crf: Option<u8>,

    /// Encoding preset
    #[arg(long, env = "CLIPREEL_PRESET")]
    pub preset: Option<String>,
}

/// Arguments for the compile command
#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the plan command
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Engine binary
    #[arg(long, env = "CLIPREEL_FFMPEG")]
    pub ffmpeg: Option<String>,
}

/// Arguments for the init-config command
#[derive(Args, Debug, Clone)]
pub struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(long, default_value = "clipreel.toml")]
    pub path: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_parsers() {
        assert_eq!(parse_jobs("4").unwrap(), 4);
        assert!(parse_jobs("0").is_err());
        assert!(parse_jobs("65").is_err());
        assert_eq!(parse_crf("51").unwrap(), 51);
        assert!(parse_crf("52").is_err());
        assert!(parse_max_clips("0").is_err());
    }
}

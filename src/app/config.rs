//! Pipeline configuration value
//!
//! Every path and encoding constant the controller uses lives here so that
//! independent runs (and tests) can each carry their own.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::rules::MAX_TOTAL_CLIPS;
use crate::engine::EncodingProfile;
use crate::error::{PipelineError, PipelineResult};
use crate::utils::path::is_within;

/// Full configuration for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub encoding: EncodingProfile,
    pub pipeline: RunConfig,
}

/// Input, scratch and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Clip manifest (JSON or YAML)
    pub manifest: PathBuf,
    /// Intro bookend asset
    pub intro: PathBuf,
    /// Outro bookend asset
    pub outro: PathBuf,
    /// Scratch directory, purged at the start of every run
    pub workspace: PathBuf,
    /// Canonical output file
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("data").join("downloaded_clip_paths.json"),
            intro: PathBuf::from("assets").join("intro.mp4"),
            outro: PathBuf::from("assets").join("outro.mp4"),
            workspace: PathBuf::from("data").join("concat_prep"),
            output: PathBuf::from("output").join("compiled_video.mp4"),
        }
    }
}

/// Run limits and engine selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Maximum number of manifest clips per compilation
    pub max_clips: usize,
    /// Concurrent normalization workers
    pub jobs: usize,
    /// Process exit code when there is nothing to compile
    pub noop_exit_code: u8,
    /// Engine binary name or path
    pub ffmpeg: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_clips: MAX_TOTAL_CLIPS,
            jobs: default_jobs(),
            noop_exit_code: 0,
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

/// Default worker count: a quarter of the CPUs, between 1 and 4.
///
/// Each x264 encode is itself multi-threaded.
pub fn default_jobs() -> usize {
    (num_cpus::get() / 4).clamp(1, 4)
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> PipelineResult<()> {
        if self.pipeline.max_clips == 0 {
            return Err(config_error("pipeline.max_clips must be at least 1"));
        }
        if self.pipeline.jobs == 0 {
            return Err(config_error("pipeline.jobs must be at least 1"));
        }
        if self.pipeline.ffmpeg.trim().is_empty() {
            return Err(config_error("pipeline.ffmpeg must not be empty"));
        }
        self.encoding.validate().map_err(|message| PipelineError::Config { message })?;

        let paths = &self.paths;
        for (name, path) in [
            ("manifest", &paths.manifest),
            ("intro", &paths.intro),
            ("outro", &paths.outro),
            ("workspace", &paths.workspace),
            ("output", &paths.output),
        ] {
            if path.as_os_str().is_empty() {
                return Err(config_error(&format!("paths.{} must not be empty", name)));
            }
        }

        // the workspace is purged on every run
        for (name, path) in [
            ("manifest", &paths.manifest),
            ("intro", &paths.intro),
            ("outro", &paths.outro),
            ("output", &paths.output),
        ] {
            let inside = is_within(path, &paths.workspace).map_err(|e| PipelineError::Config {
                message: format!("cannot resolve paths.{}: {}", name, e),
            })?;
            if inside {
                return Err(config_error(&format!(
                    "paths.{} ({}) lies inside the workspace {}",
                    name,
                    path.display(),
                    paths.workspace.display()
                )));
            }
        }
        Ok(())
    }
}

fn config_error(message: &str) -> PipelineError {
    PipelineError::Config {
        message: message.to_string(),
    }
}

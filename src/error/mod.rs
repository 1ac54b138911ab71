//! Error handling module for ClipReel

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which fixed input a pre-flight check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    Intro,
    Outro,
    Manifest,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRole::Intro => write!(f, "intro asset"),
            InputRole::Outro => write!(f, "outro asset"),
            InputRole::Manifest => write!(f, "clip manifest"),
        }
    }
}

/// Errors raised while loading the clip manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("Clip manifest not found: {path}")]
    Missing { path: PathBuf },

    /// Manifest parsed to zero records
    #[error("Clip manifest is empty: {path}")]
    Empty { path: PathBuf },

    /// Every record was filtered out
    #[error("Clip manifest has no valid clips ({total} records rejected): {path}")]
    NoValidClips { path: PathBuf, total: usize },

    /// Manifest could not be read
    #[error("Failed to read clip manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not a valid record sequence
    #[error("Failed to parse clip manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ManifestError {
    /// Whether this condition means "nothing to do" rather than a failure
    pub fn is_noop(&self) -> bool {
        matches!(self, ManifestError::Empty { .. } | ManifestError::NoValidClips { .. })
    }
}

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Intro, outro or manifest absent
    #[error("Missing {role}: {path}")]
    InputMissing { role: InputRole, path: PathBuf },

    /// Manifest loading failed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration is invalid
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Scratch workspace could not be prepared
    #[error("Failed to prepare workspace {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transcoding engine could not be started
    #[error("Failed to start {program}: {source}")]
    EngineUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Normalizing one input exited unsuccessfully
    #[error("Normalization failed for {path} ({status})")]
    TranscodeFailed {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    /// Playlist artifact could not be written
    #[error("Failed to write sequence file {path}: {source}")]
    SequenceWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stream-copy concatenation exited unsuccessfully
    #[error("Concatenation failed ({status})")]
    ConcatFailed { status: String, stderr: String },

    /// Finished output could not be moved into place
    #[error("Failed to write output file {path}: {source}")]
    OutputPromotion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A normalization worker panicked, was cancelled or misreported
    #[error("Normalization worker failed: {message}")]
    Worker { message: String },
}

impl PipelineError {
    /// Captured engine diagnostics, if the error came from an engine run
    pub fn engine_stderr(&self) -> Option<&str> {
        match self {
            PipelineError::TranscodeFailed { stderr, .. }
            | PipelineError::ConcatFailed { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

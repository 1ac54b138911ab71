//! ClipReel Library
//!
//! Normalizes a manifest of short clips plus an intro and an outro to one
//! canonical H.264/AAC profile, then stream-copies them into a single
//! progressive-download MP4.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod output;
pub mod ports;
pub mod utils;
pub mod workspace;

// Re-export commonly used types
pub use app::{CompileInteractor, PipelineConfig};
pub use domain::model::{ClipDescriptor, CompilePlan, NoOpReason, PipelineState, RunOutcome};
pub use error::{ManifestError, PipelineError, PipelineResult};
pub use ports::ExecutePort;

// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One source clip as listed in the manifest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipDescriptor {
    pub source_path: PathBuf,
    pub duration: f64,
    pub display_title: Option<String>,
}

impl ClipDescriptor {
    /// Create a new clip descriptor
    pub fn new(source_path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            source_path: source_path.into(),
            duration,
            display_title: None,
        }
    }

    /// Attach a display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.display_title = Some(title.into());
        self
    }

    /// Only clips with a path and a positive duration take part in assembly
    pub fn is_eligible(&self) -> bool {
        !self.source_path.as_os_str().is_empty() && self.duration > 0.0
    }
}

/// What a normalized artifact was produced from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactSource {
    Intro,
    Clip {
        /// 1-based position in the manifest selection
        position: usize,
        descriptor: ClipDescriptor,
    },
    Outro,
}

impl ArtifactSource {
    /// Short human-readable label used in logs
    pub fn label(&self) -> String {
        match self {
            ArtifactSource::Intro => "intro".to_string(),
            ArtifactSource::Clip { position, .. } => format!("clip {}", position),
            ArtifactSource::Outro => "outro".to_string(),
        }
    }

    pub fn is_bookend(&self) -> bool {
        !matches!(self, ArtifactSource::Clip { .. })
    }
}

/// One unit of normalization work: transcode `input_path` into `scratch_path`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeJob {
    pub source: ArtifactSource,
    pub input_path: PathBuf,
    pub scratch_path: PathBuf,
}

impl NormalizeJob {
    pub fn new(source: ArtifactSource, input_path: PathBuf, scratch_path: PathBuf) -> Self {
        Self {
            source,
            input_path,
            scratch_path,
        }
    }

    /// Artifact this job produces once the engine succeeds
    pub fn into_artifact(self) -> NormalizedArtifact {
        NormalizedArtifact {
            source: self.source,
            scratch_path: self.scratch_path,
        }
    }
}

/// A canonical-profile copy of one input, owned by the workspace
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedArtifact {
    pub source: ArtifactSource,
    pub scratch_path: PathBuf,
}

/// Normalized artifacts grouped by role
#[derive(Debug, Clone)]
pub struct NormalizedSet {
    pub intro: NormalizedArtifact,
    pub clips: Vec<NormalizedArtifact>,
    pub outro: NormalizedArtifact,
}

impl NormalizedSet {
    /// Group artifacts given in job order: intro, clips..., outro.
    ///
    /// Returns `None` when the bookends are not at the ends.
    pub fn from_ordered(mut artifacts: Vec<NormalizedArtifact>) -> Option<Self> {
        if artifacts.len() < 2 {
            return None;
        }
        let outro = artifacts.pop()?;
        let intro = artifacts.remove(0);
        if intro.source != ArtifactSource::Intro || outro.source != ArtifactSource::Outro {
            return None;
        }
        if artifacts.iter().any(|a| a.source.is_bookend()) {
            return None;
        }
        Some(Self {
            intro,
            clips: artifacts,
            outro,
        })
    }
}

/// Final playback order: intro, clips in manifest order, outro
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    entries: Vec<PathBuf>,
}

impl Sequence {
    pub fn from_set(set: &NormalizedSet) -> Self {
        let mut entries = Vec::with_capacity(set.clips.len() + 2);
        entries.push(set.intro.scratch_path.clone());
        entries.extend(set.clips.iter().map(|clip| clip.scratch_path.clone()));
        entries.push(set.outro.scratch_path.clone());
        Self { entries }
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of clips between the bookends
    pub fn clip_count(&self) -> usize {
        self.entries.len().saturating_sub(2)
    }
}

/// Everything a run needs to know before touching the workspace
#[derive(Debug, Clone, Serialize)]
pub struct CompilePlan {
    /// Normalization work in sequence order
    pub jobs: Vec<NormalizeJob>,
    pub playlist_path: PathBuf,
    pub output_path: PathBuf,
    /// Manifest records dropped by the eligibility filter
    pub rejected: usize,
    /// Eligible records dropped by the clip cap
    pub truncated: usize,
}

impl CompilePlan {
    pub fn clip_count(&self) -> usize {
        self.jobs.iter().filter(|job| !job.source.is_bookend()).count()
    }

    pub fn total_clip_duration(&self) -> f64 {
        self.jobs
            .iter()
            .filter_map(|job| match &job.source {
                ArtifactSource::Clip { descriptor, .. } => Some(descriptor.duration),
                _ => None,
            })
            .sum()
    }
}

/// Pipeline controller states
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    ValidatingInputs,
    PreparingWorkspace,
    Normalizing,
    Sequencing,
    Concatenating,
    Done,
    Failed(String),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::ValidatingInputs => write!(f, "validating inputs"),
            PipelineState::PreparingWorkspace => write!(f, "preparing workspace"),
            PipelineState::Normalizing => write!(f, "normalizing"),
            PipelineState::Sequencing => write!(f, "sequencing"),
            PipelineState::Concatenating => write!(f, "concatenating"),
            PipelineState::Done => write!(f, "done"),
            PipelineState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Why a run ended without producing output
#[derive(Debug, Clone, PartialEq)]
pub enum NoOpReason {
    ManifestEmpty,
    NoValidClips { rejected: usize },
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOpReason::ManifestEmpty => write!(f, "manifest has no clips"),
            NoOpReason::NoValidClips { rejected } => {
                write!(f, "no valid clips ({} rejected)", rejected)
            }
        }
    }
}

/// Result of a successful compile
#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub output_path: PathBuf,
    pub clip_count: usize,
    pub sequence: Sequence,
    pub workspace: PathBuf,
}

/// How a pipeline run ended, when it did not fail
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Compiled(CompileSummary),
    NothingToCompile(NoOpReason),
}

#[cfg(test)]
mod tests;

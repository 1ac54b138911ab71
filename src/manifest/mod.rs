//! Clip manifest loading
//!
//! The manifest is a persisted, already-ranked list of clip records. It is
//! JSON by default; `.yaml`/`.yml` files are read as YAML.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::model::ClipDescriptor;
use crate::domain::rules::{select_clips, ClipSelection};
use crate::error::ManifestError;

/// One raw manifest record; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct ManifestRecord {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default, alias = "display_title")]
    title: Option<String>,
}

impl From<ManifestRecord> for ClipDescriptor {
    fn from(record: ManifestRecord) -> Self {
        let descriptor = ClipDescriptor::new(
            record.path.unwrap_or_default(),
            record.duration.unwrap_or(0.0),
        );
        match record.title {
            Some(title) if !title.trim().is_empty() => descriptor.with_title(title),
            _ => descriptor,
        }
    }
}

/// Serialization format of a manifest file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// Pick the format from the file extension
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Json,
        }
    }
}

/// Loads and filters the clip manifest
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    path: PathBuf,
    max_clips: usize,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>, max_clips: usize) -> Self {
        Self {
            path: path.into(),
            max_clips,
        }
    }

    /// Read every record, unfiltered, in file order
    pub fn read_descriptors(&self) -> Result<Vec<ClipDescriptor>, ManifestError> {
        if !self.path.exists() {
            return Err(ManifestError::Missing {
                path: self.path.clone(),
            });
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| ManifestError::Read {
            path: self.path.clone(),
            source,
        })?;

        let records = self.parse(&content)?;
        if records.is_empty() {
            return Err(ManifestError::Empty {
                path: self.path.clone(),
            });
        }
        Ok(records.into_iter().map(ClipDescriptor::from).collect())
    }

    /// Read, filter and cap the manifest.
    ///
    /// Fails with `ManifestError::NoValidClips` when filtering leaves nothing.
    pub fn load(&self) -> Result<ClipSelection, ManifestError> {
        let descriptors = self.read_descriptors()?;
        let total = descriptors.len();
        let selection = select_clips(descriptors, self.max_clips);

        if selection.clips.is_empty() {
            return Err(ManifestError::NoValidClips {
                path: self.path.clone(),
                total,
            });
        }
        if selection.rejected > 0 {
            warn!(
                rejected = selection.rejected,
                "Skipped manifest records without a path or with a non-positive duration"
            );
        }
        if selection.truncated > 0 {
            info!(
                dropped = selection.truncated,
                max_clips = self.max_clips,
                "Clip cap reached, trailing clips dropped"
            );
        }
        info!(
            manifest = %self.path.display(),
            records = total,
            selected = selection.clips.len(),
            "Manifest loaded"
        );
        Ok(selection)
    }

    fn parse(&self, content: &str) -> Result<Vec<ManifestRecord>, ManifestError> {
        // a blank file is an empty manifest, not a syntax error
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let parsed = match ManifestFormat::detect(&self.path) {
            ManifestFormat::Json => {
                serde_json::from_str::<Vec<ManifestRecord>>(content).map_err(|e| e.to_string())
            }
            ManifestFormat::Yaml => serde_yaml::from_str::<Option<Vec<ManifestRecord>>>(content)
                .map(Option::unwrap_or_default)
                .map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| ManifestError::Parse {
            path: self.path.clone(),
            message,
        })
    }
}

//! Scratch workspace for one pipeline run
//!
//! Holds the normalized artifacts, the demuxer playlist and the run report.
//! A run purges it before starting and leaves it in place afterwards.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::model::ClipDescriptor;
use crate::domain::rules::{prefix_width, sanitize_stem};
use crate::error::{PipelineError, PipelineResult};
use crate::utils::path::absolutize;

/// Demuxer playlist file name
pub const PLAYLIST_FILE: &str = "clips_list.txt";

/// Run report file name
pub const REPORT_FILE: &str = "run_report.json";

/// Extension of every normalized artifact
const ARTIFACT_EXTENSION: &str = "mp4";

/// Scratch directory handle
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a handle; the directory is not touched until `prepare`
    pub fn new(root: &Path) -> PipelineResult<Self> {
        let root = absolutize(root).map_err(|source| PipelineError::Workspace {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Purge any previous contents and recreate the directory.
    ///
    /// Returns the number of stale files removed.
    pub fn prepare(&self) -> PipelineResult<usize> {
        let stale = self.purge().map_err(|source| self.io_error(source))?;
        fs::create_dir_all(&self.root).map_err(|source| self.io_error(source))?;
        info!(
            workspace = %self.root.display(),
            purged = stale,
            "Workspace prepared"
        );
        Ok(stale)
    }

    fn purge(&self) -> io::Result<usize> {
        if !self.root.exists() {
            return Ok(0);
        }
        let stale = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .count();
        debug!(workspace = %self.root.display(), files = stale, "Purging workspace");
        fs::remove_dir_all(&self.root)?;
        Ok(stale)
    }

    /// Scratch naming for a run with `clip_count` clips
    pub fn layout(&self, clip_count: usize) -> ScratchLayout {
        ScratchLayout {
            root: self.root.clone(),
            width: prefix_width(clip_count),
            clip_count,
        }
    }

    pub fn playlist_path(&self) -> PathBuf {
        self.root.join(PLAYLIST_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    /// Every file currently in the workspace, sorted by name
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }

    fn io_error(&self, source: io::Error) -> PipelineError {
        PipelineError::Workspace {
            path: self.root.clone(),
            source,
        }
    }
}

/// Numbered scratch names whose lexical order equals playback order
#[derive(Debug, Clone)]
pub struct ScratchLayout {
    root: PathBuf,
    width: usize,
    clip_count: usize,
}

impl ScratchLayout {
    pub fn intro_path(&self) -> PathBuf {
        self.numbered(0, "intro")
    }

    /// Scratch path for the clip at 1-based `position`
    pub fn clip_path(&self, position: usize, clip: &ClipDescriptor) -> PathBuf {
        let stem = clip
            .source_path
            .file_stem()
            .map(|stem| sanitize_stem(&stem.to_string_lossy()))
            .unwrap_or_else(|| "clip".to_string());
        self.numbered(position, &stem)
    }

    pub fn outro_path(&self) -> PathBuf {
        self.numbered(self.clip_count + 1, "outro")
    }

    fn numbered(&self, index: usize, stem: &str) -> PathBuf {
        self.root.join(format!(
            "{:0width$}_{}.{}",
            index,
            stem,
            ARTIFACT_EXTENSION,
            width = self.width
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_directory() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(&dir.path().join("prep")).unwrap();
        let purged = workspace.prepare().unwrap();
        assert_eq!(purged, 0);
        assert!(workspace.root().is_dir());
        assert!(workspace.files().is_empty());
    }

    #[test]
    fn test_prepare_purges_previous_contents() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("prep");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("001_old.mp4"), b"stale").unwrap();
        fs::write(root.join("nested").join("junk.txt"), b"stale").unwrap();

        let workspace = Workspace::new(&root).unwrap();
        let purged = workspace.prepare().unwrap();
        assert_eq!(purged, 2);
        assert!(root.is_dir());
        assert!(workspace.files().is_empty());
    }

    #[test]
    fn test_layout_names_preserve_order() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(dir.path()).unwrap();
        let layout = workspace.layout(2);

        let first = ClipDescriptor::new("clips/zeta.mov", 4.0);
        let second = ClipDescriptor::new("other/alpha clip.mp4", 4.0);
        let names: Vec<String> = [
            layout.intro_path(),
            layout.clip_path(1, &first),
            layout.clip_path(2, &second),
            layout.outro_path(),
        ]
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

        assert_eq!(
            names,
            vec!["000_intro.mp4", "001_zeta.mp4", "002_alpha_clip.mp4", "003_outro.mp4"]
        );
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);
    }

    #[test]
    fn test_layout_duplicate_basenames_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let layout = Workspace::new(dir.path()).unwrap().layout(2);
        let a = ClipDescriptor::new("day1/clip.mp4", 1.0);
        let b = ClipDescriptor::new("day2/clip.mp4", 1.0);
        assert_ne!(layout.clip_path(1, &a), layout.clip_path(2, &b));
    }

    #[test]
    fn test_layout_widens_prefix_for_large_runs() {
        let dir = TempDir::new().unwrap();
        let layout = Workspace::new(dir.path()).unwrap().layout(1200);
        assert!(layout.intro_path().ends_with("0000_intro.mp4"));
        assert!(layout.outro_path().ends_with("1201_outro.mp4"));
    }

    #[test]
    fn test_paths_are_absolute() {
        let workspace = Workspace::new(Path::new("data/concat_prep")).unwrap();
        assert!(workspace.root().is_absolute());
        assert!(workspace.playlist_path().ends_with("data/concat_prep/clips_list.txt"));
        assert!(workspace.report_path().ends_with("data/concat_prep/run_report.json"));
    }

    #[test]
    fn test_root_has_no_dot_segments() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::new(&dir.path().join("data").join("..").join("prep")).unwrap();
        assert_eq!(workspace.root(), dir.path().join("prep"));

        workspace.prepare().unwrap();
        assert!(dir.path().join("prep").is_dir());
        assert!(!dir.path().join("data").exists());
    }
}

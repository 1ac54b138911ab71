//! Atomic output placement
//!
//! The engine writes into a staging file next to the canonical output. Only a
//! committed stage replaces the canonical file; a dropped stage is deleted and
//! leaves the previous output untouched.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::utils::format_file_size;

/// Mode of a freshly compiled output; staging files are created owner-only
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// Writer for the canonical output file
#[derive(Debug, Clone)]
pub struct OutputWriter {
    target: PathBuf,
}

impl OutputWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Reserve a staging file in the output directory
    pub fn stage(&self) -> PipelineResult<StagedOutput> {
        let dir = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| self.error(source))?;

        let name = self
            .target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", name))
            .suffix(".partial")
            .tempfile_in(&dir)
            .map_err(|source| self.error(source))?
            .into_temp_path();
        #[cfg(unix)]
        fs::set_permissions(&temp, self.output_permissions()).map_err(|source| self.error(source))?;

        Ok(StagedOutput {
            temp,
            target: self.target.clone(),
        })
    }

    /// Mode the promoted output gets: the previous output's, else world-readable
    #[cfg(unix)]
    fn output_permissions(&self) -> fs::Permissions {
        use std::os::unix::fs::PermissionsExt;

        fs::metadata(&self.target)
            .map(|meta| meta.permissions())
            .unwrap_or_else(|_| fs::Permissions::from_mode(OUTPUT_MODE))
    }

    fn error(&self, source: std::io::Error) -> PipelineError {
        PipelineError::OutputPromotion {
            path: self.target.clone(),
            source,
        }
    }
}

/// A staging file that becomes the canonical output on `commit`
#[derive(Debug)]
pub struct StagedOutput {
    temp: TempPath,
    target: PathBuf,
}

impl StagedOutput {
    /// Path the engine should write to
    pub fn path(&self) -> &Path {
        &self.temp
    }

    /// Atomically replace the canonical output; returns its size in bytes
    pub fn commit(self) -> PipelineResult<u64> {
        let target = self.target;
        self.temp
            .persist(&target)
            .map_err(|err| PipelineError::OutputPromotion {
                path: target.clone(),
                source: err.error,
            })?;
        let size = fs::metadata(&target)
            .map(|meta| meta.len())
            .map_err(|source| PipelineError::OutputPromotion {
                path: target.clone(),
                source,
            })?;
        info!(
            output = %target.display(),
            size = %format_file_size(size),
            "Output written"
        );
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_replaces_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out").join("compiled.mp4");
        let writer = OutputWriter::new(&target);

        let staged = writer.stage().unwrap();
        assert!(staged.path().starts_with(dir.path().join("out")));
        fs::write(staged.path(), b"new video").unwrap();
        let size = staged.commit().unwrap();

        assert_eq!(size, 9);
        assert_eq!(fs::read(&target).unwrap(), b"new video");
    }

    #[test]
    fn test_dropped_stage_leaves_previous_output() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("compiled.mp4");
        fs::write(&target, b"previous").unwrap();

        let staged = OutputWriter::new(&target).stage().unwrap();
        let staging_path = staged.path().to_path_buf();
        fs::write(&staging_path, b"half-written").unwrap();
        drop(staged);

        assert!(!staging_path.exists());
        assert_eq!(fs::read(&target).unwrap(), b"previous");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("compiled.mp4");

        let staged = OutputWriter::new(&target).stage().unwrap();
        // the engine truncates the stage in place, keeping its mode
        fs::write(staged.path(), b"video").unwrap();
        staged.commit().unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_output_keeps_previous_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("compiled.mp4");
        fs::write(&target, b"previous").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        let staged = OutputWriter::new(&target).stage().unwrap();
        fs::write(staged.path(), b"video").unwrap();
        staged.commit().unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(fs::read(&target).unwrap(), b"video");
    }
}

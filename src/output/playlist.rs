//! Concat-demuxer playlist rendering

use std::fs;
use std::path::Path;

use tracing::info;

use crate::domain::model::Sequence;
use crate::error::{PipelineError, PipelineResult};
use crate::utils::path::quote_concat_path;

/// Render one `file '<absolute-path>'` line per sequence entry
pub fn render_playlist(sequence: &Sequence) -> String {
    let mut playlist = String::new();
    for entry in sequence.entries() {
        playlist.push_str("file ");
        playlist.push_str(&quote_concat_path(entry));
        playlist.push('\n');
    }
    playlist
}

/// Write the playlist for `sequence` to `path`
pub fn write_playlist(sequence: &Sequence, path: &Path) -> PipelineResult<()> {
    let to_error = |source| PipelineError::SequenceWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, render_playlist(sequence)).map_err(to_error)?;
    info!(
        stage = "sequence",
        playlist = %path.display(),
        entries = sequence.len(),
        "Sequence written"
    );
    Ok(())
}

//! Stream-copy concatenation over a demuxer playlist

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::engine::COMMON_FLAGS;

/// Concat-demuxer invocation; no re-encoding takes place
#[derive(Debug, Clone)]
pub struct ConcatCommand {
    playlist: PathBuf,
    output: PathBuf,
}

impl ConcatCommand {
    pub fn new(playlist: &Path, output: &Path) -> Self {
        Self {
            playlist: playlist.to_path_buf(),
            output: output.to_path_buf(),
        }
    }

    /// Engine arguments, without the program name.
    ///
    /// The muxer is forced to mp4 because the output may be a staging file
    /// whose extension says nothing about the format.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = COMMON_FLAGS.iter().copied().map(OsString::from).collect();
        args.extend(["-f", "concat", "-safe", "0", "-i"].map(OsString::from));
        args.push(self.playlist.clone().into_os_string());
        args.extend(["-c", "copy", "-movflags", "+faststart", "-f", "mp4"].map(OsString::from));
        args.push(self.output.clone().into_os_string());
        args
    }
}

//! FFmpeg execution adapter
//!
//! Drives the `ffmpeg` command-line tool as a child process.

use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error};

use crate::engine::{ConcatCommand, EncodingProfile, NormalizeCommand};
use crate::error::{PipelineError, PipelineResult};
use crate::ports::ExecutePort;

/// Lines of engine stderr kept for diagnostics
const STDERR_TAIL_LINES: usize = 20;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FFmpegAdapter {
    program: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter for the given binary name or path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the engine to completion, capturing its output
    async fn run(&self, args: Vec<OsString>) -> PipelineResult<Output> {
        debug!(
            program = %self.program,
            args = %render_args(&args),
            "Invoking engine"
        );
        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| PipelineError::EngineUnavailable {
                program: self.program.clone(),
                source,
            })
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl ExecutePort for FFmpegAdapter {
    async fn normalize(
        &self,
        input: &Path,
        output: &Path,
        profile: &EncodingProfile,
    ) -> PipelineResult<()> {
        let command = NormalizeCommand::new(input, output, profile);
        let result = self.run(command.args()).await?;
        if result.status.success() {
            return Ok(());
        }

        let stderr = stderr_tail(&result.stderr);
        error!(
            input = %input.display(),
            status = %describe_status(result.status),
            stderr = %stderr,
            "Engine failed while normalizing"
        );
        Err(PipelineError::TranscodeFailed {
            path: input.to_path_buf(),
            status: describe_status(result.status),
            stderr,
        })
    }

    async fn concat(&self, playlist: &Path, output: &Path) -> PipelineResult<()> {
        let command = ConcatCommand::new(playlist, output);
        let result = self.run(command.args()).await?;
        if result.status.success() {
            return Ok(());
        }

        let stderr = stderr_tail(&result.stderr);
        error!(
            playlist = %playlist.display(),
            status = %describe_status(result.status),
            stderr = %stderr,
            "Engine failed while concatenating"
        );
        Err(PipelineError::ConcatFailed {
            status: describe_status(result.status),
            stderr,
        })
    }

    async fn version(&self) -> PipelineResult<String> {
        let result = self.run(vec![OsString::from("-version")]).await?;
        let stdout = String::from_utf8_lossy(&result.stdout);
        let banner = stdout.lines().next().unwrap_or_default().trim().to_string();
        if !result.status.success() || banner.is_empty() {
            return Err(PipelineError::EngineUnavailable {
                program: self.program.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("-version returned {}", describe_status(result.status)),
                ),
            });
        }
        Ok(banner)
    }
}

/// Human-readable exit status
pub fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Last lines of captured stderr
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let text: String = (1..=30).map(|i| format!("line {}\n\n", i)).collect();
        let tail = stderr_tail(text.as_bytes());
        let lines: Vec<&str> = tail.lines().collect();
        assert_eq!(lines.len(), STDERR_TAIL_LINES);
        assert_eq!(lines.first(), Some(&"line 11"));
        assert_eq!(lines.last(), Some(&"line 30"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_unavailable() {
        let adapter = FFmpegAdapter::new("clipreel-no-such-engine");
        let err = adapter
            .normalize(
                Path::new("in.mp4"),
                Path::new("out.mp4"),
                &EncodingProfile::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EngineUnavailable { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_transcode_failure() {
        let adapter = FFmpegAdapter::new("false");
        let err = adapter
            .normalize(
                Path::new("clips/a.mp4"),
                Path::new("out.mp4"),
                &EncodingProfile::default(),
            )
            .await
            .unwrap_err();
        match err {
            PipelineError::TranscodeFailed { path, status, .. } => {
                assert_eq!(path, PathBuf::from("clips/a.mp4"));
                assert_eq!(status, "exit code 1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_concat_is_concat_failure() {
        let adapter = FFmpegAdapter::new("false");
        let err = adapter
            .concat(Path::new("list.txt"), Path::new("out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ConcatFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let adapter = FFmpegAdapter::new("true");
        adapter
            .concat(Path::new("list.txt"), Path::new("out.mp4"))
            .await
            .expect("true exits zero");
    }
}

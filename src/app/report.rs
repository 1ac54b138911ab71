//! Run state tracking and the diagnostic run report

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::model::PipelineState;
use crate::error::PipelineError;

/// Persisted summary of one run, written into the workspace
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Every state entered, in order
    pub states: Vec<PipelineState>,
    pub clip_count: usize,
    pub sequence: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

/// Drives and records controller state transitions
#[derive(Debug)]
pub struct RunTracker {
    state: PipelineState,
    report: RunReport,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            report: RunReport {
                started_at: Utc::now(),
                finished_at: None,
                states: vec![PipelineState::Idle],
                clip_count: 0,
                sequence: Vec::new(),
                output: None,
                error: None,
            },
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Enter `next`; terminal states are final
    pub fn transition(&mut self, next: PipelineState) {
        if self.state.is_terminal() {
            warn!(from = %self.state, to = %next, "Ignoring transition out of a terminal state");
            return;
        }
        debug!(from = %self.state, to = %next, "State transition");
        if !next.is_terminal() {
            info!(stage = %next, "Entering stage");
        }
        if next.is_terminal() {
            self.report.finished_at = Some(Utc::now());
        }
        self.state = next.clone();
        self.report.states.push(next);
    }

    /// Enter `Failed` with the error's diagnostic
    pub fn fail(&mut self, err: &PipelineError) {
        self.report.error = Some(err.to_string());
        self.transition(PipelineState::Failed(format!("{} during {}", err, self.state)));
    }

    pub fn record_clip_count(&mut self, clip_count: usize) {
        self.report.clip_count = clip_count;
    }

    pub fn record_sequence(&mut self, sequence: &[PathBuf]) {
        self.report.sequence = sequence.to_vec();
    }

    pub fn record_output(&mut self, output: &Path) {
        self.report.output = Some(output.to_path_buf());
    }

    /// Write the report as pretty JSON
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(&self.report)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_transitions_are_recorded() {
        let mut tracker = RunTracker::new();
        tracker.transition(PipelineState::ValidatingInputs);
        tracker.transition(PipelineState::PreparingWorkspace);
        tracker.transition(PipelineState::Done);

        assert_eq!(tracker.state(), &PipelineState::Done);
        assert_eq!(tracker.report().states.len(), 4);
        assert!(tracker.report().finished_at.is_some());
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut tracker = RunTracker::new();
        tracker.transition(PipelineState::Normalizing);
        tracker.fail(&PipelineError::Worker {
            message: "boom".to_string(),
        });
        tracker.transition(PipelineState::Sequencing);

        match tracker.state() {
            PipelineState::Failed(reason) => {
                assert!(reason.contains("boom"));
                assert!(reason.ends_with("during normalizing"));
            }
            other => panic!("unexpected state {other}"),
        }
        assert_eq!(
            tracker.report().error.as_deref(),
            Some("Normalization worker failed: boom")
        );
    }

    #[test]
    fn test_report_written_as_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run_report.json");
        let mut tracker = RunTracker::new();
        tracker.record_clip_count(3);
        tracker.transition(PipelineState::Done);
        tracker.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["clip_count"], 3);
        assert_eq!(value["states"][0]["state"], "idle");
        assert_eq!(value["states"][1]["state"], "done");
    }
}

// Compile interactor - Orchestrates the clip compilation use case

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::app::config::PipelineConfig;
use crate::app::report::RunTracker;
use crate::domain::model::*;
use crate::engine::progress::{NormalizeProgress, ProgressCallback};
use crate::error::{InputRole, ManifestError, PipelineError, PipelineResult};
use crate::manifest::ManifestLoader;
use crate::output::{write_playlist, OutputWriter};
use crate::ports::ExecutePort;
use crate::utils::format_duration;
use crate::workspace::Workspace;

type WorkerResult = PipelineResult<(usize, NormalizedArtifact)>;

/// Interactor for the compile use case
pub struct CompileInteractor {
    execute_port: Arc<dyn ExecutePort>,
    config: Arc<PipelineConfig>,
    callbacks: Vec<Arc<dyn ProgressCallback>>,
}

impl CompileInteractor {
    /// Create new compile interactor with an injected engine port
    pub fn new(execute_port: Arc<dyn ExecutePort>, config: Arc<PipelineConfig>) -> Self {
        Self {
            execute_port,
            config,
            callbacks: Vec::new(),
        }
    }

    /// Receive per-input normalization progress
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Validate inputs and load the manifest without touching the workspace.
    ///
    /// Empty and all-invalid manifests surface as `PipelineError::Manifest`
    /// with a no-op `ManifestError`.
    pub fn plan(&self) -> PipelineResult<CompilePlan> {
        let workspace = Workspace::new(&self.config.paths.workspace)?;
        self.build_plan(&workspace)
    }

    /// Run the whole pipeline once
    pub async fn run(&self) -> PipelineResult<RunOutcome> {
        let started = Instant::now();
        let mut tracker = RunTracker::new();
        tracker.transition(PipelineState::ValidatingInputs);

        let planned = Workspace::new(&self.config.paths.workspace)
            .and_then(|workspace| Ok((self.build_plan(&workspace)?, workspace)));
        let (plan, workspace) = match planned {
            Ok(planned) => planned,
            Err(PipelineError::Manifest(err)) if err.is_noop() => {
                let reason = noop_reason(&err);
                info!(reason = %reason, "Nothing to compile");
                return Ok(RunOutcome::NothingToCompile(reason));
            }
            Err(err) => {
                tracker.fail(&err);
                error!(stage = "validate", error = %err, "Pre-flight checks failed");
                return Err(err);
            }
        };
        tracker.record_clip_count(plan.clip_count());

        tracker.transition(PipelineState::PreparingWorkspace);
        if let Err(err) = workspace.prepare() {
            tracker.fail(&err);
            error!(stage = "workspace", error = %err, "Workspace preparation failed");
            return Err(err);
        }

        let result = self.execute_plan(plan, &workspace, &mut tracker).await;
        match &result {
            Ok(summary) => {
                tracker.transition(PipelineState::Done);
                info!(
                    output = %summary.output_path.display(),
                    clips = summary.clip_count,
                    elapsed = %format_duration(started.elapsed()),
                    "Compilation finished"
                );
            }
            Err(err) => {
                tracker.fail(err);
                error!(state = %tracker.state(), "Compilation failed");
            }
        }
        write_report(&tracker, &workspace);
        result.map(RunOutcome::Compiled)
    }

    fn build_plan(&self, workspace: &Workspace) -> PipelineResult<CompilePlan> {
        self.config.validate()?;
        self.validate_inputs()?;

        let paths = &self.config.paths;
        let selection = ManifestLoader::new(&paths.manifest, self.config.pipeline.max_clips).load()?;
        let layout = workspace.layout(selection.clips.len());

        let mut jobs = Vec::with_capacity(selection.clips.len() + 2);
        jobs.push(NormalizeJob::new(
            ArtifactSource::Intro,
            paths.intro.clone(),
            layout.intro_path(),
        ));
        for (offset, descriptor) in selection.clips.into_iter().enumerate() {
            let position = offset + 1;
            let scratch = layout.clip_path(position, &descriptor);
            let input = descriptor.source_path.clone();
            jobs.push(NormalizeJob::new(
                ArtifactSource::Clip {
                    position,
                    descriptor,
                },
                input,
                scratch,
            ));
        }
        jobs.push(NormalizeJob::new(
            ArtifactSource::Outro,
            paths.outro.clone(),
            layout.outro_path(),
        ));

        Ok(CompilePlan {
            jobs,
            playlist_path: workspace.playlist_path(),
            output_path: paths.output.clone(),
            rejected: selection.rejected,
            truncated: selection.truncated,
        })
    }

    fn validate_inputs(&self) -> PipelineResult<()> {
        let paths = &self.config.paths;
        for (role, path) in [
            (InputRole::Intro, &paths.intro),
            (InputRole::Outro, &paths.outro),
            (InputRole::Manifest, &paths.manifest),
        ] {
            if !path.exists() {
                return Err(PipelineError::InputMissing {
                    role,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    async fn execute_plan(
        &self,
        plan: CompilePlan,
        workspace: &Workspace,
        tracker: &mut RunTracker,
    ) -> PipelineResult<CompileSummary> {
        tracker.transition(PipelineState::Normalizing);
        let artifacts = self.normalize_all(plan.jobs).await?;

        tracker.transition(PipelineState::Sequencing);
        let set = NormalizedSet::from_ordered(artifacts).ok_or_else(|| PipelineError::Worker {
            message: "normalized artifacts are out of sequence order".to_string(),
        })?;
        let sequence = Sequence::from_set(&set);
        write_playlist(&sequence, &plan.playlist_path)?;
        tracker.record_sequence(sequence.entries());

        tracker.transition(PipelineState::Concatenating);
        let staged = OutputWriter::new(&plan.output_path).stage()?;
        info!(
            stage = "concat",
            entries = sequence.len(),
            playlist = %plan.playlist_path.display(),
            "Concatenating"
        );
        self.execute_port
            .concat(&plan.playlist_path, staged.path())
            .await?;
        staged.commit()?;
        tracker.record_output(&plan.output_path);

        Ok(CompileSummary {
            output_path: plan.output_path,
            clip_count: sequence.clip_count(),
            sequence,
            workspace: workspace.root().to_path_buf(),
        })
    }

    /// Normalize every job on a bounded pool; results come back in job order.
    ///
    /// At most `jobs` workers are in flight and jobs start in order. A worker
    /// counts as finished only once it has been joined, so no job starts after
    /// a failure has been observed. The first failure aborts the workers still
    /// running.
    async fn normalize_all(&self, jobs: Vec<NormalizeJob>) -> PipelineResult<Vec<NormalizedArtifact>> {
        let clip_total = jobs.iter().filter(|job| !job.source.is_bookend()).count();
        let progress = Arc::new(NormalizeProgress::new(clip_total));
        for callback in &self.callbacks {
            progress.add_callback(Arc::clone(callback));
        }

        let workers = self.config.pipeline.jobs.max(1);
        let profile = Arc::new(self.config.encoding.clone());
        let failed = Arc::new(AtomicBool::new(false));
        debug!(stage = "normalize", workers, inputs = jobs.len(), "Starting worker pool");

        let mut slots: Vec<Option<NormalizedArtifact>> = vec![None; jobs.len()];
        let mut set: JoinSet<WorkerResult> = JoinSet::new();

        for (index, job) in jobs.into_iter().enumerate() {
            // wait for a free slot, or for the failed worker to surface
            while set.len() >= workers || (failed.load(Ordering::SeqCst) && !set.is_empty()) {
                if let Some(joined) = set.join_next().await {
                    if let Err(err) = collect(joined, &mut slots) {
                        set.shutdown().await;
                        return Err(err);
                    }
                }
            }

            let port = Arc::clone(&self.execute_port);
            let progress = Arc::clone(&progress);
            let profile = Arc::clone(&profile);
            let failed = Arc::clone(&failed);
            set.spawn(async move {
                progress.start(&job.source);
                debug!(
                    stage = "normalize",
                    source = %job.input_path.display(),
                    scratch = %job.scratch_path.display(),
                    "Normalizing {}",
                    job.source.label()
                );
                if let Err(err) = port
                    .normalize(&job.input_path, &job.scratch_path, &profile)
                    .await
                {
                    failed.store(true, Ordering::SeqCst);
                    return Err(err);
                }
                progress.complete(&job.source);
                Ok((index, job.into_artifact()))
            });
        }

        while let Some(joined) = set.join_next().await {
            if let Err(err) = collect(joined, &mut slots) {
                set.shutdown().await;
                return Err(err);
            }
        }

        info!(
            stage = "normalize",
            inputs = progress.completed(),
            elapsed = %format_duration(progress.elapsed()),
            "Normalization finished"
        );
        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| PipelineError::Worker {
                message: "a normalization worker did not report a result".to_string(),
            })
    }
}

fn collect(
    joined: Result<WorkerResult, JoinError>,
    slots: &mut [Option<NormalizedArtifact>],
) -> PipelineResult<()> {
    let (index, artifact) = joined.map_err(|e| PipelineError::Worker {
        message: e.to_string(),
    })??;
    match slots.get_mut(index) {
        Some(slot) => {
            *slot = Some(artifact);
            Ok(())
        }
        None => Err(PipelineError::Worker {
            message: format!("worker reported unknown job index {}", index),
        }),
    }
}

fn noop_reason(err: &ManifestError) -> NoOpReason {
    match err {
        ManifestError::NoValidClips { total, .. } => NoOpReason::NoValidClips { rejected: *total },
        _ => NoOpReason::ManifestEmpty,
    }
}

fn write_report(tracker: &RunTracker, workspace: &Workspace) {
    let path = workspace.report_path();
    match tracker.write(&path) {
        Ok(()) => debug!(report = %path.display(), "Run report written"),
        Err(e) => warn!(report = %path.display(), error = %e, "Failed to write run report"),
    }
}

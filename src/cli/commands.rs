//! Command implementations
//!
//! Each command returns the process exit code for a run that did not fail.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::TomlConfigAdapter;
use crate::app::config::PipelineConfig;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::cli::args::{CheckArgs, CompileArgs, InitConfigArgs, PlanArgs};
use crate::config_initialization::resolve_configuration;
use crate::domain::model::{ArtifactSource, CompilePlan, RunOutcome};
use crate::error::PipelineError;
use crate::utils::format_duration;

/// Execute the compile command
pub async fn compile(config_file: Option<&Path>, args: CompileArgs) -> Result<u8> {
    let config = resolve_configuration(config_file, &args.pipeline)
        .context("Failed to resolve configuration")?;
    let noop_exit_code = config.pipeline.noop_exit_code;
    let container = DefaultAppContainer::new(config);

    match container.compile_interactor().run().await? {
        RunOutcome::Compiled(summary) => {
            println!("{}", summary.output_path.display());
            Ok(0)
        }
        RunOutcome::NothingToCompile(reason) => {
            warn!(
                reason = %reason,
                exit_code = noop_exit_code,
                "Nothing to compile, no output written"
            );
            Ok(noop_exit_code)
        }
    }
}

/// Execute the plan command
pub fn plan(config_file: Option<&Path>, args: PlanArgs) -> Result<u8> {
    let config = resolve_configuration(config_file, &args.pipeline)
        .context("Failed to resolve configuration")?;
    let noop_exit_code = config.pipeline.noop_exit_code;
    let container = DefaultAppContainer::new(config);

    match container.compile_interactor().plan() {
        Ok(plan) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", render_plan(&plan));
            }
            Ok(0)
        }
        Err(PipelineError::Manifest(err)) if err.is_noop() => {
            warn!(reason = %err, "Nothing to compile");
            if args.json {
                println!("{}", serde_json::json!({ "nothing_to_compile": err.to_string() }));
            } else {
                println!("Nothing to compile: {}", err);
            }
            Ok(noop_exit_code)
        }
        Err(err) => Err(err.into()),
    }
}

/// Execute the check command
pub async fn check(config_file: Option<&Path>, args: CheckArgs) -> Result<u8> {
    let mut config = TomlConfigAdapter::new().load_or_default(config_file)?;
    if let Some(ffmpeg) = args.ffmpeg {
        config.pipeline.ffmpeg = ffmpeg;
    }
    let program = config.pipeline.ffmpeg.clone();
    let container = DefaultAppContainer::new(config);

    let banner = container
        .execute_port()
        .version()
        .await
        .with_context(|| format!("Engine check failed for '{}'", program))?;
    info!(engine = %program, "Engine available");
    println!("{}", banner);
    Ok(0)
}

/// Execute the init-config command
pub fn init_config(args: InitConfigArgs) -> Result<u8> {
    TomlConfigAdapter::new().save(&PipelineConfig::default(), &args.path, args.force)?;
    println!("Wrote {}", args.path.display());
    Ok(0)
}

/// Human-readable plan listing
pub fn render_plan(plan: &CompilePlan) -> String {
    let mut out = format!(
        "{} clips, {} of footage ({} rejected, {} over the cap)\n",
        plan.clip_count(),
        format_duration(Duration::from_secs_f64(plan.total_clip_duration().max(0.0))),
        plan.rejected,
        plan.truncated
    );
    for job in &plan.jobs {
        let title = match &job.source {
            ArtifactSource::Clip { descriptor, .. } => descriptor
                .display_title
                .as_deref()
                .map(|t| format!(" \"{}\"", t))
                .unwrap_or_default(),
            _ => String::new(),
        };
        out.push_str(&format!(
            "  {:<9}{} {} -> {}\n",
            job.source.label(),
            title,
            job.input_path.display(),
            job.scratch_path.display()
        ));
    }
    out.push_str(&format!("  playlist {}\n", plan.playlist_path.display()));
    out.push_str(&format!("  output   {}\n", plan.output_path.display()));
    out
}

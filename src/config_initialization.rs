//! Configuration initialization and hierarchy management

use std::path::Path;

use tracing::{debug, info};

use crate::adapters::toml_config::TomlConfigAdapter;
use crate::app::config::PipelineConfig;
use crate::cli::args::PipelineArgs;
use crate::error::PipelineResult;

/// Resolve configuration following precedence: CLI > Env > File > Defaults.
///
/// Environment variables reach us through clap, so they arrive in `overrides`
/// together with the flags.
pub fn resolve_configuration(
    config_file: Option<&Path>,
    overrides: &PipelineArgs,
) -> PipelineResult<PipelineConfig> {
    resolve_with(&TomlConfigAdapter::new(), config_file, overrides)
}

/// Same as [`resolve_configuration`] with an explicit file adapter
pub fn resolve_with(
    adapter: &TomlConfigAdapter,
    config_file: Option<&Path>,
    overrides: &PipelineArgs,
) -> PipelineResult<PipelineConfig> {
    let mut config = adapter.load_or_default(config_file)?;
    apply_overrides(&mut config, overrides);
    config.validate()?;
    info!(
        manifest = %config.paths.manifest.display(),
        workspace = %config.paths.workspace.display(),
        output = %config.paths.output.display(),
        jobs = config.pipeline.jobs,
        "Configuration resolved"
    );
    Ok(config)
}

/// Apply command-line and environment overrides on top of `config`
pub fn apply_overrides(config: &mut PipelineConfig, overrides: &PipelineArgs) {
    let paths = &mut config.paths;
    if let Some(manifest) = &overrides.manifest {
        paths.manifest = manifest.clone();
    }
    if let Some(intro) = &overrides.intro {
        paths.intro = intro.clone();
    }
    if let Some(outro) = &overrides.outro {
        paths.outro = outro.clone();
    }
    if let Some(workspace) = &overrides.workspace {
        paths.workspace = workspace.clone();
    }
    if let Some(output) = &overrides.output {
        paths.output = output.clone();
    }

    let pipeline = &mut config.pipeline;
    if let Some(jobs) = overrides.jobs {
        pipeline.jobs = jobs;
    }
    if let Some(max_clips) = overrides.max_clips {
        pipeline.max_clips = max_clips;
    }
    if let Some(ffmpeg) = &overrides.ffmpeg {
        pipeline.ffmpeg = ffmpeg.clone();
    }

    if let Some(crf) = overrides.crf {
        config.encoding.crf = crf;
    }
    if let Some(preset) = &overrides.preset {
        config.encoding.preset = preset.clone();
    }
    debug!(?overrides, "Applied overrides");
}

// TOML config adapter - Configuration files for the pipeline

use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};

/// Default locations searched when no `--config` is given
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["clipreel.toml", "config/clipreel.toml"];

/// TOML configuration adapter
#[derive(Debug, Clone)]
pub struct TomlConfigAdapter {
    search_paths: Vec<PathBuf>,
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter searching the default locations
    pub fn new() -> Self {
        Self {
            search_paths: DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the search locations
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// First existing file among the search locations
    pub fn discover(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|path| path.is_file()).cloned()
    }

    /// Load the explicit file if given, else a discovered one, else defaults
    pub fn load_or_default(&self, explicit: Option<&Path>) -> PipelineResult<PipelineConfig> {
        match explicit {
            Some(path) => self.load(path),
            None => match self.discover() {
                Some(path) => self.load(&path),
                None => {
                    info!("No config file found, using defaults");
                    Ok(PipelineConfig::default())
                }
            },
        }
    }

    /// Load configuration from a TOML file
    pub fn load(&self, path: &Path) -> PipelineResult<PipelineConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
            message: format!("failed to read config file {}: {}", path.display(), e),
        })?;
        let config = Self::parse(&content).map_err(|message| PipelineError::Config {
            message: format!("{}: {}", path.display(), message),
        })?;
        info!(config = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn parse(content: &str) -> Result<PipelineConfig, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Serialize configuration to TOML text
    pub fn render(config: &PipelineConfig) -> PipelineResult<String> {
        toml::to_string_pretty(config).map_err(|e| PipelineError::Config {
            message: format!("failed to serialize config: {}", e),
        })
    }

    /// Write configuration to `path`, refusing to replace a file unless `force`
    pub fn save(&self, config: &PipelineConfig, path: &Path, force: bool) -> PipelineResult<()> {
        if path.exists() && !force {
            return Err(PipelineError::Config {
                message: format!("{} already exists (use --force to overwrite)", path.display()),
            });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::Config {
                message: format!("failed to create config directory: {}", e),
            })?;
        }
        let content = Self::render(config)?;
        std::fs::write(path, content).map_err(|e| PipelineError::Config {
            message: format!("failed to write config file {}: {}", path.display(), e),
        })?;
        info!(config = %path.display(), "Wrote configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [paths]
            intro = "brand/intro.mp4"

            [encoding]
            crf = 20

            [pipeline]
            jobs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.paths.intro, PathBuf::from("brand/intro.mp4"));
        assert_eq!(config.paths.outro, PathBuf::from("assets").join("outro.mp4"));
        assert_eq!(config.encoding.crf, 20);
        assert_eq!(config.encoding.preset, "veryfast");
        assert_eq!(config.pipeline.jobs, 3);
        assert_eq!(config.pipeline.max_clips, 35);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = TomlConfigAdapter::parse("[encoding]\ncrff = 20\n").unwrap_err();
        assert!(err.contains("crff"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config").join("clipreel.toml");
        let adapter = TomlConfigAdapter::new();

        let mut config = PipelineConfig::default();
        config.pipeline.max_clips = 12;
        adapter.save(&config, &path, false).unwrap();
        assert_eq!(adapter.load(&path).unwrap(), config);

        let err = adapter.save(&config, &path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        adapter.save(&config, &path, true).unwrap();
    }

    #[test]
    fn test_discovery_and_fallback() {
        let dir = TempDir::new().unwrap();
        let candidate = dir.path().join("clipreel.toml");
        let adapter =
            TomlConfigAdapter::new().with_search_paths(vec![dir.path().join("missing.toml"), candidate.clone()]);

        assert!(adapter.discover().is_none());
        assert_eq!(adapter.load_or_default(None).unwrap(), PipelineConfig::default());

        std::fs::write(&candidate, "[pipeline]\nmax_clips = 5\n").unwrap();
        assert_eq!(adapter.discover(), Some(candidate));
        assert_eq!(adapter.load_or_default(None).unwrap().pipeline.max_clips, 5);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let adapter = TomlConfigAdapter::new();
        let err = adapter
            .load_or_default(Some(&dir.path().join("absent.toml")))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
    }
}

use std::sync::Arc;

use crate::adapters::FFmpegAdapter;
use crate::app::compile_interactor::CompileInteractor;
use crate::app::config::PipelineConfig;
use crate::ports::ExecutePort;

pub trait AppContainer: Send + Sync {
    fn compile_interactor(&self) -> Arc<CompileInteractor>;
    fn execute_port(&self) -> Arc<dyn ExecutePort>;
}

pub struct DefaultAppContainer {
    execute_port: Arc<dyn ExecutePort>,
    compile_interactor: Arc<CompileInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: PipelineConfig) -> Self {
        let execute_port: Arc<dyn ExecutePort> =
            Arc::new(FFmpegAdapter::new(config.pipeline.ffmpeg.clone()));
        Self::with_execute_port(config, execute_port)
    }

    /// Wire the interactors around a caller-supplied engine
    pub fn with_execute_port(config: PipelineConfig, execute_port: Arc<dyn ExecutePort>) -> Self {
        let compile_interactor = Arc::new(CompileInteractor::new(
            Arc::clone(&execute_port),
            Arc::new(config),
        ));

        Self {
            execute_port,
            compile_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn compile_interactor(&self) -> Arc<CompileInteractor> {
        Arc::clone(&self.compile_interactor)
    }

    fn execute_port(&self) -> Arc<dyn ExecutePort> {
        Arc::clone(&self.execute_port)
    }
}

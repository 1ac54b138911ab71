// Application layer - Use case interactors

pub mod compile_interactor;
pub mod config;
pub mod container;
pub mod report;

// Re-export interactors
pub use compile_interactor::CompileInteractor;
pub use config::PipelineConfig;
pub use container::{AppContainer, DefaultAppContainer};
pub use report::{RunReport, RunTracker};

// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::engine::EncodingProfile;
use crate::error::PipelineResult;

/// Port for transcoding engine invocations.
///
/// Every call blocks its task until the engine exits. Implementations never
/// retry: a failed invocation is reported as-is.
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Re-encode `input` into `output` using `profile`.
    ///
    /// Fails with `PipelineError::TranscodeFailed` on a non-zero exit.
    async fn normalize(
        &self,
        input: &Path,
        output: &Path,
        profile: &EncodingProfile,
    ) -> PipelineResult<()>;

    /// Stream-copy every entry of the demuxer `playlist` into `output`.
    ///
    /// Fails with `PipelineError::ConcatFailed` on a non-zero exit.
    async fn concat(&self, playlist: &Path, output: &Path) -> PipelineResult<()>;

    /// First line of the engine's version banner
    async fn version(&self) -> PipelineResult<String>;
}

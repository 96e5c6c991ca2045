// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a media file
    ///
    /// A non-zero exit of the inspection tool is reported as
    /// [`DomainError::ProbeFailed`] carrying its exit code.
    async fn probe_media(&self, file_path: &str) -> Result<MediaInfo, DomainError>;
}

/// Port for running the external encoder
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Run one encoder pass to completion and return its exit code
    async fn run_pass(&self, spec: &PassSpec) -> Result<i32, DomainError>;

    /// Names of the audio encoders the encoder build offers
    async fn list_audio_encoders(&self) -> Result<Vec<String>, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError>;

    /// Delete two-pass statistics files written under `prefix`
    ///
    /// Returns the number of files removed.
    async fn remove_pass_logs(&self, prefix: &Path) -> Result<usize, DomainError>;
}

//! FFmpeg execution adapter
//!
//! Runs encoder passes as child processes with inherited stdio so ffmpeg's
//! own progress output reaches the terminal.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    ffmpeg_bin: String,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    fn spawn_error(&self, err: std::io::Error) -> DomainError {
        DomainError::Spawn {
            program: self.ffmpeg_bin.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl EncodePort for FFmpegAdapter {
    async fn run_pass(&self, spec: &PassSpec) -> Result<i32, DomainError> {
        let status = Command::new(&self.ffmpeg_bin)
            .args(spec.to_args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        // Killed by a signal: no code to propagate
        Ok(status.code().unwrap_or(LOCAL_FAILURE_EXIT_CODE))
    }

    async fn list_audio_encoders(&self) -> Result<Vec<String>, DomainError> {
        let output = Command::new(&self.ffmpeg_bin)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        let listing = String::from_utf8_lossy(&output.stdout);
        let encoders = parse_audio_encoders(&listing);
        debug!("ffmpeg offers {} audio encoders", encoders.len());
        Ok(encoders)
    }
}

/// Extract audio encoder names from `ffmpeg -encoders` output
///
/// Listing lines look like ` A....D aac    AAC (Advanced Audio Coding)`;
/// the capability column starts with `A` for audio encoders.
pub fn parse_audio_encoders(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("---"))
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let caps = fields.next()?;
            let name = fields.next()?;
            caps.starts_with('A').then(|| name.to_string())
        })
        .collect()
}

//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and reduces the result to the handful of
//! fields planning needs.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Complete ffprobe output structure
#[derive(Debug, Clone, Deserialize)]
pub struct FFProbeData {
    #[serde(default)]
    pub streams: Vec<FFProbeStream>,
    pub format: FFProbeFormat,
}

/// Format-level metadata from ffprobe
#[derive(Debug, Clone, Deserialize)]
pub struct FFProbeFormat {
    pub duration: Option<String>,
}

/// Stream-level metadata from ffprobe
#[derive(Debug, Clone, Deserialize)]
pub struct FFProbeStream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub bit_rate: Option<String>,
    pub height: Option<u32>,
    pub nb_frames: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    ffprobe_bin: String,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_bin: impl Into<String>) -> Self {
        Self {
            ffprobe_bin: ffprobe_bin.into(),
        }
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_media(&self, file_path: &str) -> Result<MediaInfo, DomainError> {
        debug!("ffprobe: probing {}", file_path);

        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v",
                "warning",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(file_path)
            .stdin(std::process::Stdio::null())
            .stderr(std::process::Stdio::inherit())
            .output()
            .await
            .map_err(|e| DomainError::Spawn {
                program: self.ffprobe_bin.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFailed {
                path: file_path.to_string(),
                code: output.status.code().unwrap_or(LOCAL_FAILURE_EXIT_CODE),
            });
        }

        let json = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(file_path, &json)
    }
}

/// Convert ffprobe JSON into [`MediaInfo`]
///
/// Only the first video and first audio stream are considered.
pub fn parse_probe_output(file_path: &str, json: &str) -> Result<MediaInfo, DomainError> {
    let parse_error = |message: String| DomainError::ProbeParse {
        path: file_path.to_string(),
        message,
    };

    let data: FFProbeData =
        serde_json::from_str(json).map_err(|e| parse_error(format!("invalid JSON: {}", e)))?;

    let duration: f64 = data
        .format
        .duration
        .as_deref()
        .ok_or_else(|| parse_error("format.duration missing".to_string()))?
        .trim()
        .parse()
        .map_err(|_| parse_error("format.duration is not a number".to_string()))?;

    let video = data
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .map(|s| -> Result<VideoStreamInfo, DomainError> {
            Ok(VideoStreamInfo {
                height: s
                    .height
                    .ok_or_else(|| parse_error("video stream without height".to_string()))?,
                frame_count: s.nb_frames.as_deref().and_then(|n| n.trim().parse().ok()),
            })
        })
        .transpose()?;

    let audio = data
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .map(|s| AudioStreamInfo {
            codec_name: s.codec_name.clone().unwrap_or_default(),
            bit_rate_bps: s.bit_rate.as_deref().and_then(|b| b.trim().parse().ok()),
        });

    Ok(MediaInfo {
        path: file_path.to_string(),
        duration,
        video,
        audio,
    })
}

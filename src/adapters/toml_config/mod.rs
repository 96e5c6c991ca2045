// TOML config adapter - Settings file loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;

/// File name looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "discord-encode.toml";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Pretty,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    /// Parse log format from string
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(DomainError::Config(format!(
                "Invalid log format: {}. Valid formats: pretty, json",
                other
            ))),
        }
    }
}

/// Tool settings; every field falls back to its default when not configured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ffmpeg_bin: String,
    pub ffprobe_bin: String,
    pub video_codec: String,
    pub preset: String,
    /// Appended to the input stem for the default output name
    pub output_suffix: String,
    /// Output container extension
    pub container: String,
    /// Keep two-pass statistics in a private temporary directory per file
    pub passlog_in_temp_dir: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ffmpeg_bin: "ffmpeg".to_string(),
            ffprobe_bin: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            preset: "slow".to_string(),
            output_suffix: "_discord".to_string(),
            container: "mp4".to_string(),
            passlog_in_temp_dir: true,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    encode: Settings,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse settings from TOML text (`[encode]` section)
    pub fn parse(content: &str) -> Result<Settings, DomainError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.encode)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Settings, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Explicit path if given, else the default file when it exists
    pub fn resolve_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        })
    }
}

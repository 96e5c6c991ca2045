//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use crate::adapters::toml_config::{LogFormat, Settings, TomlConfigAdapter};
use crate::domain::errors::DomainError;

/// Settings taken from the environment
///
/// The command line itself is ffmpeg-style and goes to the override table,
/// so clap only ever sees environment variables here.
#[derive(Parser, Debug, Default, Clone, PartialEq)]
#[command(name = "discord-encode", no_binary_name = true)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct EnvOverrides {
    /// Settings file path
    #[arg(long, env = "DISCORD_ENCODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// ffmpeg executable
    #[arg(long, env = "DISCORD_ENCODE_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// ffprobe executable
    #[arg(long, env = "DISCORD_ENCODE_FFPROBE")]
    pub ffprobe: Option<String>,

    /// Logging level
    #[arg(long, env = "DISCORD_ENCODE_LOG")]
    pub log_level: Option<String>,

    /// Logging format (pretty or json)
    #[arg(long, env = "DISCORD_ENCODE_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self, DomainError> {
        Self::try_parse_from(std::iter::empty::<String>())
            .map_err(|e| DomainError::Config(e.to_string()))
    }
}

/// Build settings following precedence: Env > File > Defaults
pub fn initialize_settings(env: &EnvOverrides) -> Result<Settings, DomainError> {
    let settings = match TomlConfigAdapter::resolve_path(env.config.clone()) {
        Some(path) => {
            debug!("Loading configuration from: {}", path.display());
            TomlConfigAdapter::load(&path)?
        }
        None => Settings::default(),
    };
    apply_env_overrides(settings, env)
}

/// Lay environment values over file/default settings
pub fn apply_env_overrides(
    mut settings: Settings,
    env: &EnvOverrides,
) -> Result<Settings, DomainError> {
    if let Some(ffmpeg) = &env.ffmpeg {
        settings.ffmpeg_bin = ffmpeg.clone();
    }
    if let Some(ffprobe) = &env.ffprobe {
        settings.ffprobe_bin = ffprobe.clone();
    }
    if let Some(level) = &env.log_level {
        settings.log_level = level.clone();
    }
    if let Some(format) = &env.log_format {
        settings.log_format = LogFormat::parse(format)?;
    }
    Ok(settings)
}

//! Encode parameter planning
//!
//! Turns probe results plus the user's overrides into a concrete
//! [`EncodePlan`]: target size, bitrate split between audio and video, and
//! whether resolution or frame rate get capped.

use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{EncodePlan, MediaInfo, OverrideTable, PlanWarning};
use crate::utils::time::parse_time;

/// Default target size: 24 MB expressed in kilobits
pub const DEFAULT_TARGET_SIZE_KBITS: f64 = 24_000.0 * 8.0;
/// Kilobits per megabyte of `-size`
pub const KBITS_PER_MB: f64 = 8_000.0;
/// Video bitrate ceiling
pub const MAX_VIDEO_BITRATE_KBPS: f64 = 10_000.0;
/// Audio bitrate when the source stream cannot be reused
pub const DEFAULT_AUDIO_BITRATE_KBPS: f64 = 128.0;
/// Source audio above this is always re-encoded
pub const MAX_COPY_AUDIO_BITRATE_BPS: f64 = 200_000.0;
/// Largest share of the target size audio may take
pub const MAX_AUDIO_SHARE: f64 = 0.15;
/// Inputs longer than this are scaled down to [`LONG_VIDEO_HEIGHT`]
pub const LONG_VIDEO_SECONDS: f64 = 120.0;
pub const LONG_VIDEO_HEIGHT: u32 = 720;
/// Inputs taller than this are scaled down to it
pub const MAX_HEIGHT: u32 = 1080;
/// Average frame rate above which output is capped
pub const FPS_THRESHOLD: f64 = 61.0;

/// Codec the audio stream must already be in to be copied
pub const TARGET_AUDIO_CODEC: &str = "aac";

/// Tool-level override flags the planner consumes
pub mod flags {
    pub const SIZE: &str = "-size";
    pub const KEEP_SIZE: &str = "-keep-size";
    pub const KEEP_FPS: &str = "-keep-fps";
    pub const START: &str = "-ss";
    pub const DURATION: &str = "-t";
    pub const NO_AUDIO: &str = "-an";
    pub const AUDIO_BITRATE: &str = "-b:a";
}

/// Pure decision engine for encode parameters
#[derive(Debug, Clone, Default)]
pub struct ParameterPlanner;

impl ParameterPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plan the encode for one file
    ///
    /// Consumes `-size`, `-keep-size` and `-keep-fps` from `overrides`; every
    /// other flag is left in place for the passes.
    pub fn plan(
        &self,
        media: &MediaInfo,
        overrides: &mut OverrideTable,
    ) -> Result<EncodePlan, DomainError> {
        let mut warnings = Vec::new();

        let target_size_kbits = Self::target_size(overrides)?;
        let duration = Self::effective_duration(media.duration, overrides)?;

        let (mut audio_bitrate_kbps, mut reencode_audio) = Self::source_audio(media);
        if overrides.contains(flags::START) {
            // Seeking with a copied audio stream drifts out of sync on some players
            reencode_audio = true;
        }
        let has_audio = media.audio.is_some() && !overrides.contains(flags::NO_AUDIO);

        let max_audio_bitrate = target_size_kbits * MAX_AUDIO_SHARE / duration;
        if audio_bitrate_kbps > max_audio_bitrate {
            audio_bitrate_kbps = max_audio_bitrate.round();
            reencode_audio = true;
        }

        if let Some(value) = overrides.get(flags::AUDIO_BITRATE) {
            match value.last().and_then(parse_audio_bitrate) {
                Some(kbps) => {
                    audio_bitrate_kbps = kbps;
                    reencode_audio = true;
                }
                None => {
                    let warning = PlanWarning {
                        flag: flags::AUDIO_BITRATE.to_string(),
                        message: format!(
                            "Cannot parse audio bitrate setting {:?}, keeping {}k",
                            value.last().unwrap_or(""),
                            audio_bitrate_kbps
                        ),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        let mut residual_kbits = target_size_kbits;
        if has_audio {
            residual_kbits -= audio_bitrate_kbps * duration;
        }
        if residual_kbits < 0.0 {
            return Err(DomainError::NegativeVideoBudget { residual_kbits });
        }
        let video_bitrate_kbps = (residual_kbits / duration).min(MAX_VIDEO_BITRATE_KBPS).round() as u32;

        let (limit_resolution, target_height) = Self::resolution_cap(media, duration, overrides);
        let limit_fps = Self::fps_cap(media, overrides);

        let plan = EncodePlan {
            target_size_kbits,
            duration,
            video_bitrate_kbps,
            audio_bitrate_kbps,
            reencode_audio,
            has_audio,
            limit_resolution,
            target_height,
            limit_fps,
            warnings,
        };
        debug!(?plan, path = %media.path, "Encode plan ready");
        Ok(plan)
    }

    /// Target size in kilobits, consuming `-size`
    fn target_size(overrides: &mut OverrideTable) -> Result<f64, DomainError> {
        let Some(value) = overrides.remove(flags::SIZE) else {
            return Ok(DEFAULT_TARGET_SIZE_KBITS);
        };
        let raw = value.last().unwrap_or("");
        let megabytes: f64 = raw
            .trim()
            .parse()
            .map_err(|_| DomainError::invalid_override(flags::SIZE, raw, "expected size in MB"))?;
        if !megabytes.is_finite() || megabytes <= 0.0 {
            return Err(DomainError::invalid_override(
                flags::SIZE,
                raw,
                "size must be positive",
            ));
        }
        Ok(megabytes * KBITS_PER_MB)
    }

    /// Container duration adjusted for `-ss` and `-t`
    fn effective_duration(
        container_duration: f64,
        overrides: &OverrideTable,
    ) -> Result<f64, DomainError> {
        let mut duration = container_duration;

        if let Some(value) = overrides.get(flags::START) {
            duration -= Self::time_value(flags::START, value.last())?;
        }
        if let Some(value) = overrides.get(flags::DURATION) {
            duration = duration.min(Self::time_value(flags::DURATION, value.last())?);
        }

        if !(duration > 0.0) {
            return Err(DomainError::EmptyDuration { duration });
        }
        Ok(duration)
    }

    fn time_value(flag: &str, value: Option<&str>) -> Result<f64, DomainError> {
        let raw = value.ok_or_else(|| DomainError::invalid_override(flag, "", "missing time"))?;
        parse_time(raw).map_err(|_| {
            DomainError::invalid_override(flag, raw, "expected [[[days:]hours:]minutes:]seconds")
        })
    }

    /// Starting audio bitrate and whether the source stream has to be re-encoded
    fn source_audio(media: &MediaInfo) -> (f64, bool) {
        let Some(audio) = &media.audio else {
            return (DEFAULT_AUDIO_BITRATE_KBPS, false);
        };
        if audio.codec_name != TARGET_AUDIO_CODEC {
            return (DEFAULT_AUDIO_BITRATE_KBPS, true);
        }
        match audio.bit_rate_bps {
            Some(bps) if bps <= MAX_COPY_AUDIO_BITRATE_BPS => (bps / 1000.0, false),
            _ => (DEFAULT_AUDIO_BITRATE_KBPS, true),
        }
    }

    fn resolution_cap(
        media: &MediaInfo,
        duration: f64,
        overrides: &mut OverrideTable,
    ) -> (bool, u32) {
        let mut limit = false;
        let mut height = MAX_HEIGHT;

        if overrides.remove(flags::KEEP_SIZE).is_some() {
            return (limit, height);
        }

        if duration > LONG_VIDEO_SECONDS {
            limit = true;
            height = LONG_VIDEO_HEIGHT;
        }
        // Only switches the cap on; a 720 target from the length rule stays.
        if media.video.as_ref().is_some_and(|v| v.height > MAX_HEIGHT) {
            limit = true;
        }

        (limit, height)
    }

    /// Compares against the container duration, not the trimmed one
    fn fps_cap(media: &MediaInfo, overrides: &mut OverrideTable) -> bool {
        if overrides.remove(flags::KEEP_FPS).is_some() {
            return false;
        }
        match media.video.as_ref().and_then(|v| v.frame_count) {
            Some(frames) if media.duration > 0.0 => frames as f64 / media.duration > FPS_THRESHOLD,
            _ => false,
        }
    }
}

/// Parse an `-b:a` value into kbps: `"96k"` is kbps, a bare number is bps
pub fn parse_audio_bitrate(value: &str) -> Option<f64> {
    let value = value.trim();
    let kbps = match value.strip_suffix('k') {
        Some(kilo) => kilo.parse::<f64>().ok()?,
        None => value.parse::<f64>().ok()? / 1000.0,
    };
    kbps.is_finite().then_some(kbps)
}

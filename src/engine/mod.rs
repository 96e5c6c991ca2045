//! Two-pass parameter building
//!
//! Combines an [`EncodePlan`] with the user's overrides into the two encoder
//! invocations. Overrides win over computed values, with a few exceptions:
//! the input and pass number are fixed, `-map` entries accumulate, and
//! output-only audio settings never reach the analysis pass.

use serde::{Deserialize, Serialize};

use crate::domain::model::{EncodePlan, FlagTable, OverrideTable, PassNumber, PassSpec};

/// Flags users may never override
pub const LOCKED_FLAGS: [&str; 2] = ["-i", "-pass"];
/// Flags that only matter for the final output and are dropped from pass 1
pub const FINAL_OUTPUT_FLAGS: [&str; 4] = ["-b:a", "-c:a", "-an", "-o"];
/// Flags whose values accumulate instead of being replaced
pub const ADDITIVE_FLAGS: [&str; 1] = ["-map"];

/// Frame rate applied when the fps cap is on
pub const CAPPED_FPS: &str = "60";

/// Null sink for the analysis pass
#[cfg(windows)]
pub const NULL_OUTPUT: &str = "NUL";
#[cfg(not(windows))]
pub const NULL_OUTPUT: &str = "/dev/null";

/// AAC encoders in order of preference
pub const AAC_ENCODER_PREFERENCE: [&str; 2] = ["aac_at", "libfdk_aac"];
/// Always available fallback
pub const NATIVE_AAC_ENCODER: &str = "aac";

/// Best AAC encoder among those the encoder build offers
pub fn preferred_aac_encoder(available: &[String]) -> &'static str {
    AAC_ENCODER_PREFERENCE
        .into_iter()
        .find(|candidate| available.iter().any(|name| name == *candidate))
        .unwrap_or(NATIVE_AAC_ENCODER)
}

/// Encoder choices that stay fixed for a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderProfile {
    /// Video encoder (`-c:v`)
    pub video_codec: String,
    /// Encoder preset (`-preset`)
    pub preset: String,
    /// AAC encoder picked at startup
    pub audio_encoder: String,
}

impl Default for EncoderProfile {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "slow".to_string(),
            audio_encoder: NATIVE_AAC_ENCODER.to_string(),
        }
    }
}

/// Both passes for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoPassSpecs {
    pub first: PassSpec,
    pub second: PassSpec,
}

/// Builds the pass 1 / pass 2 parameter sets
#[derive(Debug, Clone)]
pub struct PassBuilder {
    profile: EncoderProfile,
}

impl PassBuilder {
    pub fn new(profile: EncoderProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &EncoderProfile {
        &self.profile
    }

    /// Build both passes
    ///
    /// `passlog` is the `-passlogfile` prefix; `None` leaves ffmpeg's default
    /// `ffmpeg2pass` in the working directory. `overrides` must already have
    /// the tool-level flags consumed.
    pub fn build(
        &self,
        input: &str,
        output: &str,
        plan: &EncodePlan,
        overrides: &OverrideTable,
        passlog: Option<&str>,
    ) -> TwoPassSpecs {
        let mut forwarded = overrides.clone();
        for flag in LOCKED_FLAGS {
            forwarded.remove(flag);
        }

        let mut first_overrides = forwarded.clone();
        for flag in FINAL_OUTPUT_FLAGS {
            first_overrides.remove(flag);
        }

        let mut first = self.baseline(input, plan, PassNumber::First, passlog);
        first.set_flag("-y");
        first.set("-f", "null");
        Self::apply_filters(&mut first, plan);
        first.merge_over(&first_overrides, &ADDITIVE_FLAGS);

        let mut second = self.baseline(input, plan, PassNumber::Second, passlog);
        Self::apply_filters(&mut second, plan);
        if plan.has_audio {
            second.push_value("-map", "0:a:0");
            if plan.reencode_audio {
                second.set("-c:a", self.profile.audio_encoder.as_str());
                second.set("-b:a", format!("{}k", plan.audio_bitrate_kbps));
            } else {
                second.set("-c:a", "copy");
            }
        }
        second.merge_over(&forwarded, &ADDITIVE_FLAGS);

        TwoPassSpecs {
            first: PassSpec {
                pass: PassNumber::First,
                flags: first,
                output: NULL_OUTPUT.to_string(),
            },
            second: PassSpec {
                pass: PassNumber::Second,
                flags: second,
                output: output.to_string(),
            },
        }
    }

    /// Flags shared by both passes
    fn baseline(
        &self,
        input: &str,
        plan: &EncodePlan,
        pass: PassNumber,
        passlog: Option<&str>,
    ) -> FlagTable {
        let mut flags = FlagTable::new();
        flags.set_flag("-hide_banner");
        // Placeholder so a user -ss lands before -i as an input seek
        flags.set("-ss", "0");
        flags.set("-i", input);
        flags.set("-map_metadata", "-1");
        flags.push_value("-map", "0:v:0");
        flags.set("-c:v", self.profile.video_codec.as_str());
        flags.set("-b:v", format!("{}k", plan.video_bitrate_kbps));
        flags.set("-preset", self.profile.preset.as_str());
        flags.set("-pass", pass.to_string());
        if let Some(prefix) = passlog {
            flags.set("-passlogfile", prefix);
        }
        flags.set("-pix_fmt", "yuv420p");
        flags.set("-fps_mode", "cfr");
        flags
    }

    fn apply_filters(flags: &mut FlagTable, plan: &EncodePlan) {
        if plan.limit_resolution {
            flags.set("-vf", format!("scale=-1:{}", plan.target_height));
        }
        if plan.limit_fps {
            flags.set("-r", CAPPED_FPS);
        }
    }
}

//! discord-encode
//!
//! Re-encodes videos to fit under an upload size limit using two-pass ABR.
//!
//! # Usage
//!
//! ```bash
//! discord-encode clip.mkv
//! discord-encode -size 50 -ss 1:30 -t 20 -o short.mp4 clip.mkv
//! discord-encode -o _small a.mov b.mov
//! ```

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use discord_encode::adapters::*;
use discord_encode::app::{detect_audio_encoder, EncodeInteractor, OutputLayout};
use discord_encode::cli::{parse_args, HELP};
use discord_encode::config_initialization::{initialize_settings, EnvOverrides};
use discord_encode::domain::errors::LOCAL_FAILURE_EXIT_CODE;
use discord_encode::engine::EncoderProfile;
use discord_encode::utils::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let invocation = parse_args(std::env::args().skip(1));

    if invocation.files.is_empty() {
        eprintln!("Missing filename");
    }
    if invocation.files.is_empty() || invocation.wants_help() {
        eprint!("{}", HELP);
        std::process::exit(LOCAL_FAILURE_EXIT_CODE);
    }

    let env = EnvOverrides::from_env()?;
    let settings = initialize_settings(&env)?;
    init_logging(&settings.log_level, settings.log_format);

    let probe = Arc::new(FFprobeAdapter::new(settings.ffprobe_bin.clone()));
    let encoder = Arc::new(FFmpegAdapter::new(settings.ffmpeg_bin.clone()));
    let fs = Arc::new(FsLocalAdapter::new());

    let profile = EncoderProfile {
        video_codec: settings.video_codec.clone(),
        preset: settings.preset.clone(),
        audio_encoder: detect_audio_encoder(encoder.as_ref()).await,
    };
    let layout = OutputLayout {
        suffix: settings.output_suffix.clone(),
        container: settings.container.clone(),
        passlog_in_temp_dir: settings.passlog_in_temp_dir,
    };

    let interactor = EncodeInteractor::new(probe, encoder, fs, profile, layout);
    match interactor.execute(&invocation).await {
        Ok(report) => {
            info!("Encoded {} file(s)", report.files.len());
            Ok(())
        }
        Err(err) => {
            error!("{}", err);
            std::process::exit(err.exit_code());
        }
    }
}

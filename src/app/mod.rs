// Application layer - Use case interactors

pub mod encode_interactor;

// Re-export interactors
pub use encode_interactor::{EncodeInteractor, FileReport, OutputLayout, RunReport};

use tracing::{info, warn};

use crate::engine::{preferred_aac_encoder, NATIVE_AAC_ENCODER};
use crate::ports::EncodePort;

/// Pick the AAC encoder once for the whole run
///
/// Falls back to ffmpeg's native `aac` when the encoder list is unavailable.
pub async fn detect_audio_encoder(encode_port: &dyn EncodePort) -> String {
    match encode_port.list_audio_encoders().await {
        Ok(available) => {
            let chosen = preferred_aac_encoder(&available);
            info!("Using AAC encoder: {}", chosen);
            chosen.to_string()
        }
        Err(e) => {
            warn!("Could not list encoders ({}), using {}", e, NATIVE_AAC_ENCODER);
            NATIVE_AAC_ENCODER.to_string()
        }
    }
}

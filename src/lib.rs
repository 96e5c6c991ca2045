//! discord-encode library
//!
//! Probes a video, works out the bitrates that land it under a target file
//! size, and drives a two-pass ffmpeg encode with user overrides applied on
//! top of the computed defaults.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    AudioStreamInfo, EncodePlan, Invocation, MediaInfo, OverrideTable, OverrideValue, PassSpec,
    VideoStreamInfo,
};

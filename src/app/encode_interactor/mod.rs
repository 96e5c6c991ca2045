// Encode interactor - Orchestrates the two-pass encode of each input file

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::cli::TOOL_FLAGS;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{EncoderProfile, PassBuilder, TwoPassSpecs};
use crate::planner::ParameterPlanner;
use crate::ports::*;
use crate::utils::path::{resolve_output_path, OutputOverride};

/// ffmpeg's pass-log prefix when none is given
pub const DEFAULT_PASSLOG_PREFIX: &str = "ffmpeg2pass";

const OUTPUT_FLAG: &str = "-o";
const OVERWRITE_FLAG: &str = "-y";
const PASSLOG_FLAG: &str = "-passlogfile";

/// Where outputs and pass logs go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub suffix: String,
    pub container: String,
    /// Private temporary directory per file for pass logs
    pub passlog_in_temp_dir: bool,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            suffix: "_discord".to_string(),
            container: "mp4".to_string(),
            passlog_in_temp_dir: true,
        }
    }
}

/// What happened to one input file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: String,
    pub output: String,
    pub plan: EncodePlan,
    pub passes: TwoPassSpecs,
    /// Pass-log files deleted after pass 2
    pub removed_logs: usize,
}

/// Result of a whole run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: Vec<FileReport>,
}

/// Interactor for the encode use case
pub struct EncodeInteractor {
    probe_port: Arc<dyn ProbePort>,
    encode_port: Arc<dyn EncodePort>,
    fs_port: Arc<dyn FsPort>,
    planner: ParameterPlanner,
    builder: PassBuilder,
    layout: OutputLayout,
}

impl EncodeInteractor {
    /// Create new encode interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        encode_port: Arc<dyn EncodePort>,
        fs_port: Arc<dyn FsPort>,
        profile: EncoderProfile,
        layout: OutputLayout,
    ) -> Self {
        Self {
            probe_port,
            encode_port,
            fs_port,
            planner: ParameterPlanner::new(),
            builder: PassBuilder::new(profile),
            layout,
        }
    }

    /// Encode every input file in order, stopping at the first failure
    pub async fn execute(&self, invocation: &Invocation) -> Result<RunReport, DomainError> {
        let multiple = invocation.files.len() > 1;
        let mut report = RunReport::default();

        for (index, input) in invocation.files.iter().enumerate() {
            info!(
                "[{}/{}] Encoding {}",
                index + 1,
                invocation.files.len(),
                input
            );
            // Each file plans against its own copy of the template
            let overrides = invocation.overrides.clone();
            let file_report = self.encode_file(input, overrides, multiple).await?;
            info!("Finished {} -> {}", file_report.input, file_report.output);
            report.files.push(file_report);
        }

        Ok(report)
    }

    async fn encode_file(
        &self,
        input: &str,
        mut overrides: OverrideTable,
        multiple: bool,
    ) -> Result<FileReport, DomainError> {
        let output = self.take_output_path(input, &mut overrides, multiple)?;
        if !overrides.contains(OVERWRITE_FLAG) && self.fs_port.file_exists(&output).await? {
            return Err(DomainError::OutputExists { path: output });
        }

        let media = self.probe_port.probe_media(input).await?;
        debug!(
            "Probed {}: {:.3}s, video {:?}, audio {:?}",
            input, media.duration, media.video, media.audio
        );

        let plan = self.planner.plan(&media, &mut overrides)?;
        for flag in TOOL_FLAGS {
            overrides.remove(flag);
        }
        info!(
            "Target {:.0} kbit over {:.2}s: video {}k, audio {}",
            plan.target_size_kbits,
            plan.duration,
            plan.video_bitrate_kbps,
            describe_audio(&plan)
        );

        // Keep the directory alive until both passes and cleanup are done
        let (_passlog_dir, passlog) = self.passlog_prefix(&overrides)?;
        let passlog_arg = passlog.to_string_lossy().into_owned();
        let baked_passlog = if overrides.contains(PASSLOG_FLAG) || self.layout.passlog_in_temp_dir
        {
            Some(passlog_arg.as_str())
        } else {
            None
        };

        let passes = self
            .builder
            .build(input, &output, &plan, &overrides, baked_passlog);

        let outcome = self.run_passes(&passes).await;
        let removed = self.fs_port.remove_pass_logs(&passlog).await;
        outcome?;
        let removed_logs = removed?;
        debug!("Removed {} pass log file(s)", removed_logs);

        Ok(FileReport {
            input: input.to_string(),
            output,
            plan,
            passes,
            removed_logs,
        })
    }

    /// Consume `-o` and resolve where this file's output goes
    fn take_output_path(
        &self,
        input: &str,
        overrides: &mut OverrideTable,
        multiple: bool,
    ) -> Result<String, DomainError> {
        let requested = overrides.remove(OUTPUT_FLAG);
        let requested = match &requested {
            None => None,
            Some(value) => Some(value.last().ok_or_else(|| {
                DomainError::invalid_override(OUTPUT_FLAG, "", "missing output path")
            })?),
        };

        let output = match requested {
            None => OutputOverride::None,
            Some(value) if multiple => OutputOverride::Suffix(value),
            Some(value) => OutputOverride::Path(value),
        };
        Ok(resolve_output_path(
            input,
            output,
            &self.layout.suffix,
            &self.layout.container,
        ))
    }

    /// Pass-log prefix for this file, plus the temporary directory holding it
    fn passlog_prefix(
        &self,
        overrides: &OverrideTable,
    ) -> Result<(Option<TempDir>, PathBuf), DomainError> {
        if let Some(user) = overrides.get(PASSLOG_FLAG).and_then(|v| v.last()) {
            return Ok((None, PathBuf::from(user)));
        }
        if !self.layout.passlog_in_temp_dir {
            return Ok((None, PathBuf::from(DEFAULT_PASSLOG_PREFIX)));
        }

        let dir = tempfile::Builder::new()
            .prefix("discord-encode-")
            .tempdir()?;
        let prefix = dir.path().join(DEFAULT_PASSLOG_PREFIX);
        Ok((Some(dir), prefix))
    }

    async fn run_passes(&self, passes: &TwoPassSpecs) -> Result<(), DomainError> {
        for spec in [&passes.first, &passes.second] {
            info!("Running pass {}: \"ffmpeg {}\"", spec.pass, spec);
            let code = self.encode_port.run_pass(spec).await?;
            if code != 0 {
                return Err(DomainError::EncodeFailed {
                    pass: spec.pass.as_u8(),
                    code,
                });
            }
        }
        Ok(())
    }
}

fn describe_audio(plan: &EncodePlan) -> String {
    match (plan.has_audio, plan.reencode_audio) {
        (false, _) => "none".to_string(),
        (true, true) => format!("{}k re-encoded", plan.audio_bitrate_kbps),
        (true, false) => "copied".to_string(),
    }
}

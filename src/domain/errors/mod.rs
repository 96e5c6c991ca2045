// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Exit code used for failures raised locally rather than by a child process
pub const LOCAL_FAILURE_EXIT_CODE: i32 = 1;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Media inspection tool exited unsuccessfully
    #[error("ffprobe failed for {path} (exit code {code})")]
    ProbeFailed { path: String, code: i32 },

    /// Media inspection output could not be interpreted
    #[error("Could not read probe output for {path}: {message}")]
    ProbeParse { path: String, message: String },

    /// Audio allocation leaves no room for video
    #[error("Video needs to be negative size to fit ({residual_kbits:.0} kbit left after audio)")]
    NegativeVideoBudget { residual_kbits: f64 },

    /// Trimming left nothing to encode
    #[error("Effective duration is {duration:.3}s, nothing to encode")]
    EmptyDuration { duration: f64 },

    /// A tool-level override value that planning cannot work without
    #[error("Invalid value for {flag}: {value} ({reason})")]
    InvalidOverride {
        flag: String,
        value: String,
        reason: String,
    },

    /// Encoder pass exited unsuccessfully
    #[error("ffmpeg pass {pass} failed (exit code {code})")]
    EncodeFailed { pass: u8, code: i32 },

    /// Output already exists and overwriting was not requested
    #[error("File {path} exists! Pass -y to overwrite")]
    OutputExists { path: String },

    /// External program could not be started
    #[error("Failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(String),
}

impl DomainError {
    /// Process exit code for this failure
    ///
    /// Child process failures propagate the child's code; everything raised
    /// locally maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            DomainError::ProbeFailed { code, .. } | DomainError::EncodeFailed { code, .. } => {
                *code
            }
            _ => LOCAL_FAILURE_EXIT_CODE,
        }
    }

    pub(crate) fn invalid_override(flag: &str, value: &str, reason: impl Into<String>) -> Self {
        DomainError::InvalidOverride {
            flag: flag.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_failures_propagate_exit_code() {
        let err = DomainError::ProbeFailed {
            path: "a.mkv".to_string(),
            code: 69,
        };
        assert_eq!(err.exit_code(), 69);

        let err = DomainError::EncodeFailed { pass: 2, code: 187 };
        assert_eq!(err.exit_code(), 187);
    }

    #[test]
    fn test_local_failures_exit_with_one() {
        let err = DomainError::OutputExists {
            path: "out.mp4".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "File out.mp4 exists! Pass -y to overwrite");

        let err = DomainError::NegativeVideoBudget {
            residual_kbits: -12.0,
        };
        assert_eq!(err.exit_code(), 1);
    }
}

// Local filesystem adapter - File system operations on the host

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

/// Whether `file_name` is a statistics file ffmpeg writes for `-passlogfile <stem>`
///
/// Matches `<stem>-<n>.log` plus the encoder's `.mbtree` and `.temp`
/// companions.
pub fn is_pass_log_name(stem: &str, file_name: &str) -> bool {
    let Some(rest) = file_name
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('-'))
    else {
        return false;
    };
    let Some((index, extension)) = rest.split_once('.') else {
        return false;
    };
    !index.is_empty()
        && index.chars().all(|c| c.is_ascii_digit())
        && (extension == "log" || extension.starts_with("log."))
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &str) -> Result<bool, DomainError> {
        Ok(Path::new(file_path).exists())
    }

    async fn remove_pass_logs(&self, prefix: &Path) -> Result<usize, DomainError> {
        let Some(stem) = prefix.file_name().and_then(|name| name.to_str()) else {
            return Ok(0);
        };
        let dir = match prefix.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| is_pass_log_name(stem, name));
            if matches {
                std::fs::remove_file(entry.path())?;
                debug!("Removed pass log {}", entry.path().display());
                removed += 1;
            }
        }
        Ok(removed)
    }
}

//! Raw command-line tokenizing
//!
//! The argument vector follows ffmpeg conventions (`-flag value`, single
//! dash, arbitrary unknown flags), so it is split by hand instead of through
//! a declarative parser.

use crate::domain::model::{Invocation, OverrideTable};

/// Whether a token is a flag rather than a value or file name
pub fn is_flag(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Split argv (without the program name) into input files and overrides
///
/// A flag directly followed by a non-flag token takes that token as its
/// value; repeating the flag accumulates values. A flag followed by another
/// flag, or by nothing, is presence-only. Any further non-flag tokens are
/// input files.
pub fn parse_args<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut files = Vec::new();
    let mut overrides = OverrideTable::new();
    let mut pending: Option<String> = None;

    for token in args.into_iter().map(Into::into) {
        if is_flag(&token) {
            if let Some(flag) = pending.take() {
                overrides.set_flag(flag);
            }
            pending = Some(token);
            continue;
        }

        match pending.take() {
            Some(flag) => overrides.push_value(flag, token),
            None => files.push(token),
        }
    }

    if let Some(flag) = pending {
        overrides.set_flag(flag);
    }

    Invocation { files, overrides }
}

//! Output path resolution

use std::path::Path;

/// How `-o` is applied when given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputOverride<'a> {
    /// No `-o`
    None,
    /// Single input: use the value as the output path
    Path(&'a str),
    /// Several inputs: append the value to each input's stem
    Suffix(&'a str),
}

/// `<parent>/<stem><suffix>.<container>` for an input file
pub fn default_output_path(input: &str, suffix: &str, container: &str) -> String {
    sibling_with_suffix(input, &format!("{}.{}", suffix, container))
}

/// Resolve the output path for one input
pub fn resolve_output_path(
    input: &str,
    output: OutputOverride<'_>,
    suffix: &str,
    container: &str,
) -> String {
    match output {
        OutputOverride::None => default_output_path(input, suffix, container),
        OutputOverride::Path(path) => path.to_string(),
        OutputOverride::Suffix(tail) => sibling_with_suffix(input, tail),
    }
}

/// Input's directory joined with its stem followed by `tail`
fn sibling_with_suffix(input: &str, tail: &str) -> String {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{}", stem, tail);

    match path.parent() {
        Some(parent) => parent.join(name).to_string_lossy().into_owned(),
        None => name,
    }
}

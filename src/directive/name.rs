//! Source file name parsing: `<base>(~<token>)*.svg`.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Recognized source suffix (matched ASCII case-insensitively).
pub const SOURCE_SUFFIX: &str = ".svg";

/// Directive separator inside file names and override strings.
pub const SEPARATOR: char = '~';

/// One discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    pub path: PathBuf,
    /// Sanitized identifier, safe as an Android resource name.
    pub base_name: String,
    /// Raw directive tokens, in file order (or from the global override).
    pub ops: Vec<String>,
}

impl SourceItem {
    /// Parse a source path. Returns `None` if it is not an SVG file or has
    /// no base name (`.svg`, `~tw24.svg`).
    ///
    /// When `override_ops` is set it replaces the tokens from the file name;
    /// the base name always comes from the file name.
    pub fn parse(path: &Path, override_ops: Option<&str>) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let stem = source_stem(file_name)?;

        let mut segments = stem.split(SEPARATOR);
        let base_name = android_valid_name(segments.next().unwrap_or_default());

        let ops = match override_ops {
            Some(ops) => split_ops(ops),
            None => segments
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        };

        Some(Self {
            path: path.to_path_buf(),
            base_name,
            ops,
        })
    }

    /// File name used as the cache key.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Split an ops string (`tw32~pad60x60`) into tokens, dropping empty segments.
pub fn split_ops(ops: &str) -> Vec<String> {
    ops.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Check whether a file name has the source suffix after a base name.
pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(source_stem)
        .is_some()
}

/// File name without the source suffix. The base segment must be non-empty.
fn source_stem(file_name: &str) -> Option<&str> {
    let split = file_name.len().checked_sub(SOURCE_SUFFIX.len())?;
    let (stem, suffix) = (file_name.get(..split)?, file_name.get(split..)?);
    let has_base = !stem.starts_with(SEPARATOR) && !stem.is_empty();
    (suffix.eq_ignore_ascii_case(SOURCE_SUFFIX) && has_base).then_some(stem)
}

/// Lowercase, then replace anything outside `[a-z0-9_]` with `_`.
///
/// Idempotent: the output only contains characters it leaves untouched.
pub fn android_valid_name(name: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"[^a-z0-9_]").unwrap());
    re.replace_all(&name.to_lowercase(), "_").into_owned()
}

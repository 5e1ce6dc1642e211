//! Dotted config field path.

use crate::logger::paint;
use owo_colors::{Stream, Style};
use std::fmt;

/// A config field path such as `build.densities`.
///
/// Sections expose their paths as `Section::FIELDS.<name>` constants so
/// diagnostics never spell a field name by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = format!("`{}`", self.0);
        f.write_str(&paint(Stream::Stderr, path, Style::new().bright_blue()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path() {
        const F: FieldPath = FieldPath::new("tools.vector");
        assert_eq!(F.as_str(), "tools.vector");
        owo_colors::set_override(false);
        assert_eq!(F.to_string(), "`tools.vector`");
    }
}

//! Typed errors for directive parsing, resolution and the incremental cache.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single directive token could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("expected `pad<width>x<height>`")]
    Padding,

    #[error("`{0}` is not a non-negative integer")]
    NotAnInteger(String),

    #[error("background must be 6 (rrggbb) or 8 (aarrggbb) hex digits, got {0}")]
    ColorLength(usize),

    #[error("`{0}` is not a hex color")]
    ColorDigits(String),
}

/// Errors raised while planning a run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown density `{0}`")]
    UnknownDensityTier(String),

    #[error("invalid directive `{token}` in `{file}`: {reason}")]
    InvalidDirective {
        file: String,
        token: String,
        #[source]
        reason: DirectiveError,
    },

    #[error("`{file}` has no {what}")]
    MissingDirectives { file: String, what: &'static str },

    #[error("failed to read cache `{0}`")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("failed to write cache `{0}`")]
    CacheWrite(PathBuf, #[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directive_display() {
        let err = BuildError::InvalidDirective {
            file: "icon~pad3.svg".into(),
            token: "pad3".into(),
            reason: DirectiveError::Padding,
        };
        let display = err.to_string();
        assert!(display.contains("pad3"));
        assert!(display.contains("icon~pad3.svg"));
    }

    #[test]
    fn test_unknown_density_display() {
        let err = BuildError::UnknownDensityTier("retina".into());
        assert_eq!(err.to_string(), "unknown density `retina`");
    }
}

//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = ["app/src/main/svg-png"]         # Files or directories, walked recursively
//! output = "app/src/main/generated-res"    # Android `res/` style root
//! densities = ["hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]
//! override_ops = "tw32~pad60x60"           # Replace every file's directives
//! no_ops = "vector"                        # vector | skip | error
//! unsized = "native"                       # native | scale | skip | error
//! work_dir = "app/build"                   # Where svgexport_ops.json is written
//! cache_dir = "app/build"                  # Where densify-cache.json lives
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::directive::{decode, split_ops};
use crate::resolve::{NoOpsPolicy, UnsizedPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Source files or directories.
    pub input: Vec<PathBuf>,

    /// Resource root receiving `drawable-*`, `mipmap-*` and `drawable/`.
    pub output: PathBuf,

    /// Density tier names, in output order.
    pub densities: Vec<String>,

    /// Directive string applied to every source instead of its own.
    pub override_ops: Option<String>,

    /// Sources without any raster directive.
    pub no_ops: NoOpsPolicy,

    /// Sources with post-processing but no `tw`/`th`.
    #[serde(rename = "unsized")]
    pub unsized_ops: UnsizedPolicy,

    /// Scratch directory for rasterizer input files.
    pub work_dir: PathBuf,

    /// Directory holding the incremental cache.
    pub cache_dir: PathBuf,

    /// Ignore the cache (CLI only).
    #[serde(skip)]
    pub force: bool,

    /// Print the work order instead of executing it (CLI only).
    #[serde(skip)]
    pub dry: bool,
}

/// Field paths of [`BuildSection`], for diagnostics.
pub struct BuildFields {
    pub input: FieldPath,
    pub densities: FieldPath,
    pub override_ops: FieldPath,
}

impl BuildSection {
    pub const FIELDS: BuildFields = BuildFields {
        input: FieldPath::new("build.input"),
        densities: FieldPath::new("build.densities"),
        override_ops: FieldPath::new("build.override_ops"),
    };

    /// Validate build configuration. Paths must already be normalized.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.input.is_empty() {
            diag.error(Self::FIELDS.input, "no input files or directories");
        }
        for input in &self.input {
            if !input.exists() {
                diag.error_with_hint(
                    Self::FIELDS.input,
                    format!("`{}` does not exist", input.display()),
                    "pass existing paths with `-i` or fix the config",
                );
            }
        }

        if self.densities.is_empty() {
            diag.error(Self::FIELDS.densities, "no densities requested");
        }

        if let Some(ops) = &self.override_ops {
            for token in split_ops(ops) {
                if let Err(e) = decode(&token) {
                    diag.error(
                        Self::FIELDS.override_ops,
                        format!("invalid directive `{token}`: {e}"),
                    );
                }
            }
        }
    }
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            input: vec!["app/src/main/svg-png".into()],
            output: "app/src/main/generated-res".into(),
            densities: ["hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]
                .into_iter()
                .map(String::from)
                .collect(),
            override_ops: None,
            no_ops: NoOpsPolicy::default(),
            unsized_ops: UnsizedPolicy::default(),
            work_dir: "app/build".into(),
            cache_dir: "app/build".into(),
            force: false,
            dry: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.input, [PathBuf::from("app/src/main/svg-png")]);
        assert_eq!(config.build.output, PathBuf::from("app/src/main/generated-res"));
        assert_eq!(config.build.densities, ["hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]);
        assert_eq!(config.build.no_ops, NoOpsPolicy::Vector);
        assert_eq!(config.build.unsized_ops, UnsizedPolicy::Native);
        assert!(config.build.override_ops.is_none());
        assert!(!config.build.force);
    }

    #[test]
    fn test_custom_values() {
        let config = test_parse_config(
            r#"
[build]
input = ["icons", "logo.svg"]
densities = ["mdpi"]
override_ops = "tw24"
no_ops = "error"
unsized = "scale"
"#,
        );
        assert_eq!(config.build.input.len(), 2);
        assert_eq!(config.build.densities, ["mdpi"]);
        assert_eq!(config.build.override_ops.as_deref(), Some("tw24"));
        assert_eq!(config.build.no_ops, NoOpsPolicy::Error);
        assert_eq!(config.build.unsized_ops, UnsizedPolicy::Scale);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let dir = TempDir::new().unwrap();
        let build = BuildSection {
            input: vec![dir.path().join("missing")],
            densities: vec![],
            override_ops: Some("tw24~padXx1".into()),
            ..BuildSection::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        let build = BuildSection {
            input: vec![dir.path().to_path_buf()],
            ..BuildSection::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(diag.is_empty());
    }
}

//! `[tools]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [tools]
//! svgexport = ["npx", "svgexport"]   # Rasterizer, receives the ops file path
//! magick = ["convert"]               # ImageMagick (`["magick"]` on IM7)
//! optipng = ["optipng", "-quiet"]    # PNG optimizer, receives each PNG path
//! optimize = true                    # Run the optimizer at all
//! vector = ["s2v", "-i", "{input}", "-o", "{output}"]
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Placeholders substituted in the `vector` command.
pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runners that fetch the real tool on first use.
const PACKAGE_RUNNERS: &[&str] = &["npx", "bunx", "pnpx", "yarn", "dlx"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub svgexport: Vec<String>,
    pub magick: Vec<String>,
    pub optipng: Vec<String>,
    pub optimize: bool,
    /// SVG to VectorDrawable command with `{input}`/`{output}` placeholders.
    pub vector: Vec<String>,
}

pub struct ToolsFields {
    pub svgexport: FieldPath,
    pub magick: FieldPath,
    pub optipng: FieldPath,
    pub vector: FieldPath,
}

impl ToolsSection {
    pub const FIELDS: ToolsFields = ToolsFields {
        svgexport: FieldPath::new("tools.svgexport"),
        magick: FieldPath::new("tools.magick"),
        optipng: FieldPath::new("tools.optipng"),
        vector: FieldPath::new("tools.vector"),
    };

    /// Static checks: commands non-empty, vector template complete.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let commands = [
            (Self::FIELDS.svgexport, &self.svgexport),
            (Self::FIELDS.magick, &self.magick),
            (Self::FIELDS.optipng, &self.optipng),
            (Self::FIELDS.vector, &self.vector),
        ];
        for (field, command) in commands {
            if command.first().is_none_or(|p| p.trim().is_empty()) {
                diag.error(field, "command is empty");
            }
        }

        for placeholder in [INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER] {
            if !self.vector.iter().any(|arg| arg == placeholder) {
                diag.error_with_hint(
                    Self::FIELDS.vector,
                    format!("missing `{placeholder}` argument"),
                    "placeholders must be whole arguments, e.g. [\"s2v\", \"-i\", \"{input}\", \"-o\", \"{output}\"]",
                );
            }
        }
    }

    /// Check that a command's program is installed.
    ///
    /// Package runners only get a hint since they may download on demand.
    pub fn check_installed(field: FieldPath, command: &[String], diag: &mut ConfigDiagnostics) {
        let Some(program) = command.first() else {
            return;
        };
        if which::which(program).is_ok() {
            return;
        }
        if PACKAGE_RUNNERS.contains(&program.as_str()) {
            diag.hint(field, format!("`{program}` not found on PATH"));
        } else {
            diag.error_with_hint(
                field,
                format!("`{program}` not found"),
                format!("install it or update {field}"),
            );
        }
    }
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            svgexport: vec!["svgexport".into()],
            magick: vec!["convert".into()],
            optipng: vec!["optipng".into(), "-quiet".into()],
            optimize: true,
            vector: ["s2v", "-i", INPUT_PLACEHOLDER, "-o", OUTPUT_PLACEHOLDER]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

//! Run configuration from `densify.toml` plus command-line overrides.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [build] and [tools]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file discovery
//! └── mod.rs         # DensifyConfig (this file)
//! ```
//!
//! Without a config file every field takes its default and paths are
//! resolved against the current directory.

pub mod section;
pub mod types;
mod util;

pub use section::{BuildSection, ToolsSection};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};
use util::find_config_file;

use crate::cli::BuildArgs;
use crate::freshness::CACHE_FILE;
use crate::log;
use crate::resolve::ResolveOptions;
use crate::utils::path::{normalize_path, resolve_against};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name searched for when `-C` is not given.
pub const CONFIG_FILE: &str = "densify.toml";

/// Root configuration structure representing densify.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DensifyConfig {
    /// Config file in use, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory config paths are relative to (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub tools: ToolsSection,
}

impl DensifyConfig {
    /// Load the config for this invocation.
    ///
    /// An explicit `-C` path must exist. Otherwise `densify.toml` is searched
    /// upward from the current directory and defaults apply if none is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let config_path = match explicit {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
                    return Err(ConfigError::Io(path, err).into());
                }
                Some(path)
            }
            None => find_config_file(Path::new(CONFIG_FILE), &cwd),
        };

        let mut config = match &config_path {
            Some(path) => {
                crate::debug!("config"; "using {}", path.display());
                Self::from_path(path)?
            }
            None => Self::default(),
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.config_path = config_path.map(|p| normalize_path(&p));
        config.normalize_paths(&root);
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy());
        log!("config"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // cli overrides
    // ========================================================================

    /// Apply build arguments from CLI.
    ///
    /// CLI paths are relative to the current directory, not the config root.
    pub fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        if !args.input.is_empty() {
            self.build.input = args.input.iter().map(|p| resolve_against(cwd, p)).collect();
        }
        if let Some(output) = &args.output {
            self.build.output = resolve_against(cwd, output);
        }
        if let Some(dir) = &args.work_dir {
            self.build.work_dir = resolve_against(cwd, dir);
        }
        if let Some(dir) = &args.cache_dir {
            self.build.cache_dir = resolve_against(cwd, dir);
        }
        if !args.densities.is_empty() {
            self.build.densities = args.densities.clone();
        }

        if let Some(ops) = &args.override_ops {
            self.build.override_ops = Some(ops.clone());
        }
        Self::update_option(&mut self.build.no_ops, args.no_ops.as_ref());
        Self::update_option(&mut self.build.unsized_ops, args.unsized_ops.as_ref());

        self.build.force = args.force;
        self.build.dry = args.dry;
        if args.no_optimize {
            self.tools.optimize = false;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // paths
    // ========================================================================

    /// Resolve every configured path against `root`, expanding `~`.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        let build = &mut self.build;
        build.input = build.input.iter().map(|p| resolve_against(&root, p)).collect();
        build.output = resolve_against(&root, &build.output);
        build.work_dir = resolve_against(&root, &build.work_dir);
        build.cache_dir = resolve_against(&root, &build.cache_dir);
        self.root = root;
    }

    pub fn cache_path(&self) -> PathBuf {
        self.build.cache_dir.join(CACHE_FILE)
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            output_root: self.build.output.clone(),
            no_ops: self.build.no_ops,
            unsized_ops: self.build.unsized_ops,
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate(&mut diag);
        self.tools.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

#[cfg(test)]
impl DensifyConfig {
    /// Defaults rooted at `root`, no config file.
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self::default();
        config.normalize_paths(root);
        config
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Toml)?)
    }
}

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> DensifyConfig {
    let (parsed, ignored) = DensifyConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{NoOpsPolicy, UnsizedPolicy};
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(DensifyConfig::from_str("[build\ninput = 1").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[build]\noutput = \"res\"\ndensity = [\"mdpi\"]\n[unknown_section]\nfield = 1";
        let (config, ignored) = DensifyConfig::parse_with_ignored(content).unwrap();
        assert_eq!(config.build.output, PathBuf::from("res"));
        assert!(ignored.iter().any(|f| f == "build.density"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_paths_relative_to_root() {
        let dir = TempDir::new().unwrap();
        let config = DensifyConfig::for_root(dir.path());
        let root = normalize_path(dir.path());
        assert_eq!(config.root, root);
        assert_eq!(config.build.input, [root.join("app/src/main/svg-png")]);
        assert_eq!(config.build.output, root.join("app/src/main/generated-res"));
        assert_eq!(config.cache_path(), root.join("app/build").join(CACHE_FILE));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let cwd = normalize_path(dir.path());
        let mut config = DensifyConfig::for_root(dir.path());
        config.build.override_ops = Some("tw10".into());

        let args = BuildArgs {
            densities: vec!["mdpi".into()],
            input: vec!["icons".into()],
            output: Some("/abs/res".into()),
            no_ops: Some(NoOpsPolicy::Skip),
            force: true,
            no_optimize: true,
            ..BuildArgs::default()
        };
        config.apply_build_args(&args, &cwd);

        assert_eq!(config.build.densities, ["mdpi"]);
        assert_eq!(config.build.input, [cwd.join("icons")]);
        assert_eq!(config.build.output, PathBuf::from("/abs/res"));
        assert_eq!(config.build.no_ops, NoOpsPolicy::Skip);
        assert_eq!(config.build.unsized_ops, UnsizedPolicy::Native);
        // Not given on the command line: config value stays.
        assert_eq!(config.build.override_ops.as_deref(), Some("tw10"));
        assert!(config.build.force);
        assert!(!config.tools.optimize);
    }

    #[test]
    fn test_resolve_options() {
        let config = test_parse_config("[build]\noutput = \"/res\"\nunsized = \"skip\"");
        let options = config.resolve_options();
        assert_eq!(options.output_root, PathBuf::from("/res"));
        assert_eq!(options.unsized_ops, UnsizedPolicy::Skip);
    }

    #[test]
    fn test_validate_defaults_without_inputs() {
        let dir = TempDir::new().unwrap();
        let config = DensifyConfig::for_root(dir.path());
        // Default input directory does not exist in an empty project.
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("build.input"));
    }
}

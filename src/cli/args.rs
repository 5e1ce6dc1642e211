//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::resolve::{NoOpsPolicy, UnsizedPolicy};

/// Generate Android density resources from SVG files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: densify.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rasterize and convert every source SVG
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Convert one SVG to a vector drawable and re-convert on change
    #[command(visible_alias = "p")]
    Preview {
        #[command(flatten)]
        args: PreviewArgs,
    },
}

/// Build command arguments. Anything given here overrides `densify.toml`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Target densities (default: hdpi xhdpi xxhdpi xxxhdpi)
    #[arg(value_name = "DENSITY")]
    pub densities: Vec<String>,

    /// Input SVG file or directory (repeatable)
    #[arg(short, long, value_hint = clap::ValueHint::AnyPath)]
    pub input: Vec<PathBuf>,

    /// Output resource directory
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Directory for the svgexport input file
    #[arg(short = 's', long = "svgexport-ops-dir", value_hint = clap::ValueHint::DirPath)]
    pub work_dir: Option<PathBuf>,

    /// Directory for the incremental cache file
    #[arg(short = 'c', long = "cache-dir", value_hint = clap::ValueHint::DirPath)]
    pub cache_dir: Option<PathBuf>,

    /// Apply these directives to every file, ignoring the ones in file names
    #[arg(long = "override-ops", value_name = "OPS")]
    pub override_ops: Option<String>,

    /// Regenerate every file, ignoring the cache
    #[arg(short, long)]
    pub force: bool,

    /// What to do with files that have no directives
    #[arg(long, value_enum)]
    pub no_ops: Option<NoOpsPolicy>,

    /// What to do with files that have post-processing but no size
    #[arg(long = "unsized", value_enum)]
    pub unsized_ops: Option<UnsizedPolicy>,

    /// Skip the PNG optimization pass
    #[arg(long)]
    pub no_optimize: bool,

    /// Print the work order as JSON without running anything
    #[arg(short, long)]
    pub dry: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Preview command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct PreviewArgs {
    /// SVG file to preview
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Convert once and exit instead of watching
    #[arg(long)]
    pub once: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Commands::Build { build_args } => build_args.verbose,
            Commands::Preview { args } => args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from([
            "densify", "build", "-i", "icons", "-i", "logo.svg", "-o", "res", "-f",
            "--unsized", "scale", "--override-ops", "tw24~round", "mdpi", "xhdpi",
        ]);
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.input.len(), 2);
        assert_eq!(build_args.output, Some(PathBuf::from("res")));
        assert!(build_args.force);
        assert_eq!(build_args.unsized_ops, Some(UnsizedPolicy::Scale));
        assert_eq!(build_args.override_ops.as_deref(), Some("tw24~round"));
        assert_eq!(build_args.densities, ["mdpi", "xhdpi"]);
        assert!(build_args.no_ops.is_none());
    }

    #[test]
    fn test_parse_preview() {
        let cli = Cli::parse_from(["densify", "-C", "x.toml", "p", "icon.svg", "-V"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(cli.verbose());
        assert!(matches!(cli.command, Commands::Preview { ref args } if args.file == PathBuf::from("icon.svg")));
    }
}

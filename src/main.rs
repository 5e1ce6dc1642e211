//! densify - Android density resources from SVG files.

mod cli;
mod config;
mod core;
mod density;
mod directive;
mod error;
mod executor;
mod freshness;
mod logger;
mod resolve;
mod utils;
mod watch;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::run_build, preview::run_preview};
use config::DensifyConfig;
use executor::ExternalExecutor;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let mut config = DensifyConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Build { build_args } => {
            config.apply_build_args(build_args, &cwd);
            config.validate()?;

            let executor = ExternalExecutor::new(config.tools.clone(), &config.build.work_dir);
            let report = run_build(&config, &executor, config.build.dry, &mut std::io::stdout().lock())?;
            if !config.build.dry {
                report.log_summary();
            }
            Ok(())
        }
        Commands::Preview { args } => run_preview(&config, args, &cwd),
    }
}

//! Command-line interface module.

mod args;
pub mod build;
pub mod preview;

pub use args::{BuildArgs, Cli, Commands, PreviewArgs};

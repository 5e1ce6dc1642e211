//! Shared helpers: process execution, paths, wording.

pub mod exec;
pub mod path;
pub mod plural;

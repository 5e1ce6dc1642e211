//! Configuration section definitions.
//!
//! | Module  | TOML Section | Purpose                                 |
//! |---------|--------------|-----------------------------------------|
//! | `build` | `[build]`    | Inputs, output, densities, policies     |
//! | `tools` | `[tools]`    | External commands used by the executor  |

mod build;
mod tools;

pub use build::BuildSection;
pub use tools::{INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER, ToolsSection};

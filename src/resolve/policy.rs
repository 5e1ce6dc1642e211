//! Policies for sources whose directives do not fully describe a raster.
//!
//! Both are chosen per run through config or CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What to do with a source that has no sizing and no post-processing
/// directive (no tokens at all, or only `mipmap`/unknown ones).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoOpsPolicy {
    /// Convert straight to a vector drawable.
    #[default]
    Vector,
    /// Skip the file with a warning.
    Skip,
    /// Fail the run.
    Error,
}

/// What to do with a source that has post-processing directives
/// (`pad`, `bg_`, `round`) but neither `tw` nor `th`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnsizedPolicy {
    /// Rasterize at the intrinsic size for every density, then post-process.
    #[default]
    Native,
    /// Treat the intrinsic size as dp and scale it per density.
    Scale,
    /// Skip the file with a warning.
    Skip,
    /// Fail the run.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        no_ops: NoOpsPolicy,
        #[serde(rename = "unsized")]
        unsized_ops: UnsizedPolicy,
    }

    #[test]
    fn test_defaults() {
        assert_eq!(NoOpsPolicy::default(), NoOpsPolicy::Vector);
        assert_eq!(UnsizedPolicy::default(), UnsizedPolicy::Native);
    }

    #[test]
    fn test_parse_lowercase() {
        let w: Wrapper = toml::from_str("no_ops = \"skip\"\nunsized = \"scale\"").unwrap();
        assert_eq!(w.no_ops, NoOpsPolicy::Skip);
        assert_eq!(w.unsized_ops, UnsizedPolicy::Scale);
    }

    #[test]
    fn test_cli_and_config_names_agree() {
        for policy in UnsizedPolicy::value_variants() {
            let name = policy.to_possible_value().unwrap().get_name().to_owned();
            let w: Wrapper = toml::from_str(&format!("no_ops = \"vector\"\nunsized = \"{name}\"")).unwrap();
            assert_eq!(w.unsized_ops, *policy);
        }
        for policy in NoOpsPolicy::value_variants() {
            let name = policy.to_possible_value().unwrap().get_name().to_owned();
            let w: Wrapper = toml::from_str(&format!("no_ops = \"{name}\"\nunsized = \"native\"")).unwrap();
            assert_eq!(w.no_ops, *policy);
        }
    }
}

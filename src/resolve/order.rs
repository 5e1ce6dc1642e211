//! Work-order value types handed to the executor.

use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::density::DensityTier;

/// Size instruction for one rasterized output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSpec {
    /// Fixed width in px, height from the source aspect ratio.
    Width(u32),
    /// Fixed height in px, width from the source aspect ratio.
    Height(u32),
    /// Multiply the source's intrinsic size.
    Scale(f64),
    /// Intrinsic size, no resize.
    Native,
}

impl SizeSpec {
    /// Rasterizer size argument, `None` for native size.
    ///
    /// Width and height use the `w:h` convention with one side left blank.
    pub fn to_arg(self) -> Option<String> {
        match self {
            Self::Width(px) => Some(format!("{px}:")),
            Self::Height(px) => Some(format!(":{px}")),
            Self::Scale(factor) => Some(format!("{factor}x")),
            Self::Native => None,
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_arg() {
            Some(arg) => f.write_str(&arg),
            None => f.write_str("native"),
        }
    }
}

/// One rasterized file at one density.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub density: DensityTier,
    pub size: SizeSpec,
}

/// One source rendered to every target density in a single instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rasterization {
    pub source: PathBuf,
    pub outputs: Vec<OutputTarget>,
}

/// In-place image operation on an already rasterized file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PostOp {
    /// Extend the canvas to exactly `width`x`height` px, centered.
    Pad { width: u32, height: u32 },
    /// Flatten onto `#rrggbb[aa]`.
    Background { rrggbb: String, alpha: String },
    /// Crop to a circle.
    Round,
}

impl PostOp {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pad { .. } => "pad",
            Self::Background { .. } => "background",
            Self::Round => "round",
        }
    }
}

/// Post-processing step keyed by the output it mutates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostProcess {
    pub path: PathBuf,
    pub density: DensityTier,
    pub op: PostOp,
}

/// Source converted straight to a vector drawable, density independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Everything the executor must produce.
///
/// Batches are independent across sources, but a post-processing step
/// requires its path's rasterization to be complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkOrder {
    pub rasterizations: Vec<Rasterization>,
    pub post_processing: Vec<PostProcess>,
    pub conversions: Vec<Conversion>,
}

impl WorkOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another order's batches.
    pub fn merge(&mut self, other: Self) {
        self.rasterizations.extend(other.rasterizations);
        self.post_processing.extend(other.post_processing);
        self.conversions.extend(other.conversions);
    }

    pub fn is_empty(&self) -> bool {
        self.rasterizations.is_empty()
            && self.post_processing.is_empty()
            && self.conversions.is_empty()
    }

    /// Every file this order produces, each listed once, in batch order.
    pub fn output_paths(&self) -> Vec<&Path> {
        let raster = self.raster_outputs();
        let vector = self.conversions.iter().map(|c| c.output.as_path());
        dedup(raster.into_iter().chain(vector))
    }

    /// PNG files produced by rasterization or touched by post-processing.
    pub fn raster_outputs(&self) -> Vec<&Path> {
        let rasterized = self
            .rasterizations
            .iter()
            .flat_map(|r| r.outputs.iter().map(|o| o.path.as_path()));
        let processed = self.post_processing.iter().map(|p| p.path.as_path());
        dedup(rasterized.chain(processed))
    }

    /// Post-processing steps grouped by target path, keeping step order.
    pub fn post_processing_by_path(&self) -> Vec<(&Path, Vec<&PostOp>)> {
        let mut groups: Vec<(&Path, Vec<&PostOp>)> = Vec::new();
        for step in &self.post_processing {
            match groups.iter().position(|(path, _)| *path == step.path.as_path()) {
                Some(i) => groups[i].1.push(&step.op),
                None => groups.push((step.path.as_path(), vec![&step.op])),
            }
        }
        groups
    }
}

fn dedup<'a>(paths: impl Iterator<Item = &'a Path>) -> Vec<&'a Path> {
    let mut seen = FxHashSet::default();
    paths.filter(|p| seen.insert(*p)).collect()
}

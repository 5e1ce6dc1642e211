//! Per-source output resolution.
//!
//! ```text
//! SourceItem ──decode──► Directives ──► output dir tier (drawable | mipmap)
//!                                  ├──► Rasterization  (1 per source, n outputs)
//!                                  ├──► PostProcess    (n per pad / bg / round)
//!                                  └──► Conversion     (no raster ops at all)
//! ```

use std::path::{Path, PathBuf};

use super::order::{Conversion, OutputTarget, PostOp, PostProcess, Rasterization, SizeSpec, WorkOrder};
use super::policy::{NoOpsPolicy, UnsizedPolicy};
use crate::density::DensityTier;
use crate::directive::{Directive, SourceItem, decode};
use crate::error::BuildError;

/// Run-level inputs shared by every source.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub output_root: PathBuf,
    pub no_ops: NoOpsPolicy,
    pub unsized_ops: UnsizedPolicy,
}

/// Outcome of resolving one source.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Work(WorkOrder),
    /// Dropped by policy; the reason is meant for a warning.
    Skip(&'static str),
}

/// How rasterized outputs are sized, before density is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sizing {
    Width(u32),
    Height(u32),
    Native,
    Scale,
}

impl Sizing {
    fn for_tier(self, tier: DensityTier) -> SizeSpec {
        match self {
            Self::Width(dp) => SizeSpec::Width(tier.px(dp)),
            Self::Height(dp) => SizeSpec::Height(tier.px(dp)),
            Self::Native => SizeSpec::Native,
            Self::Scale => SizeSpec::Scale(tier.ratio()),
        }
    }
}

/// Directives folded into their effective values (last one wins).
#[derive(Debug, Default)]
struct Effective {
    sizing: Option<Sizing>,
    pad: Option<(u32, u32)>,
    background: Option<(String, String)>,
    round: bool,
    mipmap: bool,
    post_process: bool,
}

impl Effective {
    fn from_item(item: &SourceItem) -> Result<Self, BuildError> {
        let mut eff = Self::default();
        for token in &item.ops {
            let directive = decode(token).map_err(|reason| BuildError::InvalidDirective {
                file: item.file_name(),
                token: token.clone(),
                reason,
            })?;
            eff.post_process |= directive.is_post_process();
            match directive {
                Directive::TargetWidth(dp) => eff.sizing = Some(Sizing::Width(dp)),
                Directive::TargetHeight(dp) => eff.sizing = Some(Sizing::Height(dp)),
                Directive::Pad { width, height } => eff.pad = Some((width, height)),
                Directive::Background { rrggbb, alpha } => eff.background = Some((rrggbb, alpha)),
                Directive::Round => eff.round = true,
                Directive::Mipmap => eff.mipmap = true,
                Directive::Unknown(token) => {
                    crate::debug!("resolve"; "ignoring `{}` in {}", token, item.file_name());
                }
            }
        }
        Ok(eff)
    }

    fn dir_tier(&self) -> &'static str {
        if self.mipmap { "mipmap" } else { "drawable" }
    }
}

/// Resolve a source into the work needed to produce its outputs.
pub fn build(
    item: &SourceItem,
    tiers: &[DensityTier],
    options: &ResolveOptions,
) -> Result<Resolution, BuildError> {
    let eff = Effective::from_item(item)?;

    let sizing = match (eff.sizing, eff.post_process) {
        (Some(sizing), _) => sizing,
        (None, false) => return resolve_no_ops(item, options),
        (None, true) => match options.unsized_ops {
            UnsizedPolicy::Native => Sizing::Native,
            UnsizedPolicy::Scale => Sizing::Scale,
            UnsizedPolicy::Skip => return Ok(Resolution::Skip("no sizing directive")),
            UnsizedPolicy::Error => {
                return Err(BuildError::MissingDirectives {
                    file: item.file_name(),
                    what: "sizing directive",
                });
            }
        },
    };

    let root = &options.output_root;
    let dir = eff.dir_tier();
    let output = |tier: DensityTier| raster_path(root, dir, tier, &item.base_name);

    let mut order = WorkOrder::new();

    if !tiers.is_empty() {
        order.rasterizations.push(Rasterization {
            source: item.path.clone(),
            outputs: tiers
                .iter()
                .map(|&tier| OutputTarget {
                    path: output(tier),
                    density: tier,
                    size: sizing.for_tier(tier),
                })
                .collect(),
        });
    }

    let mut per_tier = |make: &dyn Fn(DensityTier) -> PostOp| {
        for &tier in tiers {
            order.post_processing.push(PostProcess {
                path: output(tier),
                density: tier,
                op: make(tier),
            });
        }
    };

    if let Some((w, h)) = eff.pad {
        per_tier(&|tier| PostOp::Pad {
            width: tier.px(w),
            height: tier.px(h),
        });
    }
    if let Some((rrggbb, alpha)) = &eff.background {
        per_tier(&|_| PostOp::Background {
            rrggbb: rrggbb.clone(),
            alpha: alpha.clone(),
        });
    }
    if eff.round {
        per_tier(&|_| PostOp::Round);
    }

    Ok(Resolution::Work(order))
}

fn resolve_no_ops(item: &SourceItem, options: &ResolveOptions) -> Result<Resolution, BuildError> {
    match options.no_ops {
        NoOpsPolicy::Vector => Ok(Resolution::Work(WorkOrder {
            conversions: vec![Conversion {
                source: item.path.clone(),
                output: vector_path(&options.output_root, &item.base_name),
            }],
            ..WorkOrder::default()
        })),
        NoOpsPolicy::Skip => Ok(Resolution::Skip("no directives")),
        NoOpsPolicy::Error => Err(BuildError::MissingDirectives {
            file: item.file_name(),
            what: "directives",
        }),
    }
}

/// `<root>/<dir>-<density>/<base>.png`
pub fn raster_path(root: &Path, dir: &str, tier: DensityTier, base_name: &str) -> PathBuf {
    root.join(format!("{dir}-{}", tier.name))
        .join(format!("{base_name}.png"))
}

/// `<root>/drawable/<base>.xml`
pub fn vector_path(root: &Path, base_name: &str) -> PathBuf {
    root.join("drawable").join(format!("{base_name}.xml"))
}

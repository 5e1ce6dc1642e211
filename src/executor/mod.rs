//! Turning a [`WorkOrder`] into files.
//!
//! # Phases
//!
//! ```text
//! conversions ──► rasterize (one batch) ──► post-process ──► optimize
//!                                           per path, in      distinct PNGs,
//!                                           order; paths      in parallel
//!                                           in parallel
//! ```
//!
//! A phase starts only after the previous one finished. The first failure
//! stops the run.

mod external;
mod magick;
mod svgexport;
#[cfg(test)]
pub mod recording;

pub use external::ExternalExecutor;

use anyhow::{Result, bail};
use rayon::prelude::*;
use std::path::Path;

use crate::core::is_shutdown;
use crate::logger::ProgressLine;
use crate::resolve::{Conversion, PostOp, Rasterization, WorkOrder};

/// The image operations a work order needs.
pub trait Executor: Sync {
    /// Render every output of every rasterization in the batch.
    fn rasterize(&self, batch: &[Rasterization]) -> Result<()>;

    /// Apply one operation to `target` in place.
    fn post_process(&self, target: &Path, op: &PostOp) -> Result<()>;

    fn convert_to_vector(&self, conversion: &Conversion) -> Result<()>;

    /// Losslessly shrink one PNG in place.
    fn optimize(&self, png: &Path) -> Result<()>;

    /// Whether the optimization phase runs at all.
    fn optimizes(&self) -> bool {
        true
    }

    /// Check up front that everything `order` needs is available.
    fn preflight(&self, _order: &WorkOrder) -> Result<()> {
        Ok(())
    }
}

/// Counts of completed executor calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecSummary {
    pub converted: usize,
    pub rasterized: usize,
    pub post_processed: usize,
    pub optimized: usize,
}

/// Run `order` through `executor` phase by phase.
pub fn execute<E: Executor + ?Sized>(
    order: &WorkOrder,
    executor: &E,
    quiet: bool,
) -> Result<ExecSummary> {
    let rasterized: usize = order.rasterizations.iter().map(|r| r.outputs.len()).sum();
    let groups = order.post_processing_by_path();
    let pngs = if executor.optimizes() {
        order.raster_outputs()
    } else {
        Vec::new()
    };

    let progress = (!quiet).then(|| {
        ProgressLine::new(
            "exec",
            &[
                ("vector", order.conversions.len()),
                ("raster", rasterized),
                ("post", order.post_processing.len()),
                ("optimize", pngs.len()),
            ],
        )
    });
    let tick = |name: &str| {
        if let Some(p) = &progress {
            p.inc(name);
        }
    };

    order.conversions.par_iter().try_for_each(|conversion| {
        check_interrupt()?;
        executor.convert_to_vector(conversion)?;
        tick("vector");
        Ok::<_, anyhow::Error>(())
    })?;

    if !order.rasterizations.is_empty() {
        check_interrupt()?;
        executor.rasterize(&order.rasterizations)?;
        (0..rasterized).for_each(|_| tick("raster"));
    }

    groups.par_iter().try_for_each(|(path, ops)| {
        for op in ops {
            check_interrupt()?;
            executor.post_process(path, op)?;
            tick("post");
        }
        Ok::<_, anyhow::Error>(())
    })?;

    pngs.par_iter().try_for_each(|png| {
        check_interrupt()?;
        executor.optimize(png)?;
        tick("optimize");
        Ok::<_, anyhow::Error>(())
    })?;

    if let Some(p) = progress {
        p.finish();
    }

    Ok(ExecSummary {
        converted: order.conversions.len(),
        rasterized,
        post_processed: order.post_processing.len(),
        optimized: pngs.len(),
    })
}

fn check_interrupt() -> Result<()> {
    if is_shutdown() {
        bail!("interrupted");
    }
    Ok(())
}

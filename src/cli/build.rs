//! The `build` command.
//!
//! Pipeline:
//! - **Densities** - resolve tier names first, nothing is touched on error
//! - **Discover** - walk inputs for `*.svg` (case-insensitive)
//! - **Plan** - parse names, resolve work, drop sources the cache says are fresh
//! - **Execute** - preflight, then run the merged work order
//! - **Finalize** - commit hashes of processed sources, persist the cache

use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::DensifyConfig;
use crate::density::{DensityTable, DensityTier};
use crate::directive::{SourceItem, is_source_file};
use crate::executor::{ExecSummary, Executor, execute};
use crate::freshness::IncrementalCache;
use crate::log;
use crate::resolve::{Resolution, WorkOrder, build};
use crate::utils::path::display_relative;
use crate::utils::plural::plural_count;

/// What one run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Source files found under the inputs.
    pub discovered: usize,
    /// Fresh according to the cache.
    pub cached: usize,
    /// Dropped by the `no_ops`/`unsized` policies.
    pub skipped: usize,
    /// Sources whose work was executed (or printed, for `--dry`).
    pub processed: usize,
    pub exec: ExecSummary,
}

impl BuildReport {
    pub fn log_summary(&self) {
        if self.processed == 0 {
            log!("build"; "nothing to do ({} up to date)", plural_count(self.cached, "source"));
            return;
        }
        log!(
            "build";
            "{} processed, {} cached, {} skipped",
            plural_count(self.processed, "source"),
            self.cached,
            self.skipped
        );
        crate::debug!(
            "build";
            "{} vector, {} raster, {} post, {} optimized",
            self.exec.converted,
            self.exec.rasterized,
            self.exec.post_processed,
            self.exec.optimized
        );
    }
}

/// Run one build with `executor`. `--dry` JSON is written to `out`.
pub fn run_build<E: Executor, W: Write>(
    config: &DensifyConfig,
    executor: &E,
    quiet: bool,
    out: &mut W,
) -> Result<BuildReport> {
    let tiers = DensityTable::ANDROID.resolve(&config.build.densities)?;
    let sources = discover_sources(&config.build.input);
    let mut report = BuildReport {
        discovered: sources.len(),
        ..BuildReport::default()
    };
    crate::debug!("build"; "found {}", plural_count(sources.len(), "source"));

    let mut cache = IncrementalCache::load(config.cache_path(), config.build.force);
    let (order, processed) = plan(config, &tiers, &sources, &mut cache, &mut report)?;
    report.processed = processed.len();

    if config.build.dry {
        serde_json::to_writer_pretty(&mut *out, &order).context("Failed to serialize work order")?;
        writeln!(out).context("Failed to write work order")?;
        return Ok(report);
    }

    if order.is_empty() {
        return Ok(report);
    }

    executor.preflight(&order)?;
    report.exec = execute(&order, executor, quiet)?;

    for item in &processed {
        cache.record_success(item);
    }
    if let Err(e) = cache.persist() {
        log!("warn"; "{:#}", anyhow::Error::from(e));
    }

    Ok(report)
}

/// Resolve every source, keeping only work for stale ones.
fn plan(
    config: &DensifyConfig,
    tiers: &[DensityTier],
    sources: &[PathBuf],
    cache: &mut IncrementalCache,
    report: &mut BuildReport,
) -> Result<(WorkOrder, Vec<SourceItem>)> {
    let options = config.resolve_options();
    let override_ops = config.build.override_ops.as_deref();

    let mut order = WorkOrder::new();
    let mut processed = Vec::new();

    for path in sources {
        let Some(item) = SourceItem::parse(path, override_ops) else {
            continue;
        };
        let work = match build(&item, tiers, &options)? {
            Resolution::Work(work) => work,
            Resolution::Skip(reason) => {
                log!("warn"; "skipping {}: {}", display_relative(&config.root, path), reason);
                report.skipped += 1;
                continue;
            }
        };

        if cache.should_skip(&item, &work.output_paths()) {
            report.cached += 1;
            continue;
        }

        order.merge(work);
        processed.push(item);
    }

    Ok((order, processed))
}

/// Source files under `inputs`, sorted and deduplicated.
///
/// An input may be a single file or a directory walked recursively.
fn discover_sources(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = inputs
        .iter()
        .flat_map(|input| walk_input(input))
        .collect();
    sources.sort();
    sources.dedup();
    sources
}

fn walk_input(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return if is_source_file(input) {
            vec![input.to_path_buf()]
        } else {
            Vec::new()
        };
    }
    WalkDir::new(input)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_source_file(p))
        .collect()
}

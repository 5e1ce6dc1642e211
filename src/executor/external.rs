//! Executor backed by external command-line tools.
//!
//! | Operation         | Tool       | Invocation                          |
//! |-------------------|------------|-------------------------------------|
//! | rasterize         | svgexport  | `svgexport <work_dir>/svgexport_ops.json` |
//! | post_process      | ImageMagick| `convert <png> <args...> <png>`     |
//! | optimize          | OptiPNG    | `optipng -quiet <png>`              |
//! | convert_to_vector | configured | template with `{input}`/`{output}`  |

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Executor;
use super::magick::magick_args;
use super::svgexport::write_ops_file;
use crate::config::section::{INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
use crate::config::{ConfigDiagnostics, ConfigError, ToolsSection};
use crate::resolve::{Conversion, PostOp, Rasterization, WorkOrder};
use crate::utils::exec::{Cmd, SILENT_FILTER, SVGEXPORT_FILTER};

pub struct ExternalExecutor {
    tools: ToolsSection,
    work_dir: PathBuf,
}

impl ExternalExecutor {
    pub fn new(tools: ToolsSection, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            tools,
            work_dir: work_dir.into(),
        }
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create `{}`", parent.display()))?;
    }
    Ok(())
}

impl Executor for ExternalExecutor {
    fn rasterize(&self, batch: &[Rasterization]) -> Result<()> {
        for target in batch.iter().flat_map(|r| &r.outputs) {
            create_parent(&target.path)?;
        }
        let ops_file = write_ops_file(&self.work_dir, batch)?;
        Cmd::from_slice(&self.tools.svgexport)
            .arg(&ops_file)
            .filter(&SVGEXPORT_FILTER)
            .run()
            .context("Rasterization failed")?;
        Ok(())
    }

    fn post_process(&self, target: &Path, op: &PostOp) -> Result<()> {
        Cmd::from_slice(&self.tools.magick)
            .arg(target)
            .args(magick_args(op))
            .arg(target)
            .run()
            .with_context(|| format!("{} failed on `{}`", op.label(), target.display()))?;
        Ok(())
    }

    fn convert_to_vector(&self, conversion: &Conversion) -> Result<()> {
        let output = &conversion.output;
        create_parent(output)?;

        let result = Cmd::from_template(
            &self.tools.vector,
            &[
                (INPUT_PLACEHOLDER, conversion.source.as_os_str()),
                (OUTPUT_PLACEHOLDER, output.as_os_str()),
            ],
        )
        .filter(&SILENT_FILTER)
        .run();

        if let Err(e) = result {
            // A failed converter may leave a truncated drawable behind.
            if output.exists() {
                let _ = fs::remove_file(output);
            }
            return Err(e.context(format!(
                "Vector drawable conversion failed for `{}`",
                conversion.source.display()
            )));
        }
        Ok(())
    }

    fn optimize(&self, png: &Path) -> Result<()> {
        Cmd::from_slice(&self.tools.optipng)
            .arg(png)
            .run()
            .with_context(|| format!("Optimization failed for `{}`", png.display()))?;
        Ok(())
    }

    fn optimizes(&self) -> bool {
        self.tools.optimize
    }

    /// Only tools the order will actually call must be installed.
    fn preflight(&self, order: &WorkOrder) -> Result<()> {
        let fields = ToolsSection::FIELDS;
        let mut diag = ConfigDiagnostics::new();

        if !order.rasterizations.is_empty() {
            ToolsSection::check_installed(fields.svgexport, &self.tools.svgexport, &mut diag);
        }
        if !order.post_processing.is_empty() {
            ToolsSection::check_installed(fields.magick, &self.tools.magick, &mut diag);
        }
        if self.tools.optimize && !order.raster_outputs().is_empty() {
            ToolsSection::check_installed(fields.optipng, &self.tools.optipng, &mut diag);
        }
        if !order.conversions.is_empty() {
            ToolsSection::check_installed(fields.vector, &self.tools.vector, &mut diag);
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

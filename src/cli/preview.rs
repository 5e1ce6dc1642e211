//! The `preview` command: live vector drawable conversion of one SVG.
//!
//! Every change of the watched file is parsed with usvg first, so a broken
//! SVG is reported as a parse error instead of a converter failure.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::PreviewArgs;
use crate::config::DensifyConfig;
use crate::directive::SourceItem;
use crate::executor::{Executor, ExternalExecutor};
use crate::log;
use crate::logger::{status_error, status_success, status_unchanged};
use crate::resolve::{Conversion, WorkOrder};
use crate::utils::path::resolve_against;
use crate::watch::FileWatcher;

/// One successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Intrinsic SVG size in user units.
    pub width: f32,
    pub height: f32,
    pub xml: String,
}

pub fn run_preview(config: &DensifyConfig, args: &PreviewArgs, cwd: &Path) -> Result<()> {
    let source = resolve_against(cwd, &args.file);
    if !source.is_file() {
        bail!("`{}` is not a file", source.display());
    }
    let conversion = Conversion {
        output: preview_path(&config.build.work_dir, &source)?,
        source,
    };

    let executor = ExternalExecutor::new(config.tools.clone(), &config.build.work_dir);
    executor.preflight(&WorkOrder {
        conversions: vec![conversion.clone()],
        ..WorkOrder::default()
    })?;

    if args.once {
        let preview = convert_once(&executor, &conversion)?;
        println!("{}", preview.xml);
        return Ok(());
    }

    let mut watcher = FileWatcher::new(&conversion.source)?;
    log!("preview"; "watching {} (ctrl+c to stop)", conversion.source.display());

    let mut last = None;
    show(convert_once(&executor, &conversion), &mut last);
    while watcher.wait().is_some() {
        show(convert_once(&executor, &conversion), &mut last);
    }
    Ok(())
}

/// Validate `conversion.source` and convert it, returning the drawable XML.
pub fn convert_once<E: Executor>(executor: &E, conversion: &Conversion) -> Result<Preview> {
    let data = fs::read(&conversion.source)
        .with_context(|| format!("Failed to read `{}`", conversion.source.display()))?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .context("Failed to parse SVG")?;
    let size = tree.size();

    executor.convert_to_vector(conversion)?;
    let xml = fs::read_to_string(&conversion.output)
        .with_context(|| format!("Failed to read `{}`", conversion.output.display()))?;

    Ok(Preview {
        width: size.width(),
        height: size.height(),
        xml,
    })
}

fn show(result: Result<Preview>, last: &mut Option<Preview>) {
    match result {
        Ok(preview) if last.as_ref() == Some(&preview) => {
            status_unchanged("unchanged");
        }
        Ok(preview) => {
            status_success(&format!(
                "converted ({}x{})\n{}",
                preview.width,
                preview.height,
                preview.xml.trim_end()
            ));
            *last = Some(preview);
        }
        Err(e) => {
            status_error("preview failed", &format!("{e:#}"));
            *last = None;
        }
    }
}

/// `<work_dir>/preview/<base>.xml`
fn preview_path(work_dir: &Path, source: &Path) -> Result<PathBuf> {
    let Some(item) = SourceItem::parse(source, None) else {
        bail!("`{}` is not an SVG file", source.display());
    };
    Ok(work_dir
        .join("preview")
        .join(format!("{}.xml", item.base_name)))
}

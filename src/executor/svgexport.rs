//! svgexport batch file.
//!
//! ```json
//! [
//!   {
//!     "input": ["/abs/icon~tw24.svg"],
//!     "output": [["/abs/res/drawable-mdpi/icon.png", "24:"], ...]
//!   }
//! ]
//! ```
//!
//! Native-size outputs carry no size entry: `["/abs/res/.../icon.png"]`.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolve::Rasterization;
use crate::utils::path::normalize_path;

/// File name of the batch written into the work directory.
pub const OPS_FILE: &str = "svgexport_ops.json";

#[derive(Debug, Serialize)]
struct Entry {
    input: [String; 1],
    output: Vec<Vec<String>>,
}

fn entry(raster: &Rasterization) -> Entry {
    let abs = |p: &Path| normalize_path(p).to_string_lossy().into_owned();
    Entry {
        input: [abs(&raster.source)],
        output: raster
            .outputs
            .iter()
            .map(|target| {
                std::iter::once(abs(&target.path))
                    .chain(target.size.to_arg())
                    .collect()
            })
            .collect(),
    }
}

/// Render the batch as pretty JSON.
pub fn ops_json(batch: &[Rasterization]) -> Result<String> {
    let entries: Vec<Entry> = batch.iter().map(entry).collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize svgexport ops")
}

/// Write the batch into `work_dir` and return the file path.
pub fn write_ops_file(work_dir: &Path, batch: &[Rasterization]) -> Result<PathBuf> {
    fs::create_dir_all(work_dir)
        .with_context(|| format!("Failed to create `{}`", work_dir.display()))?;
    let path = work_dir.join(OPS_FILE);
    fs::write(&path, ops_json(batch)?)
        .with_context(|| format!("Failed to write `{}`", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::DensityTier;
    use crate::resolve::order::{OutputTarget, SizeSpec};
    use tempfile::TempDir;

    fn raster(size: SizeSpec) -> Rasterization {
        Rasterization {
            source: "/src/icon~tw24.svg".into(),
            outputs: vec![
                OutputTarget {
                    path: "/res/drawable-mdpi/icon.png".into(),
                    density: DensityTier::new("mdpi", 160),
                    size,
                },
            ],
        }
    }

    #[test]
    fn test_ops_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&ops_json(&[raster(SizeSpec::Width(24))]).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "input": ["/src/icon~tw24.svg"],
                "output": [["/res/drawable-mdpi/icon.png", "24:"]]
            }])
        );
    }

    #[test]
    fn test_native_output_has_no_size() {
        let json: serde_json::Value =
            serde_json::from_str(&ops_json(&[raster(SizeSpec::Native)]).unwrap()).unwrap();
        assert_eq!(json[0]["output"][0], serde_json::json!(["/res/drawable-mdpi/icon.png"]));
    }

    #[test]
    fn test_write_ops_file() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("build");
        let path = write_ops_file(&work, &[raster(SizeSpec::Height(36))]).unwrap();
        assert_eq!(path, work.join(OPS_FILE));
        assert!(fs::read_to_string(path).unwrap().contains(":36"));
    }
}

//! In-memory executor for tests.

use anyhow::{Result, bail};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

use super::Executor;
use crate::resolve::{Conversion, PostOp, Rasterization};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Convert(PathBuf),
    /// Output paths of the whole batch.
    Rasterize(Vec<PathBuf>),
    Post(PathBuf, &'static str),
    Optimize(PathBuf),
}

/// Records every call. Optionally writes placeholder outputs so freshness
/// checks see them, and fails on a chosen operation.
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<&'static str>,
    write_outputs: bool,
    optimize: bool,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            write_outputs: false,
            optimize: true,
        }
    }

    /// Fail when `operation` (`"convert"`, `"rasterize"`, `"post"`,
    /// `"optimize"`) is called.
    pub fn failing_on(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::new()
        }
    }

    pub fn writing_outputs(mut self) -> Self {
        self.write_outputs = true;
        self
    }

    pub fn without_optimize(mut self) -> Self {
        self.optimize = false;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<()> {
        self.calls.lock().push(call);
        if self.fail_on == Some(operation) {
            bail!("{operation} failed");
        }
        Ok(())
    }

    fn touch(&self, path: &Path) -> Result<()> {
        if self.write_outputs {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, b"out")?;
        }
        Ok(())
    }
}

impl Executor for RecordingExecutor {
    fn rasterize(&self, batch: &[Rasterization]) -> Result<()> {
        let outputs: Vec<PathBuf> = batch
            .iter()
            .flat_map(|r| r.outputs.iter().map(|o| o.path.clone()))
            .collect();
        self.record("rasterize", Call::Rasterize(outputs.clone()))?;
        outputs.iter().try_for_each(|p| self.touch(p))
    }

    fn post_process(&self, target: &Path, op: &PostOp) -> Result<()> {
        self.record("post", Call::Post(target.to_path_buf(), op.label()))
    }

    fn convert_to_vector(&self, conversion: &Conversion) -> Result<()> {
        self.record("convert", Call::Convert(conversion.source.clone()))?;
        self.touch(&conversion.output)
    }

    fn optimize(&self, png: &Path) -> Result<()> {
        self.record("optimize", Call::Optimize(png.to_path_buf()))
    }

    fn optimizes(&self) -> bool {
        self.optimize
    }
}

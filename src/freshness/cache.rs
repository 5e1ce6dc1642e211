//! Persisted source-hash cache for incremental rebuilds.
//!
//! The file is a flat JSON object, `{"<source file name>": "<blake3 hex>"}`.
//! Keys are file names, not paths: two sources with the same name in
//! different input directories share one entry. With different contents
//! only the last recorded hash survives, so one of them is stale on every
//! run.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::hash::{ContentHash, compute_file_hash};
use crate::directive::SourceItem;
use crate::error::BuildError;

/// Cache file name (inside the configured cache directory)
pub const CACHE_FILE: &str = "densify-cache.json";

#[derive(Debug)]
pub struct IncrementalCache {
    path: PathBuf,
    /// Committed entries, as loaded or recorded after success.
    entries: BTreeMap<String, String>,
    /// Fresh hashes of sources that will be regenerated this run.
    pending: FxHashMap<String, ContentHash>,
    /// Never skip, but still record new hashes.
    force: bool,
}

impl IncrementalCache {
    /// Empty cache bound to `path`.
    pub fn new(path: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
            pending: FxHashMap::default(),
            force,
        }
    }

    /// Load from disk. A missing, unreadable or corrupt file is an empty cache.
    pub fn load(path: impl Into<PathBuf>, force: bool) -> Self {
        let mut cache = Self::new(path, force);
        match read_entries(&cache.path) {
            Ok(entries) => {
                crate::debug!("cache"; "loaded {} entries from {}", entries.len(), cache.path.display());
                cache.entries = entries;
            }
            Err(e) => crate::log!("cache"; "{}, starting empty", e),
        }
        cache
    }

    /// Decide whether `item` can be skipped.
    ///
    /// Skips only when the stored hash equals the current content hash and
    /// every expected output exists. Otherwise the current hash is staged
    /// for [`record_success`](Self::record_success).
    pub fn should_skip(&mut self, item: &SourceItem, expected_outputs: &[&Path]) -> bool {
        let name = item.file_name();
        let hash = match compute_file_hash(&item.path) {
            Ok(hash) => hash,
            Err(e) => {
                crate::debug!("cache"; "cannot hash {}: {}", item.path.display(), e);
                self.pending.remove(&name);
                return false;
            }
        };

        let hash_matches = self.entries.get(&name).is_some_and(|h| *h == hash.to_hex());
        let outputs_exist = expected_outputs.iter().all(|p| p.exists());

        if !self.force && hash_matches && outputs_exist {
            crate::debug!("cache"; "fresh {} ({})", name, hash);
            return true;
        }

        crate::debug!(
            "cache";
            "stale {} (hash {}, outputs {}{})",
            name,
            if hash_matches { "same" } else { "changed" },
            if outputs_exist { "present" } else { "missing" },
            if self.force { ", forced" } else { "" }
        );
        self.pending.insert(name, hash);
        false
    }

    /// Commit the staged hash for `item`. Returns false if nothing was staged.
    pub fn record_success(&mut self, item: &SourceItem) -> bool {
        let name = item.file_name();
        match self.pending.remove(&name) {
            Some(hash) => {
                self.entries.insert(name, hash.to_hex());
                true
            }
            None => {
                crate::debug!("cache"; "no staged hash for {} (name shared with another source?)", name);
                false
            }
        }
    }

    /// Write all committed entries, replacing the file.
    pub fn persist(&self) -> Result<(), BuildError> {
        let write_err = |e| BuildError::CacheWrite(self.path.clone(), e);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        if file_content_matches(&self.path, &json) {
            crate::debug!("cache"; "unchanged, skipping write");
            return Ok(());
        }

        fs::write(&self.path, json).map_err(write_err)?;
        crate::debug!("cache"; "saved {} entries", self.entries.len());
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, BuildError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(BuildError::CacheRead(path.to_path_buf(), e)),
    };
    serde_json::from_str(&json).map_err(|e| {
        BuildError::CacheRead(
            path.to_path_buf(),
            io::Error::new(io::ErrorKind::InvalidData, e),
        )
    })
}

/// Check if file content is the same as new content
fn file_content_matches(path: &Path, content: &str) -> bool {
    path.exists() && fs::read_to_string(path).is_ok_and(|existing| existing == content)
}

#[cfg(test)]
impl IncrementalCache {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }
}

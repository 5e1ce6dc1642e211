//! Freshness detection: blake3 content hashes persisted per source file name.

mod cache;
mod hash;

pub use cache::{CACHE_FILE, IncrementalCache};

//! Content source abstraction for reading catalog text.

use anyhow::{Context, Result};
use camino::Utf8Path;

/// Trait for abstracting catalog I/O (filesystem vs. in-memory sources).
pub trait ContentSource {
    /// Read the catalog at the given logical path and return its text.
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String>;
}

/// Reads catalogs directly from the local filesystem.
pub struct FsSource;

impl ContentSource for FsSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        std::fs::read_to_string(path.as_str()).with_context(|| format!("Failed to read {}", path))
    }
}

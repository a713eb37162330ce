//! Catalog loading: source I/O, format detection, and raw-value parsing.
//!
//! Loading is the one fallible stage of the pipeline. A failure here is
//! terminal for the session: the caller surfaces the single error message and
//! renders no partial tree. Malformed individual records are *not* errors —
//! they are normalized away during [`Catalog::build`].

pub mod source;

pub use source::{ContentSource, FsSource};

use camino::Utf8Path;
use serde_json::Value;
use thiserror::Error;

use crate::build::BuildOutcome;
use crate::model::Catalog;

/// Terminal load failure, one human-readable message per kind.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the catalog source failed.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: anyhow::Error,
    },
    /// The source text is not a valid catalog document.
    #[error("failed to parse catalog {path}: {message}")]
    Parse { path: String, message: String },
}

/// Input format of a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Detect the format from a file extension. YAML is the default: the
    /// canonical feed is a `data.yaml` file.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("json") => CatalogFormat::Json,
            _ => CatalogFormat::Yaml,
        }
    }
}

/// Loads catalogs through a [`ContentSource`].
pub struct CatalogLoader<S: ContentSource> {
    source: S,
}

impl<S: ContentSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Read, parse, and build the catalog at `path`. The format is detected
    /// from the extension.
    pub fn load(&mut self, path: impl AsRef<Utf8Path>) -> Result<BuildOutcome, LoadError> {
        let path = path.as_ref();
        let text = self
            .source
            .read_to_string(path)
            .map_err(|source| LoadError::Io {
                path: path.to_string(),
                source,
            })?;
        parse_catalog_str(&text, CatalogFormat::from_path(path), path.as_str())
    }
}

/// Parse catalog text that is already in memory.
///
/// `origin` labels the text in error messages (a path, a URL, `"<stdin>"`).
pub fn parse_catalog_str(
    text: &str,
    format: CatalogFormat,
    origin: &str,
) -> Result<BuildOutcome, LoadError> {
    let raw: Value = match format {
        CatalogFormat::Yaml => {
            serde_yaml_ng::from_str(text).map_err(|e| LoadError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })?
        }
        CatalogFormat::Json => serde_json::from_str(text).map_err(|e| LoadError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?,
    };
    if !raw.is_object() {
        return Err(LoadError::Parse {
            path: origin.to_string(),
            message: "top level of a catalog must be a mapping".to_string(),
        });
    }
    Ok(Catalog::build(&raw))
}

/// Convenience: load a catalog file from the filesystem.
pub fn load_catalog_file(path: impl AsRef<Utf8Path>) -> Result<BuildOutcome, LoadError> {
    CatalogLoader::new(FsSource).load(path)
}

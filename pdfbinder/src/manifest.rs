//! JSON merge manifests.
//!
//! A manifest lists the documents to merge, their optional page ranges, the
//! selection mode and the output name:
//!
//! ```json
//! {
//!   "output": "binder.pdf",
//!   "mode": "select",
//!   "documents": [
//!     { "path": "a.pdf" },
//!     { "path": "b.pdf", "pages": "2,4" }
//!   ]
//! }
//! ```
//!
//! Relative paths are resolved against the manifest's own directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{InputSpec, MergeMode};
use crate::error::{PdfBinderError, Result};

/// One document entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDocument {
    /// Path to the PDF.
    pub path: PathBuf,
    /// Range expression, used in select mode.
    #[serde(default)]
    pub pages: Option<String>,
}

/// A parsed merge manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Output file name or path.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Selection mode for every document.
    #[serde(default)]
    pub mode: MergeMode,
    /// Documents in merge order.
    pub documents: Vec<ManifestDocument>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBinderError::InvalidManifest`] naming `origin` if the text
    /// is not a valid manifest.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| PdfBinderError::invalid_manifest(origin.to_path_buf(), err.to_string()))
    }

    /// Read and parse a manifest file, resolving relative paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                PdfBinderError::file_not_found(path.to_path_buf())
            } else {
                PdfBinderError::FailedToRead {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        let manifest = Self::from_json(&text, path)?;
        debug!(
            path = %path.display(),
            documents = manifest.documents.len(),
            "manifest loaded"
        );

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(manifest.resolve_against(base))
    }

    /// Make every relative path relative to `base` instead.
    pub fn resolve_against(mut self, base: &Path) -> Self {
        for document in &mut self.documents {
            if document.path.is_relative() {
                document.path = base.join(&document.path);
            }
        }
        if let Some(output) = self.output.as_mut()
            && output.is_relative()
        {
            *output = base.join(&*output);
        }
        self
    }

    /// Inputs in merge order.
    pub fn inputs(&self) -> Vec<InputSpec> {
        self.documents
            .iter()
            .map(|document| InputSpec {
                path: document.path.clone(),
                pages: document.pages.clone(),
            })
            .collect()
    }
}

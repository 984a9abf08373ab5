//! Source documents taking part in a merge.
//!
//! A [`Document`] is an immutable, uploaded PDF payload with a stable
//! identifier. Its page count is queried lazily through a [`Codec`] the first
//! time it is needed and cached afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::error::CodecError;
use crate::merge::Codec;
use crate::utils::format_file_size;

/// Stable identifier of a source document within one merge list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One source PDF.
///
/// The payload is opaque to everything except the codec. Documents are shared
/// as `Arc<Document>` between the merge list, plan requests and merge plans.
pub struct Document {
    id: DocumentId,
    name: String,
    payload: Vec<u8>,
    page_count: OnceLock<usize>,
}

impl Document {
    /// Create a document from its raw bytes.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable identifier, unique within a merge list
    /// * `name` - Display name (usually the file name)
    /// * `payload` - Raw PDF bytes
    pub fn new(id: impl Into<DocumentId>, name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payload,
            page_count: OnceLock::new(),
        }
    }

    /// Seed the page count when it is already known, skipping the codec query.
    ///
    /// Replaces any count seeded or cached before.
    pub fn with_page_count(self, page_count: usize) -> Self {
        Self {
            page_count: OnceLock::from(page_count),
            ..self
        }
    }

    /// Identifier of this document.
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Display name of this document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw PDF bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }

    /// Payload size as a human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.size())
    }

    /// Page count if it has already been queried.
    pub fn cached_page_count(&self) -> Option<usize> {
        self.page_count.get().copied()
    }

    /// Total number of pages, asking the codec on first use.
    ///
    /// Failures are not cached: a later call asks the codec again.
    ///
    /// # Errors
    ///
    /// Returns the codec's error when the payload cannot be read.
    pub fn page_count<C: Codec + ?Sized>(&self, codec: &C) -> Result<usize, CodecError> {
        if let Some(count) = self.page_count.get() {
            return Ok(*count);
        }

        let count = codec.page_count(self)?;
        Ok(*self.page_count.get_or_init(|| count))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &self.payload.len())
            .field("page_count", &self.page_count.get())
            .finish()
    }
}

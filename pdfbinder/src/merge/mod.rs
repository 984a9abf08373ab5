//! PDF codec boundary, its lopdf implementation, and the merge driver.
//!
//! Everything above the codec treats PDF payloads as opaque bytes. The
//! [`Codec`] trait is the only place that knows how to count pages and how to
//! copy pages between documents.

mod assembler;
pub mod merger;
pub mod pages;

pub use assembler::LopdfCodec;
pub use merger::{MergeResult, MergeStatistics, Merger, PreparedInputs};

use crate::document::Document;
use crate::error::CodecError;
use crate::plan::MergePlan;

/// Reads page counts from source documents and assembles merge plans.
///
/// Implementations must be deterministic for a given input: the same plan
/// always yields the same page sequence.
pub trait Codec {
    /// Number of pages in `document`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Unreadable`] or [`CodecError::Encrypted`] when
    /// the payload cannot be read.
    fn page_count(&self, document: &Document) -> Result<usize, CodecError>;

    /// Produce one PDF containing exactly the plan's page stream, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read, a planned page is
    /// missing, the plan is empty, or serialization fails.
    fn assemble(&self, plan: &MergePlan) -> Result<Vec<u8>, CodecError>;
}

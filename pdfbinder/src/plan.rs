//! Merge planning.
//!
//! The planner turns the user's ordered list of documents, each with a
//! [`SelectionMode`], into a [`MergePlan`]: the exact sequence of
//! (document, pages) pairs the codec will emit. Validation is eager and
//! aggregated. Every document is resolved and every failure is reported
//! together, so a user fixes all problems in one pass.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbinder::document::Document;
//! use pdfbinder::merge::LopdfCodec;
//! use pdfbinder::plan::{MergePlanner, PlanRequest};
//! use std::sync::Arc;
//!
//! # fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let codec = LopdfCodec::default();
//! let requests = vec![
//!     PlanRequest::whole(Arc::new(Document::new("a", "a.pdf", a))),
//!     PlanRequest::selected(Arc::new(Document::new("b", "b.pdf", b)), "2,4"),
//! ];
//!
//! let plan = MergePlanner::new(&codec).plan(&requests)?;
//! println!("{} pages selected", plan.total_pages());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::document::{Document, DocumentId};
use crate::error::{DocumentError, DocumentFailure, PlanError};
use crate::merge::Codec;
use crate::range::{self, PageSelection, RangeOutcome};

/// How pages are chosen from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Every page, in document order.
    WholeDocument,
    /// Pages named by a range expression.
    SelectedPages(String),
}

/// One document of the ordered merge input.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// The source document.
    pub document: Arc<Document>,
    /// How to choose its pages.
    pub mode: SelectionMode,
}

impl PlanRequest {
    /// Request every page of `document`.
    pub fn whole(document: Arc<Document>) -> Self {
        Self {
            document,
            mode: SelectionMode::WholeDocument,
        }
    }

    /// Request the pages named by `expression`.
    pub fn selected(document: Arc<Document>, expression: impl Into<String>) -> Self {
        Self {
            document,
            mode: SelectionMode::SelectedPages(expression.into()),
        }
    }
}

/// A document paired with the pages to take from it.
#[derive(Debug, Clone)]
pub struct MergeEntry {
    document: Arc<Document>,
    selection: PageSelection,
}

impl MergeEntry {
    /// The source document.
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    /// The pages to copy, in output order.
    pub fn selection(&self) -> &PageSelection {
        &self.selection
    }
}

/// Ordered list of entries that fully determines the output page stream.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    entries: Vec<MergeEntry>,
}

impl MergePlan {
    /// Entries in output order.
    pub fn entries(&self) -> &[MergeEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the plan has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of output pages.
    pub fn total_pages(&self) -> usize {
        self.entries.iter().map(|e| e.selection.len()).sum()
    }

    /// The output page stream as (document, 1-based page) pairs.
    pub fn page_stream(&self) -> impl Iterator<Item = (&Document, usize)> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .selection
                .iter()
                .map(move |page| (entry.document.as_ref(), page))
        })
    }
}

/// Planner behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Treat a blank range expression as an error instead of "all pages".
    pub require_explicit_ranges: bool,
}

/// Per-document line of a [`PlanPreview`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    /// Document identifier.
    pub document: DocumentId,
    /// Display name.
    pub name: String,
    /// Payload size in bytes.
    pub size: u64,
    /// Page count, if it could be read.
    pub page_count: Option<usize>,
    /// Number of pages selected, if the selection resolved.
    pub selected: Option<usize>,
    /// Why the selection failed, if it did.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "display_error")]
    pub error: Option<DocumentError>,
}

fn display_error<S: serde::Serializer>(
    error: &Option<DocumentError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Resolution status of every document, without building a plan.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPreview {
    /// One row per requested document, in request order.
    pub rows: Vec<PreviewRow>,
}

impl PlanPreview {
    /// Total number of selected pages across documents that resolved.
    pub fn total_selected(&self) -> usize {
        self.rows.iter().filter_map(|row| row.selected).sum()
    }

    /// True if any document failed to resolve.
    pub fn has_errors(&self) -> bool {
        self.rows.iter().any(|row| row.error.is_some())
    }

    /// Failures in request order.
    pub fn failures(&self) -> Vec<DocumentFailure> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.error.clone().map(|error| DocumentFailure {
                    document: row.document.clone(),
                    name: row.name.clone(),
                    error,
                })
            })
            .collect()
    }

    /// True if a merge can start: no errors and at least one page selected.
    pub fn is_ready(&self) -> bool {
        !self.has_errors() && self.total_selected() > 0
    }
}

/// Resolves ordered plan requests into a [`MergePlan`].
pub struct MergePlanner<'a, C: Codec + ?Sized> {
    codec: &'a C,
    options: PlannerOptions,
}

impl<'a, C: Codec + ?Sized> MergePlanner<'a, C> {
    /// Create a planner that queries page counts through `codec`.
    pub fn new(codec: &'a C) -> Self {
        Self::with_options(codec, PlannerOptions::default())
    }

    /// Create a planner with explicit options.
    pub fn with_options(codec: &'a C, options: PlannerOptions) -> Self {
        Self { codec, options }
    }

    /// Build the merge plan for `requests`, in the given order.
    ///
    /// Documents with zero pages requested as a whole are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] listing every document that failed to
    /// resolve. No partial plan is returned.
    #[instrument(skip_all, fields(documents = requests.len()))]
    pub fn plan(&self, requests: &[PlanRequest]) -> Result<MergePlan, PlanError> {
        let mut entries = Vec::with_capacity(requests.len());
        let mut failures = Vec::new();

        for request in requests {
            match self.resolve(request) {
                Ok(selection) if selection.is_empty() => {
                    debug!(document = %request.document.id(), "skipping document without pages");
                }
                Ok(selection) => entries.push(MergeEntry {
                    document: Arc::clone(&request.document),
                    selection,
                }),
                Err(error) => failures.push(DocumentFailure {
                    document: request.document.id().clone(),
                    name: request.document.name().to_string(),
                    error,
                }),
            }
        }

        if !failures.is_empty() {
            debug!(failed = failures.len(), "plan rejected");
            return Err(PlanError::new(failures));
        }

        let plan = MergePlan { entries };
        debug!(
            entries = plan.len(),
            pages = plan.total_pages(),
            "plan resolved"
        );
        Ok(plan)
    }

    /// Resolve every request and report per-document status.
    pub fn preview(&self, requests: &[PlanRequest]) -> PlanPreview {
        let rows = requests
            .iter()
            .map(|request| {
                let document = &request.document;
                let (selected, error) = match self.resolve(request) {
                    Ok(selection) => (Some(selection.len()), None),
                    Err(error) => (None, Some(error)),
                };

                PreviewRow {
                    document: document.id().clone(),
                    name: document.name().to_string(),
                    size: document.size(),
                    page_count: document.cached_page_count(),
                    selected,
                    error,
                }
            })
            .collect();

        PlanPreview { rows }
    }

    /// Resolve the page selection of one request.
    fn resolve(&self, request: &PlanRequest) -> Result<PageSelection, DocumentError> {
        let page_count = request.document.page_count(self.codec)?;

        match &request.mode {
            SelectionMode::WholeDocument => Ok(PageSelection::all(page_count)),
            SelectionMode::SelectedPages(expression) => {
                match range::parse(expression, page_count)? {
                    RangeOutcome::WholeDocument if self.options.require_explicit_ranges => {
                        Err(DocumentError::MissingRange)
                    }
                    outcome => Ok(outcome.into_selection(page_count)),
                }
            }
        }
    }
}

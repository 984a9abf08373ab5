//! Editable merge list.
//!
//! A [`MergeList`] holds the documents a user has added, their order, a
//! range expression per document and the current [`MergeMode`]. Range text
//! is kept when switching modes, so switching back restores it.
//!
//! ```
//! use pdfbinder::config::MergeMode;
//! use pdfbinder::document::{Document, DocumentId};
//! use pdfbinder::session::MergeList;
//! use std::sync::Arc;
//!
//! let mut list = MergeList::new();
//! list.add(Arc::new(Document::new("a", "a.pdf", Vec::new()).with_page_count(3))).unwrap();
//! list.add(Arc::new(Document::new("b", "b.pdf", Vec::new()).with_page_count(5))).unwrap();
//! list.move_up(&DocumentId::new("b"));
//! list.set_mode(MergeMode::SelectRanges);
//! list.set_range(&DocumentId::new("b"), "2,4").unwrap();
//!
//! assert_eq!(list.requests().len(), 2);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::MergeMode;
use crate::document::{Document, DocumentId};
use crate::error::SessionError;
use crate::merge::Codec;
use crate::plan::{MergePlanner, PlanPreview, PlanRequest, PlannerOptions};

/// Fewest documents an interactive merge list accepts for merging.
pub const MIN_MERGE_DOCUMENTS: usize = 2;

/// Ordered, user-editable list of documents to merge.
#[derive(Debug, Clone, Default)]
pub struct MergeList {
    documents: Vec<Arc<Document>>,
    ranges: HashMap<DocumentId, String>,
    mode: MergeMode,
    options: PlannerOptions,
}

impl MergeList {
    /// Create an empty list in [`MergeMode::AllPages`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list with planner options.
    pub fn with_options(options: PlannerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Documents in merge order.
    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if the list has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Current selection mode.
    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Switch selection mode. Range text is preserved.
    pub fn set_mode(&mut self, mode: MergeMode) {
        self.mode = mode;
    }

    /// Append a document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicateDocument`] if the id is already listed.
    pub fn add(&mut self, document: Arc<Document>) -> Result<(), SessionError> {
        if self.position(document.id()).is_some() {
            return Err(SessionError::DuplicateDocument(document.id().clone()));
        }
        self.documents.push(document);
        Ok(())
    }

    /// Remove a document and its range text.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownDocument`] if the id is not listed.
    pub fn remove(&mut self, id: &DocumentId) -> Result<Arc<Document>, SessionError> {
        let index = self.index_of(id)?;
        self.ranges.remove(id);
        Ok(self.documents.remove(index))
    }

    /// Move a document one place earlier. Returns false at the top or if unknown.
    pub fn move_up(&mut self, id: &DocumentId) -> bool {
        match self.position(id) {
            Some(index) if index > 0 => {
                self.documents.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Move a document one place later. Returns false at the bottom or if unknown.
    pub fn move_down(&mut self, id: &DocumentId) -> bool {
        match self.position(id) {
            Some(index) if index + 1 < self.documents.len() => {
                self.documents.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Move a document to `index`, shifting the others.
    ///
    /// Indexes past the end move the document to the end. Returns false if
    /// the document is unknown or already there.
    pub fn move_to(&mut self, id: &DocumentId, index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = index.min(self.documents.len() - 1);
        if from == to {
            return false;
        }

        let document = self.documents.remove(from);
        self.documents.insert(to, document);
        true
    }

    /// Replace the order with `order`, e.g. the result of a drag and drop.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidOrder`] unless `order` names every
    /// listed document exactly once.
    pub fn reorder(&mut self, order: &[DocumentId]) -> Result<(), SessionError> {
        if order.len() != self.documents.len() {
            return Err(SessionError::InvalidOrder(format!(
                "expected {} documents, got {}",
                self.documents.len(),
                order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(order.len());
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if !seen.insert(id) {
                return Err(SessionError::InvalidOrder(format!("'{id}' is listed twice")));
            }
            let index = self
                .position(id)
                .ok_or_else(|| SessionError::InvalidOrder(format!("'{id}' is not in the list")))?;
            reordered.push(Arc::clone(&self.documents[index]));
        }

        self.documents = reordered;
        Ok(())
    }

    /// Store the range expression for a document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownDocument`] if the id is not listed.
    pub fn set_range(
        &mut self,
        id: &DocumentId,
        expression: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.index_of(id)?;
        self.ranges.insert(id.clone(), expression.into());
        Ok(())
    }

    /// Range text stored for a document, if any.
    pub fn range(&self, id: &DocumentId) -> Option<&str> {
        self.ranges.get(id).map(String::as_str)
    }

    /// Plan requests in list order, according to the current mode.
    pub fn requests(&self) -> Vec<PlanRequest> {
        self.documents
            .iter()
            .map(|document| PlanRequest {
                document: Arc::clone(document),
                mode: self.mode.selection_for(self.range(document.id())),
            })
            .collect()
    }

    /// Resolve every document and report whether a merge may start.
    ///
    /// See [`PlanPreview::is_ready`].
    pub fn readiness<C: Codec + ?Sized>(&self, codec: &C) -> PlanPreview {
        MergePlanner::with_options(codec, self.options).preview(&self.requests())
    }

    /// True if the merge action may be offered: at least
    /// [`MIN_MERGE_DOCUMENTS`] documents listed and a ready preview.
    pub fn can_merge<C: Codec + ?Sized>(&self, codec: &C) -> bool {
        self.len() >= MIN_MERGE_DOCUMENTS && self.readiness(codec).is_ready()
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id() == id)
    }

    fn index_of(&self, id: &DocumentId) -> Result<usize, SessionError> {
        self.position(id)
            .ok_or_else(|| SessionError::UnknownDocument(id.clone()))
    }
}

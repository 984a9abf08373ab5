//! Editing a merge list and assembling it with the real codec.

use pdfbinder::config::MergeMode;
use pdfbinder::document::{Document, DocumentId};
use pdfbinder::merge::{Codec, LopdfCodec};
use pdfbinder::plan::MergePlanner;
use pdfbinder::session::MergeList;
use std::sync::Arc;

use crate::common::{labelled_pdf, page_labels};

fn document(id: &str, label: &str, pages: usize) -> Arc<Document> {
    Arc::new(Document::new(id, format!("{id}.pdf"), labelled_pdf(label, pages)))
}

#[test]
fn test_reordered_list_merges_in_new_order() {
    let codec = LopdfCodec::default();
    let mut list = MergeList::new();
    list.add(document("a", "A", 1)).unwrap();
    list.add(document("b", "B", 1)).unwrap();
    list.add(document("c", "C", 1)).unwrap();

    list.reorder(&[
        DocumentId::new("c"),
        DocumentId::new("a"),
        DocumentId::new("b"),
    ])
    .unwrap();

    let plan = MergePlanner::new(&codec).plan(&list.requests()).unwrap();
    let bytes = codec.assemble(&plan).unwrap();
    assert_eq!(page_labels(&bytes), vec!["C-1", "A-1", "B-1"]);
}

#[test]
fn test_readiness_follows_mode_and_ranges() {
    let codec = LopdfCodec::default();
    let mut list = MergeList::new();
    list.add(document("a", "A", 3)).unwrap();

    list.set_range(&DocumentId::new("a"), "9").unwrap();
    assert!(list.readiness(&codec).is_ready());

    list.set_mode(MergeMode::SelectRanges);
    assert!(!list.readiness(&codec).is_ready());

    list.set_range(&DocumentId::new("a"), "2-3").unwrap();
    let preview = list.readiness(&codec);
    assert!(preview.is_ready());
    assert_eq!(preview.total_selected(), 2);
}

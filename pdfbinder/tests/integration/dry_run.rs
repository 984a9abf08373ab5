//! Previews computed without assembling output.

use pdfbinder::config::{InputSpec, MergeMode};
use pdfbinder::error::{DocumentError, RangeError};
use pdfbinder::merge::Merger;
use tempfile::TempDir;

use crate::common::{config, write_pdf};

#[tokio::test]
async fn test_preview_counts_selected_pages() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 4);
    let b = write_pdf(&dir, "b.pdf", "B", 2);
    let output = dir.path().join("out.pdf");

    let mut config = config(
        vec![InputSpec::new(&a).with_pages("1,3"), InputSpec::new(&b)],
        output.clone(),
        MergeMode::SelectRanges,
    );
    config.dry_run = true;

    let preview = Merger::from_config(&config).preview(&config).await.unwrap();

    assert!(preview.is_ready());
    assert_eq!(preview.total_selected(), 4);
    assert_eq!(preview.rows[0].page_count, Some(4));
    assert_eq!(preview.rows[0].selected, Some(2));
    assert_eq!(preview.rows[1].name, "b.pdf");
    assert!(!output.exists());
}

#[tokio::test]
async fn test_preview_reports_every_failure() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 2);
    let b = write_pdf(&dir, "b.pdf", "B", 2);

    let config = config(
        vec![
            InputSpec::new(&a).with_pages("5"),
            InputSpec::new(&b).with_pages("1-x"),
        ],
        dir.path().join("out.pdf"),
        MergeMode::SelectRanges,
    );

    let preview = Merger::from_config(&config).preview(&config).await.unwrap();

    assert!(preview.has_errors());
    assert!(!preview.is_ready());
    assert_eq!(preview.failures().len(), 2);
    assert!(matches!(
        preview.rows[0].error,
        Some(DocumentError::Range(RangeError::OutOfBounds { .. }))
    ));
    assert!(matches!(
        preview.rows[1].error,
        Some(DocumentError::Range(RangeError::MalformedToken { .. }))
    ));
}

#[tokio::test]
async fn test_preview_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 3);

    let config = config(
        vec![InputSpec::new(&a)],
        dir.path().join("out.pdf"),
        MergeMode::AllPages,
    );

    let preview = Merger::from_config(&config).preview(&config).await.unwrap();
    let json = serde_json::to_value(&preview).unwrap();

    assert_eq!(json["rows"][0]["pageCount"], 3);
    assert_eq!(json["rows"][0]["selected"], 3);
    assert!(json["rows"][0].get("error").is_none());
}

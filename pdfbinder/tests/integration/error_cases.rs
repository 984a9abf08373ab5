//! Failures surfaced to the user.

use pdfbinder::PdfBinderError;
use pdfbinder::config::{InputSpec, MergeMode};
use pdfbinder::document::DocumentId;
use pdfbinder::error::{CodecError, DocumentError, RangeError};
use pdfbinder::io::PdfWriter;
use pdfbinder::merge::Merger;
use tempfile::TempDir;

use crate::common::{config, write_pdf};

#[tokio::test]
async fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 1);
    let missing = dir.path().join("missing.pdf");

    let config = config(
        vec![InputSpec::new(&a), InputSpec::new(&missing)],
        dir.path().join("out.pdf"),
        MergeMode::AllPages,
    );

    let err = Merger::from_config(&config).merge(&config).await.unwrap_err();
    assert!(matches!(err, PdfBinderError::FileNotFound { ref path } if *path == missing));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_directory_input() {
    let dir = TempDir::new().unwrap();

    let config = config(
        vec![InputSpec::new(dir.path())],
        dir.path().join("out.pdf"),
        MergeMode::AllPages,
    );

    let err = Merger::from_config(&config).merge(&config).await.unwrap_err();
    assert!(matches!(err, PdfBinderError::NotAFile { .. }));
}

#[tokio::test]
async fn test_plan_errors_are_aggregated() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 3);
    let b = write_pdf(&dir, "b.pdf", "B", 3);
    let junk = dir.path().join("junk.pdf");
    std::fs::write(&junk, b"%PDF-1.4 definitely not a document").unwrap();

    let config = config(
        vec![
            InputSpec::new(&a).with_pages("3-1"),
            InputSpec::new(&b).with_pages("2"),
            InputSpec::new(&junk).with_pages("1"),
        ],
        dir.path().join("out.pdf"),
        MergeMode::SelectRanges,
    );

    let err = Merger::from_config(&config).merge(&config).await.unwrap_err();
    let PdfBinderError::Plan(plan_error) = err else {
        panic!("expected a plan error, got {err:?}");
    };

    assert_eq!(plan_error.len(), 2);
    assert!(matches!(
        plan_error.failures()[0].error,
        DocumentError::Range(RangeError::DescendingRange { start: 3, end: 1, .. })
    ));
    assert!(matches!(
        plan_error.failures()[1].error,
        DocumentError::Codec(CodecError::Unreadable { .. })
    ));
    assert!(
        plan_error
            .failure_for(&DocumentId::new(b.display().to_string()))
            .is_none()
    );
}

#[tokio::test]
async fn test_required_ranges() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 2);

    let mut config = config(
        vec![InputSpec::new(&a)],
        dir.path().join("out.pdf"),
        MergeMode::SelectRanges,
    );
    config.require_ranges = true;

    let err = Merger::from_config(&config).merge(&config).await.unwrap_err();
    let PdfBinderError::Plan(plan_error) = err else {
        panic!("expected a plan error, got {err:?}");
    };
    assert_eq!(plan_error.failures()[0].error, DocumentError::MissingRange);
}

#[tokio::test]
async fn test_blank_range_without_requirement_takes_every_page() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 2);

    let config = config(
        vec![InputSpec::new(&a).with_pages(" , ")],
        dir.path().join("out.pdf"),
        MergeMode::SelectRanges,
    );

    let result = Merger::from_config(&config).merge(&config).await.unwrap();
    assert_eq!(result.statistics.total_pages, 2);
}

#[tokio::test]
async fn test_ranges_outside_select_mode_are_rejected() {
    let config = config(
        vec![InputSpec::new("a.pdf").with_pages("1")],
        "out.pdf".into(),
        MergeMode::AllPages,
    );

    let err = config.validate().unwrap_err();
    assert!(matches!(err, PdfBinderError::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_existing_output_is_detected() {
    let dir = TempDir::new().unwrap();
    let output = write_pdf(&dir, "out.pdf", "O", 1);
    let writer = PdfWriter::new();

    assert!(writer.exists(&output).await);
    assert!(!writer.exists(&dir.path().join("other.pdf")).await);
}

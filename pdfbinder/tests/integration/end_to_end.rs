//! Full read, plan, assemble and write cycles.

use pdfbinder::config::{CompressionLevel, InputSpec, MergeMode};
use pdfbinder::io::PdfWriter;
use pdfbinder::manifest::Manifest;
use pdfbinder::merge::Merger;
use tempfile::TempDir;

use crate::common::{config, expected, file_labels, page_labels, write_pdf};

#[tokio::test]
async fn test_merge_all_pages_in_order() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 2);
    let b = write_pdf(&dir, "b.pdf", "B", 3);
    let output = dir.path().join("out.pdf");

    let config = config(
        vec![InputSpec::new(&a), InputSpec::new(&b)],
        output.clone(),
        MergeMode::AllPages,
    );
    config.validate().unwrap();

    let result = Merger::from_config(&config).merge(&config).await.unwrap();
    assert_eq!(result.statistics.files_merged, 2);
    assert_eq!(result.statistics.total_pages, 5);
    assert!(result.statistics.compressed);

    let stats = PdfWriter::new().write(result.bytes, &output).await.unwrap();
    assert!(stats.file_size > 0);

    let mut want = expected("A", 1..=2);
    want.extend(expected("B", 1..=3));
    assert_eq!(file_labels(&output), want);
}

#[tokio::test]
async fn test_merge_selected_ranges() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 5);
    let b = write_pdf(&dir, "b.pdf", "B", 4);

    let config = config(
        vec![
            InputSpec::new(&a).with_pages("4-5, 1"),
            InputSpec::new(&b),
        ],
        dir.path().join("out.pdf"),
        MergeMode::SelectRanges,
    );

    let result = Merger::from_config(&config).merge(&config).await.unwrap();

    assert_eq!(
        page_labels(&result.bytes),
        vec!["A-4", "A-5", "A-1", "B-1", "B-2", "B-3", "B-4"]
    );
}

#[tokio::test]
async fn test_same_file_twice_with_repeated_pages() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 3);

    let config = config(
        vec![
            InputSpec::new(&a).with_pages("2,2"),
            InputSpec::new(&a).with_pages("3"),
        ],
        dir.path().join("out.pdf"),
        MergeMode::SelectRanges,
    );

    let result = Merger::from_config(&config).merge(&config).await.unwrap();
    assert_eq!(page_labels(&result.bytes), vec!["A-2", "A-2", "A-3"]);
}

#[tokio::test]
async fn test_uncompressed_merge() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(&dir, "a.pdf", "A", 1);

    let mut config = config(
        vec![InputSpec::new(&a)],
        dir.path().join("out.pdf"),
        MergeMode::AllPages,
    );
    config.compression = CompressionLevel::None;

    let result = Merger::from_config(&config).merge(&config).await.unwrap();
    assert!(!result.statistics.compressed);
    assert_eq!(page_labels(&result.bytes), vec!["A-1"]);
}

#[tokio::test]
async fn test_merge_from_manifest() {
    let dir = TempDir::new().unwrap();
    write_pdf(&dir, "a.pdf", "A", 3);
    write_pdf(&dir, "b.pdf", "B", 2);

    let manifest_path = dir.path().join("binder.json");
    std::fs::write(
        &manifest_path,
        r#"{
            "output": "bound.pdf",
            "mode": "select",
            "documents": [
                { "path": "b.pdf", "pages": "2" },
                { "path": "a.pdf", "pages": "1-2" }
            ]
        }"#,
    )
    .unwrap();

    let manifest = Manifest::load(&manifest_path).await.unwrap();
    let output = manifest.output.clone().unwrap();
    assert_eq!(output, dir.path().join("bound.pdf"));

    let config = config(manifest.inputs(), output.clone(), manifest.mode);
    config.validate().unwrap();

    let result = Merger::from_config(&config).merge(&config).await.unwrap();
    PdfWriter::new().write(result.bytes, &output).await.unwrap();

    assert_eq!(file_labels(&output), vec!["B-2", "A-1", "A-2"]);
}

#[tokio::test]
async fn test_limited_jobs_keep_input_order() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<InputSpec> = (1..=6)
        .map(|n| InputSpec::new(write_pdf(&dir, &format!("{n}.pdf"), &format!("D{n}"), 1)))
        .collect();

    let mut config = config(inputs, dir.path().join("out.pdf"), MergeMode::AllPages);
    config.jobs = Some(2);

    let result = Merger::from_config(&config).merge(&config).await.unwrap();
    let want: Vec<String> = (1..=6).map(|n| format!("D{n}-1")).collect();
    assert_eq!(page_labels(&result.bytes), want);
}

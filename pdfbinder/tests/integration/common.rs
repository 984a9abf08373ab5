//! Shared helpers for the integration tests.
//!
//! Fixtures are generated on the fly: page `n` of a labelled PDF draws the
//! text `{label}-{n}`, so merged output can be checked page by page.

#![allow(dead_code)]

use lopdf::{Dictionary, Document as PdfDocument, Object, Stream, dictionary};
use pdfbinder::config::{CompressionLevel, Config, InputSpec, MergeMode, OverwriteMode};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build a PDF with `pages` labelled pages.
pub fn labelled_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for number in 1..=pages {
        let content = format!("BT /F1 12 Tf 50 700 Td ({label}-{number}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// Write a labelled PDF into `dir` and return its path.
pub fn write_pdf(dir: &TempDir, name: &str, label: &str, pages: usize) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, labelled_pdf(label, pages)).expect("Failed to write fixture");
    path
}

/// The label drawn on every page of `bytes`, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = PdfDocument::load_mem(bytes).expect("Merged output is not a PDF");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = doc.get_page_content(page_id).expect("Page has no content");
            let content = String::from_utf8_lossy(&content);
            let start = content.find('(').expect("No label") + 1;
            let end = content.find(')').expect("No label");
            content[start..end].to_string()
        })
        .collect()
}

/// Labels of a PDF file on disk.
pub fn file_labels(path: &Path) -> Vec<String> {
    page_labels(&std::fs::read(path).expect("Failed to read output"))
}

/// A quiet config that merges `inputs` into `output`.
pub fn config(inputs: Vec<InputSpec>, output: PathBuf, mode: MergeMode) -> Config {
    Config {
        inputs,
        output,
        mode,
        dry_run: false,
        verbose: false,
        quiet: true,
        overwrite_mode: OverwriteMode::Force,
        compression: CompressionLevel::Standard,
        jobs: None,
        require_ranges: false,
    }
}

/// Labels `{label}-1` through `{label}-{pages}`.
pub fn expected(label: &str, pages: impl IntoIterator<Item = usize>) -> Vec<String> {
    pages.into_iter().map(|n| format!("{label}-{n}")).collect()
}

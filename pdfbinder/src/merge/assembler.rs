//! Merge plan assembly with lopdf.

use lopdf::{Document as PdfDocument, ObjectId, dictionary};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

use crate::config::CompressionLevel;
use crate::document::{Document, DocumentId};
use crate::error::CodecError;
use crate::merge::Codec;
use crate::merge::pages::{flatten_page, page_tree, page_tree_nodes, relink};
use crate::plan::MergePlan;

/// PDF version written to merged documents.
const OUTPUT_VERSION: &str = "1.7";

/// [`Codec`] backed by lopdf.
///
/// Every selected page becomes its own page object in the output, so a page
/// selected twice appears twice. The source page trees are removed and
/// references into them (annotation `/P`, explicit destinations) are
/// redirected to the copied page or nulled, so nothing from an unselected
/// page stays reachable. Unreachable objects are pruned before the document
/// is serialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfCodec {
    compression: CompressionLevel,
}

impl LopdfCodec {
    /// Create a codec that writes with the given compression.
    pub fn new(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// Compression applied to the output.
    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }

    fn load(&self, document: &Document) -> Result<PdfDocument, CodecError> {
        PdfDocument::load_mem(document.payload())
            .map_err(|err| load_error(document.id(), &err.to_string()))
    }
}

impl Codec for LopdfCodec {
    #[instrument(skip_all, fields(document = %document.id()))]
    fn page_count(&self, document: &Document) -> Result<usize, CodecError> {
        let pdf = self.load(document)?;
        let count = pdf.get_pages().len();
        debug!(pages = count, "counted pages");
        Ok(count)
    }

    #[instrument(skip_all, fields(entries = plan.len(), pages = plan.total_pages()))]
    fn assemble(&self, plan: &MergePlan) -> Result<Vec<u8>, CodecError> {
        if plan.total_pages() == 0 {
            return Err(CodecError::assembly("merge plan selects no pages"));
        }

        let mut output = PdfDocument::with_version(OUTPUT_VERSION);
        let pages_id = output.new_object_id();
        let mut kids: Vec<ObjectId> = Vec::with_capacity(plan.total_pages());
        let mut moved: HashMap<ObjectId, ObjectId> = HashMap::new();
        let mut dropped: HashSet<ObjectId> = HashSet::new();

        for entry in plan.entries() {
            let document = entry.document();
            let id = document.id();

            let mut source = self.load(document)?;
            source.renumber_objects_with(output.max_id + 1);
            let source_pages = source.get_pages();

            let mut copied = Vec::with_capacity(entry.selection().len());
            for page in entry.selection().iter() {
                let page_id = u32::try_from(page)
                    .ok()
                    .and_then(|number| source_pages.get(&number).copied())
                    .ok_or_else(|| CodecError::MissingPage {
                        document: id.clone(),
                        page,
                    })?;

                let flattened = flatten_page(&source, page_id)
                    .map_err(|err| CodecError::unreadable(id.clone(), err.to_string()))?;
                copied.push((page_id, flattened));
            }
            dropped.extend(page_tree_nodes(&source));

            let source_max = source.objects.keys().map(|&(number, _)| number).max();
            output.max_id = output.max_id.max(source_max.unwrap_or(0));
            output.objects.extend(source.objects);

            for (source_id, mut page) in copied {
                page.set("Parent", pages_id);
                let page_id = output.add_object(page);
                moved.entry(source_id).or_insert(page_id);
                kids.push(page_id);
            }

            debug!(
                document = %id,
                pages = entry.selection().len(),
                "copied pages"
            );
        }

        for node in &dropped {
            output.objects.remove(node);
        }
        for object in output.objects.values_mut() {
            relink(object, &moved, &dropped);
        }

        output.objects.insert(pages_id, page_tree(&kids).into());
        let catalog_id = output.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        output.trailer.set("Root", catalog_id);

        let pruned = output.prune_objects();
        debug!(pruned = pruned.len(), "pruned unreachable objects");

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => output.compress(),
            CompressionLevel::Maximum => {
                output.compress();
                output.delete_zero_length_streams();
            }
        }

        output.renumber_objects();

        let mut bytes = Vec::new();
        output
            .save_to(&mut bytes)
            .map_err(|err| CodecError::assembly(err.to_string()))?;

        debug!(bytes = bytes.len(), "merged document serialized");
        Ok(bytes)
    }
}

/// Classify a load failure from the PDF library's message.
fn load_error(document: &DocumentId, message: &str) -> CodecError {
    let lowered = message.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("password") {
        CodecError::Encrypted {
            document: document.clone(),
        }
    } else {
        CodecError::unreadable(document.clone(), message)
    }
}

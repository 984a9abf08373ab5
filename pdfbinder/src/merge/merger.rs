//! End-to-end merge driver.
//!
//! Reads the configured inputs, plans the merge and assembles the output.
//! Planning and assembly parse PDFs, so they run on the blocking pool.

use std::time::{Duration, Instant};
use tokio::task;
use tracing::{info, instrument};

use crate::config::{CompressionLevel, Config};
use crate::error::{PdfBinderError, Result};
use crate::io::{LoadStatistics, PdfReader};
use crate::merge::{Codec, LopdfCodec};
use crate::plan::{MergePlanner, PlanPreview, PlanRequest, PlannerOptions};
use crate::utils::format_file_size;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of entries in the merge plan.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of input files.
    pub input_size: u64,

    /// Time taken to read all inputs.
    pub load_time: Duration,

    /// Time taken to plan and assemble.
    pub merge_time: Duration,

    /// Whether compression was applied.
    pub compressed: bool,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged PDF, serialized.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Inputs read from disk and turned into plan requests.
#[derive(Debug)]
pub struct PreparedInputs {
    /// Requests in merge order.
    pub requests: Vec<PlanRequest>,

    /// Statistics from reading the files.
    pub load_stats: LoadStatistics,
}

/// Drives a merge from a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Merger {
    reader: PdfReader,
    codec: LopdfCodec,
}

impl Merger {
    /// Create a merger that writes with `compression`.
    pub fn new(compression: CompressionLevel) -> Self {
        Self {
            reader: PdfReader::new(),
            codec: LopdfCodec::new(compression),
        }
    }

    /// Create a merger from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.compression)
    }

    /// The codec used for page counts and assembly.
    pub fn codec(&self) -> &LopdfCodec {
        &self.codec
    }

    /// Read every input and build its plan request.
    ///
    /// # Errors
    ///
    /// Returns the first read failure in input order.
    pub async fn prepare(&self, config: &Config) -> Result<PreparedInputs> {
        let paths: Vec<_> = config.inputs.iter().map(|i| i.path.clone()).collect();
        let (results, load_stats) = self.reader.load_all(&paths, config.effective_jobs()).await;

        let mut requests = Vec::with_capacity(results.len());
        for (result, input) in results.into_iter().zip(&config.inputs) {
            let loaded = result?;
            requests.push(PlanRequest {
                document: loaded.document,
                mode: config.mode.selection_for(input.pages.as_deref()),
            });
        }

        Ok(PreparedInputs {
            requests,
            load_stats,
        })
    }

    /// Resolve every input without assembling anything.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read.
    #[instrument(skip_all, fields(inputs = config.inputs.len()))]
    pub async fn preview(&self, config: &Config) -> Result<PlanPreview> {
        let prepared = self.prepare(config).await?;
        let codec = self.codec;
        let options = config.planner_options();

        task::spawn_blocking(move || {
            MergePlanner::with_options(&codec, options).preview(&prepared.requests)
        })
        .await
        .map_err(|e| PdfBinderError::other(format!("Planning task failed: {e}")))
    }

    /// Read, plan and assemble.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input cannot be read
    /// - Any document fails to resolve ([`PdfBinderError::Plan`])
    /// - The plan selects no pages
    /// - Assembly fails
    #[instrument(skip_all, fields(inputs = config.inputs.len()))]
    pub async fn merge(&self, config: &Config) -> Result<MergeResult> {
        let load_start = Instant::now();
        let prepared = self.prepare(config).await?;
        let load_time = load_start.elapsed();

        let merge_start = Instant::now();
        let codec = self.codec;
        let options = config.planner_options();
        let requests = prepared.requests;

        let (bytes, files_merged, total_pages) =
            task::spawn_blocking(move || assemble(&codec, options, &requests))
                .await
                .map_err(|e| PdfBinderError::other(format!("Merge task failed: {e}")))??;

        let statistics = MergeStatistics {
            files_merged,
            total_pages,
            input_size: prepared.load_stats.total_size,
            load_time,
            merge_time: merge_start.elapsed(),
            compressed: config.compression != CompressionLevel::None,
        };

        info!(
            files = statistics.files_merged,
            pages = statistics.total_pages,
            bytes = bytes.len(),
            "merge complete"
        );

        Ok(MergeResult { bytes, statistics })
    }
}

/// Plan and assemble, returning the bytes, entry count and page count.
fn assemble<C: Codec + ?Sized>(
    codec: &C,
    options: PlannerOptions,
    requests: &[PlanRequest],
) -> Result<(Vec<u8>, usize, usize)> {
    let plan = MergePlanner::with_options(codec, options).plan(requests)?;
    if plan.total_pages() == 0 {
        return Err(PdfBinderError::NothingToMerge);
    }

    let bytes = codec.assemble(&plan)?;
    Ok((bytes, plan.len(), plan.total_pages()))
}

//! Loading source documents from disk.
//!
//! Files are read concurrently with a bounded number of in-flight reads.
//! Results always come back in input order, which is the merge order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbinder::io::reader::PdfReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = reader.load_all(&paths, 4).await;
//! println!("Loaded {} files", stats.success_count);
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::document::{Document, DocumentId};
use crate::error::{PdfBinderError, Result};
use crate::utils::format_file_size;

/// A source file read into memory.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    /// The document, ready to share with plan requests.
    pub document: Arc<Document>,

    /// Path to the source file.
    pub path: PathBuf,

    /// Time taken to read the file.
    pub load_time: Duration,
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedInput>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of files successfully read.
    pub success_count: usize,

    /// Number of files that failed to read.
    pub failure_count: usize,

    /// Wall time for the whole batch.
    pub total_time: Duration,

    /// Total size of successfully read files.
    pub total_size: u64,
}

impl LoadStatistics {
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut total_size = 0;

        for result in results {
            match result {
                Ok(loaded) => {
                    success_count += 1;
                    total_size += loaded.document.size();
                }
                Err(_) => failure_count += 1,
            }
        }

        Self {
            success_count,
            failure_count,
            total_time,
            total_size,
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads PDF files into [`Document`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read one file.
    ///
    /// The payload is not parsed here; the codec reads it when the planner
    /// first asks for the page count.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist
    /// - The path is not a regular file
    /// - The file cannot be read
    #[instrument(skip_all, fields(path = %path.display(), document = %id))]
    pub async fn load(&self, path: &Path, id: DocumentId) -> Result<LoadedInput> {
        let start = Instant::now();

        let metadata = tokio::fs::metadata(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                PdfBinderError::file_not_found(path.to_path_buf())
            } else {
                PdfBinderError::FailedToRead {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(PdfBinderError::not_a_file(path.to_path_buf()));
        }

        let payload = tokio::fs::read(path)
            .await
            .map_err(|err| PdfBinderError::FailedToRead {
                path: path.to_path_buf(),
                source: err,
            })?;

        let name = display_name(path);
        let load_time = start.elapsed();
        debug!(bytes = payload.len(), ?load_time, "read input");

        Ok(LoadedInput {
            document: Arc::new(Document::new(id, name, payload)),
            path: path.to_path_buf(),
            load_time,
        })
    }

    /// Read many files with at most `max_workers` reads in flight.
    ///
    /// Identifiers are assigned with [`assign_ids`]. Results are in the same
    /// order as `paths`.
    pub async fn load_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();
        let workers = max_workers.max(1);

        let tasks = paths
            .iter()
            .zip(assign_ids(paths))
            .map(|(path, id)| async move { self.load(path, id).await });

        let results: Vec<LoadResult> = stream::iter(tasks).buffered(workers).collect().await;

        let stats = LoadStatistics::from_results(&results, start.elapsed());
        debug!(
            loaded = stats.success_count,
            failed = stats.failure_count,
            size = %stats.format_total_size(),
            "batch load finished"
        );

        (results, stats)
    }
}

/// Derive a unique [`DocumentId`] for every path.
///
/// The id is the path as given. A path listed more than once gets a
/// ` (2)`, ` (3)`, ... suffix on its later occurrences, skipping any suffix
/// that would collide with an id already issued.
pub fn assign_ids(paths: &[PathBuf]) -> Vec<DocumentId> {
    let mut issued: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();

    paths
        .iter()
        .map(|path| {
            let base = path.display().to_string();
            let mut id = base.clone();

            if issued.contains(&id) {
                let suffix = next_suffix.entry(base.clone()).or_insert(2);
                loop {
                    id = format!("{base} ({suffix})");
                    *suffix += 1;
                    if !issued.contains(&id) {
                        break;
                    }
                }
            }

            issued.insert(id.clone());
            DocumentId::new(id)
        })
        .collect()
}

/// File name shown to the user for `path`.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

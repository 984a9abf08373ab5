//! pdfbinder - Bind pages from several PDFs into one document.
//!
//! The user supplies an ordered list of PDFs. Each contributes either all of
//! its pages or the pages named by a range expression such as `1-3,5`. The
//! library parses the expressions, validates them against real page counts,
//! builds a merge plan and assembles the output PDF.
//!
//! - [`range`]: range expression parsing
//! - [`plan`]: merge planning with aggregated validation
//! - [`merge`]: the PDF codec and the end-to-end merge driver
//! - [`session`]: an editable merge list
//! - [`io`], [`config`], [`manifest`], [`output`]: the surrounding tooling
//!
//! # Examples
//!
//! ## Planning and assembling in memory
//!
//! ```no_run
//! use pdfbinder::document::Document;
//! use pdfbinder::merge::{Codec, LopdfCodec};
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
//! let merged: Vec<u8> = codec.assemble(&plan)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Merging files
//!
//! ```no_run
//! use pdfbinder::config::{CompressionLevel, Config, InputSpec, MergeMode, OverwriteMode};
//! use pdfbinder::io::PdfWriter;
//! use pdfbinder::merge::Merger;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     inputs: vec![
//!         InputSpec::new("a.pdf"),
//!         InputSpec::new("b.pdf").with_pages("2,4"),
//!     ],
//!     output: PathBuf::from("binder.pdf"),
//!     mode: MergeMode::SelectRanges,
//!     dry_run: false,
//!     verbose: false,
//!     quiet: false,
//!     overwrite_mode: OverwriteMode::Prompt,
//!     compression: CompressionLevel::Standard,
//!     jobs: None,
//!     require_ranges: false,
//! };
//! config.validate()?;
//!
//! let result = Merger::from_config(&config).merge(&config).await?;
//! PdfWriter::new().write(result.bytes, &config.output).await?;
//! println!("Created {} page document", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod manifest;
pub mod merge;
pub mod output;
pub mod plan;
pub mod range;
pub mod session;
pub mod utils;

pub use config::Config;
pub use document::{Document, DocumentId};
pub use error::{PdfBinderError, Result};
pub use merge::{Codec, LopdfCodec, Merger};
pub use plan::{MergePlan, MergePlanner, PlanRequest, SelectionMode};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! File input and output.

pub mod reader;
pub mod writer;

pub use reader::{LoadResult, LoadStatistics, LoadedInput, PdfReader, assign_ids};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

//! Configuration for a merge run.
//!
//! The CLI (or a manifest) is turned into a [`Config`], which is validated
//! once and then drives loading, planning and writing.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{PdfBinderError, Result};
use crate::plan::{PlannerOptions, SelectionMode};

/// Output file name used when none is given.
pub const DEFAULT_OUTPUT_NAME: &str = "merged_document.pdf";

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// Write streams as they are.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Compress streams and drop empty ones.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfBinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfBinderError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// How pages are taken from every document in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MergeMode {
    /// Every page of every document.
    #[default]
    #[serde(rename = "all")]
    AllPages,
    /// Each document contributes the pages named by its range expression.
    #[serde(rename = "select")]
    SelectRanges,
}

impl MergeMode {
    /// Selection mode for a document whose range text is `pages`.
    ///
    /// Missing range text in select mode is a blank expression.
    pub fn selection_for(&self, pages: Option<&str>) -> SelectionMode {
        match self {
            Self::AllPages => SelectionMode::WholeDocument,
            Self::SelectRanges => SelectionMode::SelectedPages(pages.unwrap_or_default().to_string()),
        }
    }
}

impl FromStr for MergeMode {
    type Err = PdfBinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::AllPages),
            "select" => Ok(Self::SelectRanges),
            _ => Err(PdfBinderError::invalid_config(format!(
                "Invalid merge mode: {s}. Must be one of: all, select"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// One input file and its optional range expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    /// Path to the PDF.
    pub path: PathBuf,
    /// Range expression, used in select mode.
    pub pages: Option<String>,
}

impl InputSpec {
    /// An input without a range expression.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: None,
        }
    }

    /// Attach a range expression.
    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inputs in merge order.
    pub inputs: Vec<InputSpec>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Page selection mode.
    pub mode: MergeMode,

    /// Validate and report without writing output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Number of concurrent file loads (None = auto-detect).
    pub jobs: Option<usize>,

    /// In select mode, treat blank range expressions as errors.
    pub require_ranges: bool,
}

impl Config {
    /// Input paths in merge order.
    pub fn input_paths(&self) -> Vec<&Path> {
        self.inputs.iter().map(|input| input.path.as_path()).collect()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBinderError::InvalidConfig`] if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output path is also an input
    /// - Range expressions or `require_ranges` are given outside select mode
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PdfBinderError::invalid_config("No input files specified"));
        }

        if self.verbose && self.quiet {
            return Err(PdfBinderError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfBinderError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if let Some(input) = self.inputs.iter().find(|input| input.path == self.output) {
            return Err(PdfBinderError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                input.path.display()
            )));
        }

        if self.mode == MergeMode::AllPages {
            if let Some(input) = self.inputs.iter().find(|input| input.pages.is_some()) {
                return Err(PdfBinderError::invalid_config(format!(
                    "Page ranges require --mode select (range given for {})",
                    input.path.display()
                )));
            }

            if self.require_ranges {
                return Err(PdfBinderError::invalid_config(
                    "--require-ranges only applies with --mode select",
                ));
            }
        }

        Ok(())
    }

    /// Options passed to the merge planner.
    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            require_explicit_ranges: self.require_ranges,
        }
    }

    /// Get the effective number of concurrent loads.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

/// Normalize a user-supplied output file name.
///
/// Blank names fall back to [`DEFAULT_OUTPUT_NAME`]; a `.pdf` extension is
/// appended unless one is already present (compared case-insensitively).
///
/// # Examples
///
/// ```
/// use pdfbinder::config::normalize_output_name;
///
/// assert_eq!(normalize_output_name("report"), "report.pdf");
/// assert_eq!(normalize_output_name("Report.PDF"), "Report.PDF");
/// assert_eq!(normalize_output_name("  "), "merged_document.pdf");
/// ```
pub fn normalize_output_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return DEFAULT_OUTPUT_NAME.to_string();
    }

    if name.to_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// Apply [`normalize_output_name`] to the file name of `path`.
pub fn normalize_output_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match path.parent() {
        Some(parent) => parent.join(normalize_output_name(&name)),
        None => PathBuf::from(normalize_output_name(&name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create_test_config() -> Config {
        Config {
            inputs: vec![InputSpec::new("a.pdf"), InputSpec::new("b.pdf")],
            output: PathBuf::from("out.pdf"),
            mode: MergeMode::AllPages,
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::Prompt,
            compression: CompressionLevel::Standard,
            jobs: None,
            require_ranges: false,
        }
    }

    #[test]
    fn test_compression_level_from_str() {
        assert_eq!(
            CompressionLevel::from_str("none").unwrap(),
            CompressionLevel::None
        );
        assert_eq!(
            CompressionLevel::from_str("STANDARD").unwrap(),
            CompressionLevel::Standard
        );
        assert_eq!(
            CompressionLevel::from_str("maximum").unwrap(),
            CompressionLevel::Maximum
        );
        assert!(CompressionLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_merge_mode_from_str() {
        assert_eq!(MergeMode::from_str("all").unwrap(), MergeMode::AllPages);
        assert_eq!(
            MergeMode::from_str("Select").unwrap(),
            MergeMode::SelectRanges
        );
        assert!(MergeMode::from_str("some").is_err());
    }

    #[test]
    fn test_merge_mode_selection() {
        assert_eq!(
            MergeMode::AllPages.selection_for(Some("1-2")),
            SelectionMode::WholeDocument
        );
        assert_eq!(
            MergeMode::SelectRanges.selection_for(Some("1-2")),
            SelectionMode::SelectedPages("1-2".to_string())
        );
        assert_eq!(
            MergeMode::SelectRanges.selection_for(None),
            SelectionMode::SelectedPages(String::new())
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = create_test_config();
        assert!(config.validate().is_ok());

        config.inputs.clear();
        assert!(config.validate().is_err());
        config.inputs = vec![InputSpec::new("a.pdf")];

        config.verbose = true;
        config.quiet = true;
        assert!(config.validate().is_err());
        config.quiet = false;

        config.jobs = Some(0);
        assert!(config.validate().is_err());
        config.jobs = Some(2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_cannot_be_input() {
        let mut config = create_test_config();
        config.output = PathBuf::from("a.pdf");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("same as an input"));
    }

    #[test]
    fn test_ranges_require_select_mode() {
        let mut config = create_test_config();
        config.inputs[1] = InputSpec::new("b.pdf").with_pages("2-3");
        assert!(config.validate().is_err());

        config.mode = MergeMode::SelectRanges;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_require_ranges_needs_select_mode() {
        let mut config = create_test_config();
        config.require_ranges = true;
        assert!(config.validate().is_err());

        config.mode = MergeMode::SelectRanges;
        assert!(config.validate().is_ok());
        assert!(config.planner_options().require_explicit_ranges);
    }

    #[test]
    fn test_effective_jobs() {
        let mut config = create_test_config();
        config.jobs = Some(3);
        assert_eq!(config.effective_jobs(), 3);

        config.jobs = None;
        assert!(config.effective_jobs() >= 1);
    }

    #[test]
    fn test_should_print() {
        let mut config = create_test_config();
        assert!(config.should_print());

        config.quiet = true;
        assert!(!config.should_print());

        config.dry_run = true;
        assert!(config.should_print());
    }

    #[rstest]
    #[case("report", "report.pdf")]
    #[case("report.pdf", "report.pdf")]
    #[case("report.Pdf", "report.Pdf")]
    #[case("my.report", "my.report.pdf")]
    #[case("  spaced  ", "spaced.pdf")]
    #[case("", DEFAULT_OUTPUT_NAME)]
    fn test_normalize_output_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_output_name(input), expected);
    }

    #[test]
    fn test_normalize_output_path() {
        assert_eq!(
            normalize_output_path(Path::new("out/binder")),
            PathBuf::from("out/binder.pdf")
        );
        assert_eq!(
            normalize_output_path(Path::new("binder.pdf")),
            PathBuf::from("binder.pdf")
        );
    }
}

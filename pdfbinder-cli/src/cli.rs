//! CLI argument parsing for pdfbinder.
//!
//! Defines the command-line interface with `clap` and turns it into a
//! validated [`Config`].

use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use pdfbinder::config::{
    CompressionLevel, Config, DEFAULT_OUTPUT_NAME, InputSpec, MergeMode, OverwriteMode,
    normalize_output_path,
};
use pdfbinder::error::{PdfBinderError, Result};
use pdfbinder::manifest::Manifest;
use pdfbinder::utils::collect_paths_for_patterns;

/// Bind PDF files into a single document.
///
/// pdfbinder merges PDF files in the order given. Each file contributes all
/// of its pages, or in select mode the pages named by its range expression
/// (for example `1-3,5`). Ranges may reorder and repeat pages.
#[derive(Parser, Debug)]
#[command(name = "pdfbinder")]
#[command(version)]
#[command(about = "Bind PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Glob patterns are expanded in place, matches sorted by name.
    ///
    /// Examples:
    ///   pdfbinder a.pdf b.pdf -o out.pdf
    ///   pdfbinder 'chapter*.pdf' -o book.pdf
    #[arg(value_name = "FILE", required_unless_present = "manifest")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// A `.pdf` extension is added when missing. Defaults to the manifest's
    /// output, then to merged_document.pdf.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// How pages are taken from each input
    ///
    /// - all: every page of every input (default)
    /// - select: the pages named with --pages
    #[arg(short, long, value_name = "MODE")]
    #[arg(value_parser = ["all", "select"])]
    pub mode: Option<String>,

    /// Page range for one input, as N=RANGE (repeatable)
    ///
    /// N is the 1-based position of the input after glob expansion.
    /// Inputs without a range contribute every page.
    ///
    /// Examples:
    ///   --pages 1=1-3,5 --pages 2=4
    #[arg(short, long, value_name = "N=RANGE")]
    pub pages: Vec<String>,

    /// In select mode, treat inputs without a range as errors
    #[arg(long)]
    pub require_ranges: bool,

    /// Read inputs, ranges, mode and output from a JSON manifest
    #[arg(long, value_name = "FILE", conflicts_with_all = ["inputs", "pages"])]
    pub manifest: Option<PathBuf>,

    /// Dry run - validate inputs and preview the merge without creating output
    ///
    /// Prints one row per input with its page count and selection, then
    /// the total number of pages the merge would produce.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run preview as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Verbose output - show timings and statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop empty ones
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of files read concurrently
    ///
    /// Default is number of CPU cores. Use 1 for sequential reads.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// When a manifest is given, its inputs, mode and output are used unless
    /// overridden on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level or mode is invalid
    /// - A glob pattern is invalid
    /// - A `--pages` assignment is malformed or names no input
    /// - Configuration validation fails
    pub fn to_config(&self, manifest: Option<Manifest>) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let (inputs, manifest_mode, manifest_output) = match manifest {
            Some(manifest) => (manifest.inputs(), Some(manifest.mode), manifest.output),
            None => (self.expand_inputs()?, None, None),
        };

        let mode = match &self.mode {
            Some(mode) => MergeMode::from_str(mode)?,
            None => manifest_mode.unwrap_or_default(),
        };

        let output = self
            .output
            .clone()
            .or(manifest_output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME));

        let config = Config {
            inputs,
            output: normalize_output_path(&output),
            mode,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            compression,
            jobs: self.jobs,
            require_ranges: self.require_ranges,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.manifest.is_none() {
            return Err(PdfBinderError::invalid_config("No input files specified"));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfBinderError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        for assignment in &self.pages {
            parse_assignment(assignment)?;
        }

        Ok(())
    }

    /// Load the manifest named by `--manifest`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub async fn load_manifest(&self) -> Result<Option<Manifest>> {
        match &self.manifest {
            Some(path) => Manifest::load(path).await.map(Some),
            None => Ok(None),
        }
    }

    /// Expand glob patterns and attach `--pages` ranges.
    fn expand_inputs(&self) -> Result<Vec<InputSpec>> {
        let paths = collect_paths_for_patterns(&self.inputs)?;
        let mut ranges = BTreeMap::new();

        for assignment in &self.pages {
            let (position, range) = parse_assignment(assignment)?;
            if position > paths.len() {
                return Err(PdfBinderError::invalid_config(format!(
                    "--pages {assignment}: there are only {} input(s)",
                    paths.len()
                )));
            }
            if ranges.insert(position, range).is_some() {
                return Err(PdfBinderError::invalid_config(format!(
                    "--pages given twice for input {position}"
                )));
            }
        }

        Ok(paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| InputSpec {
                path,
                pages: ranges.remove(&(index + 1)),
            })
            .collect())
    }
}

/// Split an `N=RANGE` assignment into the 1-based input position and range.
fn parse_assignment(assignment: &str) -> Result<(usize, String)> {
    let malformed = || {
        PdfBinderError::invalid_config(format!(
            "Invalid --pages value '{assignment}' (expected N=RANGE, e.g. 2=1-3,5)"
        ))
    };

    let (position, range) = assignment.split_once('=').ok_or_else(malformed)?;
    let position: usize = position.trim().parse().map_err(|_| malformed())?;
    if position == 0 {
        return Err(malformed());
    }

    Ok((position, range.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    fn create_test_cli(inputs: Vec<&str>, output: &str) -> Cli {
        Cli {
            inputs: inputs.into_iter().map(String::from).collect(),
            output: Some(PathBuf::from(output)),
            mode: None,
            pages: Vec::new(),
            require_ranges: false,
            manifest: None,
            dry_run: false,
            json: false,
            verbose: false,
            force: false,
            no_clobber: false,
            quiet: false,
            compression: "standard".to_string(),
            jobs: None,
        }
    }

    #[test]
    fn test_basic_cli_to_config() {
        let cli = create_test_cli(vec!["a.pdf", "b.pdf"], "out.pdf");
        let config = cli.to_config(None).unwrap();

        assert_eq!(config.inputs.len(), 2);
        assert_eq!(config.output, PathBuf::from("out.pdf"));
        assert_eq!(config.mode, MergeMode::AllPages);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_output_name_is_normalized() {
        let cli = create_test_cli(vec!["a.pdf"], "reports/binder");
        let config = cli.to_config(None).unwrap();
        assert_eq!(config.output, PathBuf::from("reports/binder.pdf"));
    }

    #[test]
    fn test_default_output_name() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.output = None;

        let config = cli.to_config(None).unwrap();
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT_NAME));
    }

    #[test]
    fn test_cli_with_compression() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.compression = "maximum".to_string();

        let config = cli.to_config(None).unwrap();
        assert_eq!(config.compression, CompressionLevel::Maximum);
    }

    #[test]
    fn test_cli_overwrite_modes() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        assert_eq!(
            cli.to_config(None).unwrap().overwrite_mode,
            OverwriteMode::Prompt
        );

        cli.force = true;
        assert_eq!(
            cli.to_config(None).unwrap().overwrite_mode,
            OverwriteMode::Force
        );

        cli.force = false;
        cli.no_clobber = true;
        assert_eq!(
            cli.to_config(None).unwrap().overwrite_mode,
            OverwriteMode::NoClobber
        );
    }

    #[test]
    fn test_pages_are_attached_by_position() {
        let mut cli = create_test_cli(vec!["a.pdf", "b.pdf", "c.pdf"], "out.pdf");
        cli.mode = Some("select".to_string());
        cli.pages = vec!["3=2-4".to_string(), "1=1,1".to_string()];

        let config = cli.to_config(None).unwrap();
        assert_eq!(config.mode, MergeMode::SelectRanges);
        assert_eq!(config.inputs[0].pages.as_deref(), Some("1,1"));
        assert_eq!(config.inputs[1].pages, None);
        assert_eq!(config.inputs[2].pages.as_deref(), Some("2-4"));
    }

    #[test]
    fn test_pages_require_select_mode() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.pages = vec!["1=2".to_string()];

        let err = cli.to_config(None).unwrap_err();
        assert!(matches!(err, PdfBinderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_pages_beyond_inputs() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.mode = Some("select".to_string());
        cli.pages = vec!["2=1".to_string()];

        assert!(cli.to_config(None).is_err());
    }

    #[test]
    fn test_pages_given_twice() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.mode = Some("select".to_string());
        cli.pages = vec!["1=1".to_string(), "1=2".to_string()];

        assert!(cli.to_config(None).is_err());
    }

    #[rstest]
    #[case("1=1-3", Some((1, "1-3")))]
    #[case("12=", Some((12, "")))]
    #[case(" 2 =5", Some((2, "5")))]
    #[case("0=1", None)]
    #[case("x=1", None)]
    #[case("1-3", None)]
    fn test_parse_assignment(#[case] input: &str, #[case] expected: Option<(usize, &str)>) {
        let parsed = parse_assignment(input).ok();
        let expected = expected.map(|(position, range)| (position, range.to_string()));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_manifest_supplies_inputs_and_output() {
        let mut cli = create_test_cli(vec![], "ignored.pdf");
        cli.output = None;
        cli.manifest = Some(PathBuf::from("binder.json"));

        let manifest = Manifest::from_json(
            r#"{"output": "bound", "mode": "select", "documents": [{"path": "a.pdf", "pages": "2"}]}"#,
            Path::new("binder.json"),
        )
        .unwrap();

        let config = cli.to_config(Some(manifest)).unwrap();
        assert_eq!(config.mode, MergeMode::SelectRanges);
        assert_eq!(config.output, PathBuf::from("bound.pdf"));
        assert_eq!(config.inputs[0].pages.as_deref(), Some("2"));
    }

    #[test]
    fn test_mode_flag_overrides_manifest() {
        let mut cli = create_test_cli(vec![], "out.pdf");
        cli.mode = Some("all".to_string());

        let manifest = Manifest::from_json(
            r#"{"mode": "select", "documents": [{"path": "a.pdf"}]}"#,
            Path::new("binder.json"),
        )
        .unwrap();

        let config = cli.to_config(Some(manifest)).unwrap();
        assert_eq!(config.mode, MergeMode::AllPages);
    }

    #[test]
    fn test_cli_validate_no_inputs() {
        let cli = create_test_cli(vec![], "out.pdf");
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_cli_validate_zero_jobs() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.jobs = Some(0);

        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_cli_validate_malformed_pages() {
        let mut cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        cli.pages = vec!["first=1".to_string()];

        assert!(cli.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_manifest_absent() {
        let cli = create_test_cli(vec!["a.pdf"], "out.pdf");
        assert!(cli.load_manifest().await.unwrap().is_none());
    }

    #[test]
    fn test_cli_parses_arguments() {
        let cli = Cli::try_parse_from([
            "pdfbinder", "a.pdf", "b.pdf", "-o", "out.pdf", "-m", "select", "-p", "2=3",
            "--dry-run", "--json",
        ])
        .unwrap();

        assert_eq!(cli.inputs, vec!["a.pdf", "b.pdf"]);
        assert_eq!(cli.pages, vec!["2=3"]);
        assert!(cli.json);
    }

    #[test]
    fn test_manifest_conflicts_with_inputs() {
        let result = Cli::try_parse_from(["pdfbinder", "a.pdf", "--manifest", "binder.json"]);
        assert!(result.is_err());
    }
}

//! User-facing output.
//!
//! Console reporting for dry runs, plan failures and merge summaries. All
//! of it goes through [`OutputFormatter`] so quiet and verbose modes apply
//! uniformly.
//!
//! # Examples
//!
//! ```no_run
//! use pdfbinder::output::OutputFormatter;
//! use pdfbinder::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, Verbosity, render_table};

use crate::error::PlanError;
use crate::merge::MergeStatistics;
use crate::plan::PlanPreview;
use crate::utils::format_file_size;

/// Table rows describing each document of a preview.
///
/// Columns: position, name, size, page count, selected pages or the error.
pub fn preview_rows(preview: &PlanPreview) -> Vec<Vec<String>> {
    preview
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let pages = row
                .page_count
                .map_or_else(|| "?".to_string(), |count| count.to_string());
            let status = match (&row.error, row.selected) {
                (Some(error), _) => format!("error: {error}"),
                (None, Some(selected)) => selected.to_string(),
                (None, None) => "-".to_string(),
            };

            vec![
                (index + 1).to_string(),
                row.name.clone(),
                format_file_size(row.size),
                pages,
                status,
            ]
        })
        .collect()
}

/// Display the per-document table and total of a dry run.
pub fn display_preview(formatter: &OutputFormatter, preview: &PlanPreview) {
    formatter.section("Merge preview");
    formatter.table(
        &["#", "File", "Size", "Pages", "Selected"],
        &preview_rows(preview),
    );
    formatter.blank_line();

    if preview.has_errors() {
        formatter.warning(&format!(
            "{} document(s) need fixing before merging",
            preview.failures().len()
        ));
    } else if preview.is_ready() {
        formatter.success(&format!(
            "Ready to merge {} page(s)",
            preview.total_selected()
        ));
    } else {
        formatter.warning("No pages selected");
    }
}

/// Display every per-document failure of a plan.
pub fn display_plan_errors(formatter: &OutputFormatter, error: &PlanError) {
    formatter.error(&error.to_string());
    for failure in error.failures() {
        formatter.error(&format!("  {failure}"));
    }
}

/// Display the summary of a finished merge.
pub fn display_merge_summary(formatter: &OutputFormatter, stats: &MergeStatistics) {
    formatter.detail("Files merged", &stats.files_merged.to_string());
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail(
        "Load time",
        &format!("{:.2}s", stats.load_time.as_secs_f64()),
    );
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );
    formatter.detail("Compressed", if stats.compressed { "yes" } else { "no" });
}

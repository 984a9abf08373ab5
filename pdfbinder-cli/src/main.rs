//! pdfbinder - Bind PDF files into a single document.
//!
//! Merges whole documents or selected page ranges, in the order given.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfbinder::config::{Config, OverwriteMode};
use pdfbinder::error::PdfBinderError;
use pdfbinder::io::PdfWriter;
use pdfbinder::merge::Merger;
use pdfbinder::output::{
    OutputFormatter, display_merge_summary, display_plan_errors, display_preview,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let formatter = OutputFormatter::new(cli.quiet && !cli.dry_run, cli.verbose);
    if let Err(err) = run(cli).await {
        match &err {
            PdfBinderError::Plan(plan_error) => display_plan_errors(&formatter, plan_error),
            _ => eprintln!("Error: {err}"),
        }
        process::exit(err.exit_code());
    }
}

/// Install the log subscriber. `RUST_LOG` overrides the flag-derived level.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfBinderError> {
    cli.validate()?;

    let manifest = cli.load_manifest().await?;
    let config = cli.to_config(manifest)?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() && !cli.json {
        formatter.section(&format!("{} v{}", pdfbinder::NAME, pdfbinder::VERSION));
        formatter.blank_line();
    }

    let merger = Merger::from_config(&config);

    if config.dry_run {
        let preview = merger.preview(&config).await?;

        if cli.json {
            let json = serde_json::to_string_pretty(&preview)
                .map_err(|e| PdfBinderError::other(format!("Failed to encode preview: {e}")))?;
            println!("{json}");
        } else {
            display_preview(&formatter, &preview);
            formatter.info(&format!("  Output would be: {}", config.output.display()));
        }

        if preview.has_errors() {
            return Err(pdfbinder::error::PlanError::new(preview.failures()).into());
        }
        if !preview.is_ready() {
            return Err(PdfBinderError::NothingToMerge);
        }
        return Ok(());
    }

    handle_output_overwrite(&config, &formatter).await?;

    formatter.info(&format!("Reading {} file(s)...", config.inputs.len()));
    let result = merger.merge(&config).await?;

    if formatter.should_print() {
        formatter.info(&format!(
            "Merged {} page(s) from {} document(s) in {:.2}s",
            result.statistics.total_pages,
            result.statistics.files_merged,
            result.statistics.merge_time.as_secs_f64()
        ));
    }

    formatter.info(&format!("Writing to: {}", config.output.display()));
    let write_stats = PdfWriter::new()
        .write(result.bytes, &config.output)
        .await?;

    formatter.success(&format!(
        "Created {} ({})",
        write_stats.output_path.display(),
        write_stats.format_file_size()
    ));

    if formatter.is_verbose() {
        formatter.blank_line();
        formatter.section("Statistics");
        display_merge_summary(&formatter, &result.statistics);
        formatter.detail("Total pages", &result.statistics.total_pages.to_string());
        formatter.detail("Output size", &write_stats.format_file_size());
        formatter.detail(
            "Write time",
            &format!("{:.2}s", write_stats.write_time.as_secs_f64()),
        );
    }

    Ok(())
}

/// Decide whether an existing output file may be replaced.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfBinderError> {
    if !PdfWriter::new().exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfBinderError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // No one to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(PdfBinderError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfBinderError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfBinderError::Cancelled)
            }
        }
    }
}

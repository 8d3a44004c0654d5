use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use paperlens_core::{
    PlaceholderAnalyzer, PlaceholderComparator, Session, UploadFile, process_batch,
};
use paperlens_pdf::MupdfBackend;
use paperlens_reporting::{ExportFormat, export_comparison, export_library};

/// PaperLens - upload research papers, browse the library, compare papers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF files to upload
    #[arg(required = true)]
    pdf_paths: Vec<PathBuf>,

    /// Comma-separated paper ids (1-based upload order) to compare, 2 to 5 of them
    #[arg(long, value_delimiter = ',')]
    compare: Vec<u32>,

    /// Output format: text, markdown, or json
    #[arg(long, default_value = "text")]
    format: ExportFormat,

    /// Also write the report to this file, or into this directory as
    /// `paperlens-report.<ext>`
    #[arg(long)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// Colors status lines unless disabled.
struct Printer {
    color: bool,
}

impl Printer {
    fn success(&self, msg: &str) {
        if self.color {
            println!("{}", msg.green().bold());
        } else {
            println!("{msg}");
        }
    }

    fn warn(&self, msg: &str) {
        if self.color {
            eprintln!("{}", msg.yellow());
        } else {
            eprintln!("{msg}");
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("PAPERLENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve `--output`: a directory gets a default file name with the
/// format's extension.
fn report_path(output: &Path, format: ExportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(format!("paperlens-report.{}", format.extension()))
    } else {
        output.to_path_buf()
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging();

    for path in &args.pdf_paths {
        if !path.exists() {
            anyhow::bail!("PDF file not found: {}", path.display());
        }
    }

    let printer = Printer {
        color: !args.no_color && std::env::var_os("NO_COLOR").is_none(),
    };

    // An unreadable file still becomes a paper; its extraction simply fails.
    let files: Vec<UploadFile> = args
        .pdf_paths
        .iter()
        .map(|path| {
            UploadFile::from_path(path).unwrap_or_else(|e| {
                log::warn!("could not read {}: {e}", path.display());
                UploadFile::new(path.display().to_string(), Vec::new())
            })
        })
        .collect();

    let mut session = Session::new();
    let analyzer = PlaceholderAnalyzer::new(session.limits());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );
    let summary = process_batch(&mut session, &MupdfBackend, &analyzer, files, |progress, record| {
        pb.set_position(progress.done as u64);
        pb.set_message(format!("{} ({:.0}%)", record.title, progress.fraction() * 100.0));
    });
    pb.finish_and_clear();

    printer.success(&format!(
        "✓ Successfully analyzed {} paper(s)!",
        summary.analyzed
    ));
    if summary.failed > 0 {
        printer.warn(&format!(
            "{} file(s) could not be read as PDF; their abstracts show the extraction error.",
            summary.failed
        ));
    }

    let mut comparison = None;
    if !args.compare.is_empty() {
        for &id in &args.compare {
            if let Err(e) = session.select(id) {
                printer.warn(&format!("Skipping paper {id}: {e}"));
            }
        }
        comparison = session.compare(&PlaceholderComparator).cloned();
        if comparison.is_none() {
            printer.warn(&format!(
                "Select at least {} papers to compare.",
                session.limits().min_selection
            ));
        }
    }

    let report = match (args.format, &comparison) {
        // One JSON document holding both views.
        (ExportFormat::Json, Some(cmp)) => serde_json::to_string_pretty(&serde_json::json!({
            "library": serde_json::from_str::<serde_json::Value>(
                &export_library(session.papers(), &session.stats(), ExportFormat::Json)?
            )?,
            "comparison": cmp,
        }))?,
        (format, Some(cmp)) => format!(
            "{}\n{}",
            export_library(session.papers(), &session.stats(), format)?,
            export_comparison(cmp, format)?
        ),
        (format, None) => export_library(session.papers(), &session.stats(), format)?,
    };

    println!("{report}");

    if let Some(output) = &args.output {
        let path = report_path(output, args.format);
        std::fs::write(&path, &report)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        log::info!("report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compare_list_and_format() {
        let args = Args::try_parse_from([
            "paperlens-cli",
            "a.pdf",
            "b.pdf",
            "--compare",
            "2,1",
            "--format",
            "md",
        ])
        .unwrap();
        assert_eq!(args.pdf_paths.len(), 2);
        assert_eq!(args.compare, vec![2, 1]);
        assert_eq!(args.format, ExportFormat::Markdown);
    }

    #[test]
    fn output_directory_gets_default_report_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            report_path(dir.path(), ExportFormat::Markdown),
            dir.path().join("paperlens-report.md")
        );
        let file = dir.path().join("out.txt");
        assert_eq!(report_path(&file, ExportFormat::Json), file);
    }

    #[test]
    fn requires_at_least_one_pdf() {
        assert!(Args::try_parse_from(["paperlens-cli"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Args::try_parse_from(["paperlens-cli", "a.pdf", "--format", "pdf"]).is_err());
    }
}

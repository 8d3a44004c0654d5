use std::fmt::Write;

use serde::Serialize;

use paperlens_core::{ComparisonRecord, LibraryStats, PaperRecord};

use crate::types::{ExportError, ExportFormat};

const EMPTY_LIBRARY: &str = "No research papers uploaded yet. Upload PDFs to add papers.";

#[derive(Serialize)]
struct LibraryJson<'a> {
    total: usize,
    analyzed: usize,
    categories: usize,
    papers: &'a [PaperRecord],
}

/// Serialize any record as pretty-printed JSON.
pub fn export_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render the library view: header metrics followed by every paper.
pub fn export_library(
    papers: &[PaperRecord],
    stats: &LibraryStats,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => export_json(&LibraryJson {
            total: stats.total,
            analyzed: stats.analyzed,
            categories: stats.categories,
            papers,
        }),
        ExportFormat::Text => Ok(library_text(papers, stats)),
        ExportFormat::Markdown => Ok(library_markdown(papers, stats)),
    }
}

/// Render a comparison result.
pub fn export_comparison(
    record: &ComparisonRecord,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => export_json(record),
        ExportFormat::Text => Ok(comparison_text(record)),
        ExportFormat::Markdown => Ok(comparison_markdown(record)),
    }
}

// --- Plain text ---

fn library_text(papers: &[PaperRecord], stats: &LibraryStats) -> String {
    let mut out = String::from("Research Library\n");
    if papers.is_empty() {
        let _ = writeln!(out, "\n{EMPTY_LIBRARY}");
        return out;
    }
    let _ = writeln!(
        out,
        "Total Papers: {}   Analyzed: {}   Categories: {}",
        stats.total, stats.analyzed, stats.categories
    );

    for paper in papers {
        let _ = writeln!(out, "\n[{}] {}  ({})", paper.id, paper.title, paper.status.badge());
        if !paper.authors.is_empty() {
            let _ = writeln!(out, "    Authors: {}", paper.authors.join(", "));
        }
        let _ = writeln!(out, "    Year: {}", paper.year);
        if !paper.category.is_empty() {
            let _ = writeln!(out, "    Category: {}", paper.category);
        }
        if let Some(reason) = &paper.extraction_error {
            let _ = writeln!(out, "    ! Text extraction failed: {reason}");
        }
        if !paper.executive_summary.is_empty() {
            let _ = writeln!(out, "    Executive Summary:\n      {}", paper.executive_summary);
        }
        if !paper.key_findings.is_empty() {
            out.push_str("    Key Findings:\n");
            for finding in &paper.key_findings {
                let _ = writeln!(out, "      • {finding}");
            }
        }
        if !paper.sections.is_empty() {
            out.push_str("    Sections:\n");
            for section in &paper.sections {
                let _ = writeln!(out, "      {}: {}", section.title, section.summary);
            }
        }
    }
    out
}

fn comparison_text(record: &ComparisonRecord) -> String {
    let analysis = &record.analysis;
    let mut out = String::from("Comparison Analysis\n\nPapers Being Compared\n");
    for (idx, paper) in record.papers.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} - {}", idx + 1, paper.title, paper.authors.join(", "));
    }

    if !analysis.common_themes.is_empty() {
        out.push_str("\nCommon Themes\n");
        let themes: Vec<String> = analysis
            .common_themes
            .iter()
            .map(|t| format!("[{t}]"))
            .collect();
        let _ = writeln!(out, "  {}", themes.join(" "));
    }
    if !analysis.agreements.is_empty() {
        out.push_str("\nAreas of Agreement\n");
        for (idx, a) in analysis.agreements.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}\n     {}", idx + 1, a.title, a.description);
            if !a.papers.is_empty() {
                let _ = writeln!(out, "     Papers: {}", a.papers.join(", "));
            }
        }
    }
    if !analysis.contradictions.is_empty() {
        out.push_str("\nContradictions\n");
        for (idx, c) in analysis.contradictions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}\n     {}", idx + 1, c.title, c.description);
            for view in &c.conflicting_views {
                let _ = writeln!(out, "     • {view}");
            }
        }
    }
    if !analysis.research_gaps.is_empty() {
        out.push_str("\nResearch Gaps\n");
        for (idx, g) in analysis.research_gaps.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}\n     Potential Impact: {}",
                idx + 1,
                g.gap,
                g.potential_impact
            );
        }
    }
    if !analysis.unique_contributions.is_empty() {
        out.push_str("\nUnique Contributions\n");
        for c in &analysis.unique_contributions {
            let _ = writeln!(out, "  {}: {}", c.paper, c.contribution);
        }
    }
    out
}

// --- Markdown ---

fn library_markdown(papers: &[PaperRecord], stats: &LibraryStats) -> String {
    let mut out = String::from("# Research Library\n\n");
    if papers.is_empty() {
        let _ = writeln!(out, "_{EMPTY_LIBRARY}_");
        return out;
    }
    let _ = writeln!(
        out,
        "| Total Papers | Analyzed | Categories |\n|---|---|---|\n| {} | {} | {} |",
        stats.total, stats.analyzed, stats.categories
    );

    for paper in papers {
        let _ = writeln!(out, "\n## {} — {}\n", paper.title, paper.status.badge());
        if !paper.authors.is_empty() {
            let _ = writeln!(out, "**Authors:** {}  ", paper.authors.join(", "));
        }
        let _ = writeln!(out, "**Year:** {}  ", paper.year);
        if !paper.category.is_empty() {
            let _ = writeln!(out, "**Category:** `{}`", paper.category);
        }
        if let Some(reason) = &paper.extraction_error {
            let _ = writeln!(out, "\n> **Warning:** text extraction failed ({reason})");
        }
        if !paper.executive_summary.is_empty() {
            let _ = writeln!(out, "\n**Executive Summary:**\n\n{}", paper.executive_summary);
        }
        if !paper.key_findings.is_empty() {
            out.push_str("\n**Key Findings:**\n\n");
            for finding in &paper.key_findings {
                let _ = writeln!(out, "- {finding}");
            }
        }
        if !paper.sections.is_empty() {
            out.push_str("\n**Sections:**\n\n");
            for section in &paper.sections {
                let _ = writeln!(out, "- **{}:** {}", section.title, section.summary);
            }
        }
    }
    out
}

fn comparison_markdown(record: &ComparisonRecord) -> String {
    let analysis = &record.analysis;
    let mut out = String::from("# Comparison Analysis\n\n## Papers Being Compared\n\n");
    for (idx, paper) in record.papers.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. **{}** - {}",
            idx + 1,
            paper.title,
            paper.authors.join(", ")
        );
    }

    if !analysis.common_themes.is_empty() {
        out.push_str("\n## Common Themes\n\n");
        for theme in &analysis.common_themes {
            let _ = writeln!(out, "- {theme}");
        }
    }
    if !analysis.agreements.is_empty() {
        out.push_str("\n## Areas of Agreement\n");
        for (idx, a) in analysis.agreements.iter().enumerate() {
            let _ = writeln!(out, "\n**{}. {}**\n\n{}", idx + 1, a.title, a.description);
            if !a.papers.is_empty() {
                let _ = writeln!(out, "\n_Papers: {}_", a.papers.join(", "));
            }
        }
    }
    if !analysis.contradictions.is_empty() {
        out.push_str("\n## Contradictions\n");
        for (idx, c) in analysis.contradictions.iter().enumerate() {
            let _ = writeln!(out, "\n**{}. {}**\n\n{}\n", idx + 1, c.title, c.description);
            for view in &c.conflicting_views {
                let _ = writeln!(out, "- {view}");
            }
        }
    }
    if !analysis.research_gaps.is_empty() {
        out.push_str("\n## Research Gaps\n");
        for (idx, g) in analysis.research_gaps.iter().enumerate() {
            let _ = writeln!(
                out,
                "\n**{}. {}**\n\n*Potential Impact:* {}",
                idx + 1,
                g.gap,
                g.potential_impact
            );
        }
    }
    if !analysis.unique_contributions.is_empty() {
        out.push_str("\n## Unique Contributions\n\n");
        for c in &analysis.unique_contributions {
            let _ = writeln!(out, "- **{}**: {}", c.paper, c.contribution);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperlens_core::{PlaceholderAnalyzer, PlaceholderComparator, Session};

    fn session() -> Session {
        let mut s = Session::new();
        let analyzer = PlaceholderAnalyzer::default();
        s.add_paper(&analyzer, "Graph Nets", "abc");
        s.add_paper(&analyzer, "Diffusion", "def");
        s
    }

    #[test]
    fn empty_library_says_so() {
        let s = Session::new();
        let text = export_library(s.papers(), &s.stats(), ExportFormat::Text).unwrap();
        assert!(text.contains(EMPTY_LIBRARY));
    }

    #[test]
    fn library_text_lists_papers_and_stats() {
        let s = session();
        let text = export_library(s.papers(), &s.stats(), ExportFormat::Text).unwrap();
        assert!(text.contains("Total Papers: 2   Analyzed: 2   Categories: 1"));
        assert!(text.contains("[1] Graph Nets  (✓ Analyzed)"));
        assert!(text.contains("      • Key finding 2"));
        assert!(text.contains("Methods: Research methodology"));
    }

    #[test]
    fn extraction_failure_is_flagged() {
        let mut s = Session::new();
        let failed = paperlens_core::Extraction::Failed {
            reason: "bad xref".into(),
        };
        s.ingest(&PlaceholderAnalyzer::default(), "Broken", &failed);
        let md = export_library(s.papers(), &s.stats(), ExportFormat::Markdown).unwrap();
        assert!(md.contains("text extraction failed (bad xref)"));
    }

    #[test]
    fn comparison_text_numbers_papers() {
        let mut s = session();
        s.select(2).unwrap();
        s.select(1).unwrap();
        let cmp = s.compare(&PlaceholderComparator).unwrap();
        let text = export_comparison(cmp, ExportFormat::Text).unwrap();
        assert!(text.contains("  1. Diffusion - Author 1, Author 2"));
        assert!(text.contains("  2. Graph Nets"));
        assert!(text.contains("Papers: Diffusion, Graph Nets"));
        assert!(text.contains("Graph Nets: Novel approach in Computer Science"));
    }

    #[test]
    fn comparison_json_round_trips() {
        let mut s = session();
        s.select(1).unwrap();
        s.select(2).unwrap();
        let cmp = s.compare(&PlaceholderComparator).unwrap().clone();
        let json = export_comparison(&cmp, ExportFormat::Json).unwrap();
        let back: ComparisonRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmp);
    }
}

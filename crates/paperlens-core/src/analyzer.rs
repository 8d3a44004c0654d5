//! Single-paper analysis.
//!
//! [`Analyzer`] is the seam where a real text-analysis or model-inference
//! service plugs in. The bundled [`PlaceholderAnalyzer`] only echoes the title
//! and the opening of the text into a fixed-shape record.

use paperlens_pdf::truncate_chars;

use crate::{Limits, PaperRecord, PaperStatus, Section};

/// Turns a document's title and extracted text into a paper record.
pub trait Analyzer {
    /// Analyze one document. `id` is assigned by the caller.
    fn analyze(&self, id: u32, title: &str, text: &str) -> PaperRecord;
}

/// Abstract used when the document yielded no text at all.
pub const NO_ABSTRACT: &str = "No abstract available";

/// Returns the same placeholder analysis for every document.
#[derive(Debug, Clone)]
pub struct PlaceholderAnalyzer {
    abstract_chars: usize,
}

impl PlaceholderAnalyzer {
    pub fn new(limits: &Limits) -> Self {
        Self {
            abstract_chars: limits.abstract_chars,
        }
    }
}

impl Default for PlaceholderAnalyzer {
    fn default() -> Self {
        Self::new(&Limits::default())
    }
}

impl Analyzer for PlaceholderAnalyzer {
    fn analyze(&self, id: u32, title: &str, text: &str) -> PaperRecord {
        let abstract_text = if text.is_empty() {
            NO_ABSTRACT.to_string()
        } else {
            truncate_chars(text, self.abstract_chars).to_string()
        };

        PaperRecord {
            id,
            title: title.to_string(),
            authors: strings(&["Author 1", "Author 2"]),
            abstract_text,
            year: 2024,
            executive_summary: format!(
                "This paper on '{title}' presents comprehensive research findings."
            ),
            key_findings: strings(&["Key finding 1", "Key finding 2", "Key finding 3"]),
            methodology: "Experimental and analytical methods were employed.".to_string(),
            sections: [
                ("Introduction", "Background and motivation"),
                ("Methods", "Research methodology"),
                ("Results", "Key findings and data"),
                ("Discussion", "Analysis and implications"),
            ]
            .into_iter()
            .map(|(title, summary)| Section {
                title: title.to_string(),
                summary: summary.to_string(),
            })
            .collect(),
            keywords: strings(&["AI", "Research", "Analysis"]),
            category: "Computer Science".to_string(),
            status: PaperStatus::Completed,
            extraction_error: None,
        }
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_echoed_into_summary() {
        let rec = PlaceholderAnalyzer::default().analyze(3, "Deep Nets", "body");
        assert_eq!(rec.id, 3);
        assert_eq!(rec.title, "Deep Nets");
        assert_eq!(
            rec.executive_summary,
            "This paper on 'Deep Nets' presents comprehensive research findings."
        );
        assert_eq!(rec.status, PaperStatus::Completed);
        assert_eq!(rec.status.badge(), "✓ Analyzed");
        assert_eq!(rec.sections.len(), 4);
        assert_eq!(rec.sections[2].title, "Results");
    }

    #[test]
    fn abstract_is_first_500_chars() {
        let text = "é".repeat(800);
        let rec = PlaceholderAnalyzer::default().analyze(1, "t", &text);
        assert_eq!(rec.abstract_text.chars().count(), 500);
        assert!(text.starts_with(&rec.abstract_text));
    }

    #[test]
    fn short_text_is_whole_abstract() {
        let rec = PlaceholderAnalyzer::default().analyze(1, "t", "tiny");
        assert_eq!(rec.abstract_text, "tiny");
    }

    #[test]
    fn empty_text_has_no_abstract() {
        let rec = PlaceholderAnalyzer::default().analyze(1, "t", "");
        assert_eq!(rec.abstract_text, NO_ABSTRACT);
    }
}

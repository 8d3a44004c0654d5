use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod analyzer;
pub mod comparator;
pub mod session;
pub mod upload;

// Re-export for convenience
pub use analyzer::{Analyzer, PlaceholderAnalyzer};
pub use comparator::{Comparator, PlaceholderComparator};
pub use paperlens_pdf::{EXTRACTION_ERROR_SENTINEL, Extraction, PdfBackend};
pub use session::{LibraryStats, Session};
pub use upload::{
    BatchSummary, UploadFile, UploadPhase, UploadProgress, process_batch, title_from_filename,
};

/// Why a paper could not be added to the comparison selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("at most {max} papers can be compared at once")]
    LimitReached { max: usize },
    #[error("no paper with id {0}")]
    UnknownPaper(u32),
    #[error("select {min}-{max} papers to compare")]
    TooFew { min: usize, max: usize },
}

/// Whether a paper has been analyzed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperStatus {
    Completed,
    Processing,
}

impl PaperStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Analyzed",
            Self::Processing => "Processing",
        }
    }

    /// Label with its status glyph, as the library views show it.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Completed => "✓ Analyzed",
            Self::Processing => "⟳ Processing",
        }
    }
}

/// A titled section summary within a paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub summary: String,
}

/// The stored result of processing one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: u32,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub year: i32,
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub methodology: String,
    pub sections: Vec<Section>,
    pub keywords: Vec<String>,
    pub category: String,
    pub status: PaperStatus,
    /// Set when the document text could not be extracted; the abstract then
    /// holds the sentinel rather than real content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

/// A point the compared papers agree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    pub title: String,
    pub description: String,
    pub papers: Vec<String>,
}

/// A point the compared papers disagree on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    pub title: String,
    pub description: String,
    pub conflicting_views: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchGap {
    pub gap: String,
    pub potential_impact: String,
}

/// What a single paper adds relative to the rest of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub paper: String,
    pub contribution: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonAnalysis {
    pub common_themes: Vec<String>,
    pub agreements: Vec<Agreement>,
    pub contradictions: Vec<Contradiction>,
    pub research_gaps: Vec<ResearchGap>,
    pub unique_contributions: Vec<Contribution>,
}

/// The stored result of analyzing a selected group of papers together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// The compared papers, in selection order.
    pub papers: Vec<PaperRecord>,
    pub analysis: ComparisonAnalysis,
}

/// Size limits applied while ingesting and comparing papers.
#[derive(Debug, Clone)]
pub struct Limits {
    pub max_text_chars: usize,
    pub abstract_chars: usize,
    pub min_selection: usize,
    pub max_selection: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_text_chars: paperlens_pdf::MAX_TEXT_CHARS,
            abstract_chars: 500,
            min_selection: 2,
            max_selection: 5,
        }
    }
}

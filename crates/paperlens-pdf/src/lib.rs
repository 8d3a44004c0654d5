use std::path::Path;
use thiserror::Error;

pub mod backend;

pub use backend::PdfBackend;
#[cfg(feature = "pdf")]
pub use backend::MupdfBackend;

/// Maximum number of characters kept from a document's extracted text.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Placeholder text shown where the document text would be when extraction fails.
pub const EXTRACTION_ERROR_SENTINEL: &str = "Error extracting PDF text";

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("document has no pages")]
    EmptyDocument,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of extracting text from one uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Concatenated page text, already truncated to [`MAX_TEXT_CHARS`].
    Text(String),
    /// Extraction aborted; no partial text is kept.
    Failed { reason: String },
}

impl Extraction {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The text to feed downstream: the extracted text, or
    /// [`EXTRACTION_ERROR_SENTINEL`] when extraction failed.
    pub fn text_or_sentinel(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Failed { .. } => EXTRACTION_ERROR_SENTINEL,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

/// Extract up to `limit` characters of text from an in-memory PDF.
///
/// Every backend error collapses into [`Extraction::Failed`]; the caller
/// decides how to present it.
pub fn extract_with_limit(backend: &dyn PdfBackend, bytes: &[u8], limit: usize) -> Extraction {
    match backend.extract_text(bytes) {
        Ok(text) => Extraction::Text(truncate_chars(&text, limit).to_string()),
        Err(e) => {
            log::warn!("PDF extraction failed: {e}");
            Extraction::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Extract up to [`MAX_TEXT_CHARS`] characters of text from an in-memory PDF.
pub fn extract(backend: &dyn PdfBackend, bytes: &[u8]) -> Extraction {
    extract_with_limit(backend, bytes, MAX_TEXT_CHARS)
}

/// Read a PDF from disk and extract its text. A read failure is reported
/// the same way as a parse failure.
pub fn extract_file(backend: &dyn PdfBackend, path: &Path) -> Extraction {
    match std::fs::read(path) {
        Ok(bytes) => extract(backend, &bytes),
        Err(e) => {
            let err = PdfError::Io(e);
            log::warn!("could not read {}: {err}", path.display());
            Extraction::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// Return the prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

use crate::PdfError;

/// Trait for PDF text extraction backends.
///
/// Implementors return the concatenated text of every page, in page order.
/// Truncation and failure classification happen in [`crate::extract`].
pub trait PdfBackend: Send + Sync {
    /// Extract the full text content of an in-memory PDF document.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError>;
}

/// MuPDF-backed text extraction.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

#[cfg(feature = "pdf")]
impl PdfBackend for MupdfBackend {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError> {
        use mupdf::{Document, TextPageFlags};

        let doc = Document::from_bytes(bytes, "application/pdf")
            .map_err(|e| PdfError::OpenError(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| PdfError::OpenError(e.to_string()))?;
        if page_count <= 0 {
            return Err(PdfError::EmptyDocument);
        }

        let mut text = String::new();
        for page_num in 0..page_count {
            // Any failing page aborts the whole document.
            let page = doc
                .load_page(page_num)
                .map_err(|e| PdfError::ExtractionError(format!("page {}: {e}", page_num + 1)))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| PdfError::ExtractionError(format!("page {}: {e}", page_num + 1)))?;
            for block in text_page.blocks() {
                for line in block.lines() {
                    text.extend(line.chars().filter_map(|ch| ch.char()));
                    text.push('\n');
                }
            }
        }
        Ok(text)
    }
}

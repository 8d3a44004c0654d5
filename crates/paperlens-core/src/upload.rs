//! Upload batches: extraction, analysis, and progress for a set of files.

use std::path::Path;

use serde::Serialize;

use paperlens_pdf::{Extraction, PdfBackend, extract_with_limit};

use crate::{Analyzer, PaperRecord, Session};

/// One uploaded document.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    pub fn title(&self) -> String {
        title_from_filename(&self.name)
    }

    /// Extract this file's text, capped at `limit` chars. Touches no session
    /// state, so callers may run it without holding any lock.
    pub fn extract(&self, backend: &dyn PdfBackend, limit: usize) -> Extraction {
        extract_with_limit(backend, &self.bytes, limit)
    }
}

/// Derive a paper title from an uploaded file name: directories are dropped
/// and every ".pdf" occurrence is removed.
pub fn title_from_filename(name: &str) -> String {
    let base = name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(name);
    base.replace(".pdf", "")
}

/// How far an upload batch has progressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub done: usize,
    pub total: usize,
}

impl UploadProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

/// Upload view states: nothing chosen, files chosen, or a batch running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading {
        files: Vec<String>,
    },
    Processing(UploadProgress),
}

impl UploadPhase {
    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing(_))
    }
}

/// Outcome counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub analyzed: usize,
    /// Files whose text could not be extracted. They are still in the library.
    pub failed: usize,
}

/// Process `files` one after another: extract, analyze, append.
///
/// `on_progress` runs after each file with the running progress and the
/// record just appended. One file's failure never stops the rest.
pub fn process_batch(
    session: &mut Session,
    backend: &dyn PdfBackend,
    analyzer: &dyn Analyzer,
    files: Vec<UploadFile>,
    mut on_progress: impl FnMut(UploadProgress, &PaperRecord),
) -> BatchSummary {
    let total = files.len();
    let limit = session.limits().max_text_chars;
    let mut summary = BatchSummary::default();

    for (idx, file) in files.into_iter().enumerate() {
        log::info!("processing {} ({}/{})", file.name, idx + 1, total);
        let extraction = file.extract(backend, limit);
        if extraction.is_failed() {
            summary.failed += 1;
        }
        let record = session.ingest(analyzer, &file.title(), &extraction);
        summary.analyzed += 1;
        on_progress(
            UploadProgress {
                done: idx + 1,
                total,
            },
            record,
        );
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_strips_every_pdf_suffix() {
        assert_eq!(title_from_filename("paper.pdf"), "paper");
        assert_eq!(title_from_filename("dir/paper.pdf"), "paper");
        assert_eq!(title_from_filename("a.pdf.pdf"), "a");
        assert_eq!(title_from_filename("notes.PDF"), "notes.PDF");
    }

    #[test]
    fn fraction_of_empty_batch_is_zero() {
        let p = UploadProgress { done: 0, total: 0 };
        assert_eq!(p.fraction(), 0.0);
    }

    #[test]
    fn fraction_tracks_done() {
        let p = UploadProgress { done: 1, total: 4 };
        assert_eq!(p.fraction(), 0.25);
    }
}

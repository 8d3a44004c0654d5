use paperlens_core::Extraction;

/// Events flowing from the backend extraction task to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// Text extraction started for the file at `index` in the batch.
    FileStarted {
        index: usize,
        total: usize,
        name: String,
    },
    /// Extraction finished (successfully or not) for one file.
    FileExtracted {
        index: usize,
        total: usize,
        name: String,
        extraction: Extraction,
    },
    /// Every file in the batch has been extracted.
    BatchComplete { total: usize },
}

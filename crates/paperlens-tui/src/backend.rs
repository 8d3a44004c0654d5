use std::path::PathBuf;

use tokio::sync::mpsc;

use paperlens_core::Extraction;
use paperlens_pdf::MupdfBackend;

use crate::model::picker::display_name;
use crate::tui_event::BackendEvent;

/// Extract text from each PDF sequentially, sending one event per file.
///
/// Extraction is a blocking MuPDF call, so each file runs on the blocking
/// pool. Analysis and appending to the library stay with the receiver.
pub async fn run_batch(
    pdfs: Vec<PathBuf>,
    max_chars: usize,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    let total = pdfs.len();

    for (index, path) in pdfs.into_iter().enumerate() {
        let name = display_name(&path);
        let _ = tx.send(BackendEvent::FileStarted {
            index,
            total,
            name: name.clone(),
        });

        let extraction = tokio::task::spawn_blocking(move || match std::fs::read(&path) {
            Ok(bytes) => paperlens_pdf::extract_with_limit(&MupdfBackend, &bytes, max_chars),
            Err(e) => Extraction::Failed {
                reason: paperlens_pdf::PdfError::Io(e).to_string(),
            },
        })
        .await
        .unwrap_or_else(|e| Extraction::Failed {
            reason: format!("Task join error: {e}"),
        });

        if tx
            .send(BackendEvent::FileExtracted {
                index,
                total,
                name,
                extraction,
            })
            .is_err()
        {
            // UI is gone; nothing left to report to.
            return;
        }
    }

    let _ = tx.send(BackendEvent::BatchComplete { total });
}

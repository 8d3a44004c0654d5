//! Upload form handling and live batch progress over server-sent events.

use axum::extract::{Multipart, Path, State};
use axum::response::Html;
use axum::response::sse::{Event, Sse};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

use paperlens_core::{BatchSummary, PaperRecord, UploadFile, UploadProgress};

use crate::render::{self, Banner, PendingUpload};
use crate::routes::AppError;
use crate::state::AppState;

/// One step of a running upload batch, as sent to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UploadEvent {
    /// A file was extracted, analyzed and appended to the library.
    Progress {
        #[serde(flatten)]
        progress: UploadProgress,
        line: String,
    },
    /// Every file is in the library.
    Complete {
        analyzed: usize,
        failed: usize,
        message: String,
    },
}

impl UploadEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "progress",
            Self::Complete { .. } => "complete",
        }
    }
}

fn is_pdf(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

fn outcome_line(record: &PaperRecord) -> String {
    match &record.extraction_error {
        Some(reason) => format!("⚠ {}: text extraction failed ({reason})", record.title),
        None => format!("✓ {}", record.title),
    }
}

/// Extract, analyze and append each file in turn, reporting after each one.
///
/// Extraction runs without the session lock; the lock is taken only to
/// append each record.
pub fn run_batch(
    state: &AppState,
    files: Vec<UploadFile>,
    events: &mpsc::UnboundedSender<UploadEvent>,
) -> BatchSummary {
    let total = files.len();
    let limit = state.session().limits().max_text_chars;
    let mut summary = BatchSummary::default();

    for (idx, file) in files.into_iter().enumerate() {
        log::info!("processing {} ({}/{})", file.name, idx + 1, total);
        let extraction = file.extract(state.backend.as_ref(), limit);
        if extraction.is_failed() {
            summary.failed += 1;
        }
        let line = {
            let mut session = state.session();
            let record = session.ingest(state.analyzer.as_ref(), &file.title(), &extraction);
            outcome_line(record)
        };
        summary.analyzed += 1;

        // A closed feed only means nobody is watching; keep going.
        let _ = events.send(UploadEvent::Progress {
            progress: UploadProgress {
                done: idx + 1,
                total,
            },
            line,
        });
    }

    let _ = events.send(UploadEvent::Complete {
        analyzed: summary.analyzed,
        failed: summary.failed,
        message: format!("✓ Successfully analyzed {} paper(s)!", summary.analyzed),
    });
    summary
}

pub async fn upload_form() -> Html<String> {
    Html(render::upload_page(None, None, &[]))
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("files") {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if !is_pdf(&name) {
            skipped.push(name);
            continue;
        }
        let bytes = field.bytes().await?;
        files.push(UploadFile::new(name, bytes.to_vec()));
    }

    let lines: Vec<String> = skipped
        .iter()
        .map(|name| format!("⚠ Skipped {name}: not a PDF"))
        .collect();

    if files.is_empty() {
        let banner = Banner::Warning("Please choose one or more PDF files to upload.".into());
        return Ok(Html(render::upload_page(Some(&banner), None, &lines)));
    }

    let total = files.len();
    let (tx, rx) = mpsc::unbounded_channel();
    let job = state.register_upload(rx);
    let worker = state.clone();
    tokio::task::spawn_blocking(move || {
        let summary = run_batch(&worker, files, &tx);
        log::info!(
            "upload job {job} done: {} analyzed, {} failed extraction",
            summary.analyzed,
            summary.failed
        );
    });

    let banner = Banner::Info(format!("Analyzing {total} paper(s)..."));
    let pending = PendingUpload { job, total };
    Ok(Html(render::upload_page(Some(&banner), Some(pending), &lines)))
}

/// Stream a batch's progress until it completes.
pub async fn upload_events(
    State(state): State<AppState>,
    Path(job): Path<u64>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let events = state.take_upload(job).ok_or(AppError::UnknownUpload(job))?;
    let stream = UnboundedReceiverStream::new(events)
        .map(|event| Event::default().event(event.name()).json_data(&event));
    Ok(Sse::new(stream))
}

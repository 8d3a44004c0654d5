use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use paperlens_core::{
    Analyzer, Comparator, PdfBackend, PlaceholderAnalyzer, PlaceholderComparator, Session,
};

use crate::upload::UploadEvent;

/// Shared server state: one session plus the engines that act on it.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
    pub backend: Arc<dyn PdfBackend>,
    pub analyzer: Arc<dyn Analyzer + Send + Sync>,
    pub comparator: Arc<dyn Comparator + Send + Sync>,
    /// Progress feeds of running upload batches, keyed by job id, waiting
    /// for their event stream to be opened.
    uploads: Arc<Mutex<HashMap<u64, mpsc::UnboundedReceiver<UploadEvent>>>>,
    next_upload: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(backend: Arc<dyn PdfBackend>) -> Self {
        let session = Session::new();
        let analyzer = Arc::new(PlaceholderAnalyzer::new(session.limits()));
        Self {
            session: Arc::new(Mutex::new(session)),
            backend,
            analyzer,
            comparator: Arc::new(PlaceholderComparator),
            uploads: Arc::default(),
            next_upload: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Lock the session. A panic in another handler does not wedge the server.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Park a batch's progress feed and return its job id.
    pub fn register_upload(&self, events: mpsc::UnboundedReceiver<UploadEvent>) -> u64 {
        let job = self.next_upload.fetch_add(1, Ordering::Relaxed);
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(job, events);
        job
    }

    /// Claim a batch's progress feed. Each feed can be claimed once.
    pub fn take_upload(&self, job: u64) -> Option<mpsc::UnboundedReceiver<UploadEvent>> {
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&job)
    }
}

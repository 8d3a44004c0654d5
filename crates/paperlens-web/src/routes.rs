use axum::Router;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use thiserror::Error;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use paperlens_core::SelectionError;

use crate::render::{self, Banner};
use crate::state::AppState;
use crate::upload;

/// Default cap on an upload request body (all files together).
pub const DEFAULT_BODY_LIMIT: usize = 200 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("malformed form data: {0}")]
    Multipart(#[from] MultipartError),
    #[error("no upload in progress with id {0}")]
    UnknownUpload(u64),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::UnknownUpload(_) => StatusCode::NOT_FOUND,
        };
        log::warn!("request failed: {self}");
        (status, self.to_string()).into_response()
    }
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/library") }))
        .route("/library", get(library))
        .route("/upload", get(upload::upload_form).post(upload::upload))
        .route("/upload/events/{job}", get(upload::upload_events))
        .route("/compare", get(compare_form).post(compare))
        .route("/compare/reset", post(reset))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn library(State(state): State<AppState>) -> Html<String> {
    Html(render::library_page(&state.session(), None))
}

async fn compare_form(State(state): State<AppState>) -> Html<String> {
    Html(render::compare_page(&state.session(), None))
}

async fn compare(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut ids = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("paper") {
            continue;
        }
        let value = field.text().await?;
        match value.trim().parse::<u32>() {
            Ok(id) => ids.push(id),
            Err(_) => log::debug!("ignoring non-numeric paper id {value:?}"),
        }
    }

    let mut session = state.session();
    let banner = match session.replace_selection(&ids) {
        Ok(skipped) => {
            session.compare(state.comparator.as_ref());
            let problems: Vec<String> = skipped.iter().map(ToString::to_string).collect();
            (!problems.is_empty()).then(|| Banner::Warning(problems.join("; ")))
        }
        Err(SelectionError::TooFew { min, max }) => Some(Banner::Warning(format!(
            "Select {min}-{max} papers to compare."
        ))),
        Err(e) => Some(Banner::Warning(e.to_string())),
    };

    Ok(Html(render::compare_page(&session, banner.as_ref())))
}

async fn reset(State(state): State<AppState>) -> Redirect {
    state.session().reset_comparison();
    Redirect::to("/compare")
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, mpsc};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, header};
    use paperlens_pdf::{PdfBackend, PdfError};
    use tower::ServiceExt;

    use super::*;

    /// Treats the upload bytes as the document text; "BAD" marks an unreadable file.
    struct EchoBackend;

    impl PdfBackend for EchoBackend {
        fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError> {
            if bytes.starts_with(b"BAD") {
                return Err(PdfError::OpenError("not a pdf".into()));
            }
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    /// Holds every extraction until the test lets it through.
    struct GatedBackend {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl PdfBackend for GatedBackend {
        fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    const BOUNDARY: &str = "paperlens-test-boundary";

    fn test_state() -> AppState {
        AppState::new(Arc::new(EchoBackend))
    }

    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn form_post(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, String) {
        let resp = router(state.clone(), DEFAULT_BODY_LIMIT)
            .oneshot(req)
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_library() {
        let resp = router(test_state(), DEFAULT_BODY_LIMIT)
            .oneshot(get("/"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/library");
    }

    #[tokio::test]
    async fn empty_library_shows_hint() {
        let (status, html) = send(&test_state(), get("/library")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No research papers uploaded yet"));
    }

    /// The job id the upload page subscribes to.
    fn job_id(html: &str) -> u64 {
        let start = html.find("data-job=\"").unwrap() + "data-job=\"".len();
        let digits: String = html[start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().unwrap()
    }

    /// Post an upload and follow its event stream to the end.
    async fn upload_and_wait(
        state: &AppState,
        parts: &[(&str, Option<&str>, &str)],
    ) -> (String, String) {
        let (status, html) = send(state, form_post("/upload", multipart_body(parts))).await;
        assert_eq!(status, StatusCode::OK);
        let job = job_id(&html);
        let (status, events) = send(state, get(&format!("/upload/events/{job}"))).await;
        assert_eq!(status, StatusCode::OK);
        (html, events)
    }

    fn event_data(events: &str) -> Vec<&str> {
        events
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .collect()
    }

    #[tokio::test]
    async fn upload_adds_papers_and_skips_non_pdf() {
        let state = test_state();
        let (html, events) = upload_and_wait(
            &state,
            &[
                ("files", Some("deep_learning.pdf"), "Neural nets & <stuff>"),
                ("files", Some("notes.txt"), "plain"),
                ("files", Some("SCAN.PDF"), "BAD bytes"),
            ],
        )
        .await;
        assert!(html.contains("Analyzing 2 paper(s)..."));
        assert!(html.contains("Skipped notes.txt"));
        assert!(events.contains("✓ Successfully analyzed 2 paper(s)!"));
        assert!(events.contains("text extraction failed"));

        let session = state.session();
        assert_eq!(session.papers().len(), 2);
        assert_eq!(session.papers()[0].title, "deep_learning");
        assert_eq!(session.papers()[0].abstract_text, "Neural nets & <stuff>");
        assert!(session.papers()[1].extraction_error.is_some());
    }

    #[tokio::test]
    async fn upload_reports_progress_after_each_file() {
        let state = test_state();
        let (html, events) = upload_and_wait(
            &state,
            &[
                ("files", Some("a.pdf"), "alpha"),
                ("files", Some("b.pdf"), "BAD"),
                ("files", Some("c.pdf"), "gamma"),
            ],
        )
        .await;
        assert!(html.contains("value=\"0\" max=\"3\""));

        let data = event_data(&events);
        assert_eq!(data.len(), 4);
        assert!(data[0].contains("\"done\":1,\"total\":3"));
        assert!(data[0].contains("✓ a"));
        assert!(data[1].contains("\"done\":2,\"total\":3"));
        assert!(data[2].contains("\"done\":3,\"total\":3"));
        assert!(data[3].contains("\"kind\":\"complete\""));
        assert!(events.contains("event: progress"));

        // A feed is consumed by the first subscriber.
        let job = job_id(&html);
        let (status, _) = send(&state, get(&format!("/upload/events/{job}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn library_stays_responsive_while_batch_extracts() {
        let (open, gate) = mpsc::channel();
        let state = AppState::new(Arc::new(GatedBackend {
            gate: Mutex::new(gate),
        }));
        let body = multipart_body(&[("files", Some("slow.pdf"), "slow text")]);
        let (_, html) = send(&state, form_post("/upload", body)).await;

        let (status, library) =
            tokio::time::timeout(Duration::from_secs(5), send(&state, get("/library")))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(library.contains("No research papers uploaded yet"));

        open.send(()).unwrap();
        let job = job_id(&html);
        let (_, events) = send(&state, get(&format!("/upload/events/{job}"))).await;
        assert!(events.contains("event: complete"));
        assert_eq!(state.session().papers().len(), 1);
    }

    #[tokio::test]
    async fn library_escapes_titles() {
        let state = test_state();
        upload_and_wait(&state, &[("files", Some("a<b>&c.pdf"), "text")]).await;

        let (_, html) = send(&state, get("/library")).await;
        assert!(html.contains("a&lt;b&gt;&amp;c"));
        assert!(!html.contains("a<b>&c"));
    }

    #[tokio::test]
    async fn upload_without_files_warns() {
        let body = multipart_body(&[("files", Some("readme.md"), "x")]);
        let (status, html) = send(&test_state(), form_post("/upload", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Please choose one or more PDF files"));
        assert!(!html.contains("data-job"));
    }

    async fn seeded(n: usize) -> AppState {
        let state = test_state();
        let names: Vec<String> = (1..=n).map(|i| format!("paper{i}.pdf")).collect();
        let parts: Vec<(&str, Option<&str>, &str)> = names
            .iter()
            .map(|n| ("files", Some(n.as_str()), "content"))
            .collect();
        upload_and_wait(&state, &parts).await;
        state
    }

    fn picks(ids: &[&'static str]) -> String {
        let parts: Vec<(&str, Option<&str>, &str)> =
            ids.iter().map(|id| ("paper", None, *id)).collect();
        multipart_body(&parts)
    }

    #[tokio::test]
    async fn compare_needs_two_papers() {
        let state = seeded(3).await;
        let (_, html) = send(&state, form_post("/compare", picks(&["2"]))).await;
        assert!(html.contains("Select 2-5 papers to compare."));
        assert!(state.session().comparison().is_none());
    }

    #[tokio::test]
    async fn compare_keeps_pick_order_and_reset_clears() {
        let state = seeded(3).await;
        let (status, html) = send(&state, form_post("/compare", picks(&["3", "1"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Comparison Analysis"));
        {
            let session = state.session();
            let record = session.comparison().unwrap();
            let ids: Vec<u32> = record.papers.iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![3, 1]);
        }

        let reset = Request::builder()
            .method("POST")
            .uri("/compare/reset")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&state, reset).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(state.session().comparison().is_none());
    }

    #[tokio::test]
    async fn compare_caps_selection() {
        let state = seeded(6).await;
        let body = picks(&["1", "2", "3", "4", "5", "6"]);
        let (_, html) = send(&state, form_post("/compare", body)).await;
        assert!(html.contains("at most 5 papers"));
        assert_eq!(state.session().comparison().unwrap().papers.len(), 5);
    }

    #[tokio::test]
    async fn too_few_picks_keep_previous_selection() {
        let state = seeded(3).await;
        send(&state, form_post("/compare", picks(&["1", "2"]))).await;

        let (_, html) = send(&state, form_post("/compare", picks(&["3"]))).await;
        assert!(html.contains("Select 2-5 papers to compare."));
        assert!(html.contains("value=\"1\" checked"));
        assert!(!html.contains("value=\"3\" checked"));

        let session = state.session();
        assert_eq!(session.selection(), &[1, 2]);
        let shown: Vec<u32> = session
            .comparison()
            .unwrap()
            .papers
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(shown, vec![1, 2]);
    }

    #[tokio::test]
    async fn compare_page_warns_with_too_few_papers() {
        let state = seeded(1).await;
        let (_, html) = send(&state, get("/compare")).await;
        assert!(html.contains("You need at least 2 papers to compare"));
    }
}

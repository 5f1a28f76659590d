//! End-to-end session tests over a fake transport: messages flow through
//! the real channel plumbing, effect runner, and client worker thread.

use std::sync::{Arc, Mutex, Once};
use std::thread;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use analyzer_app::session::Session;
use analyzer_client::{
    ApiError, ApiFailureKind, ClientHandle, DocumentApi, WireAnalysis, WireDocument,
};
use analyzer_core::{AnalysisPane, ErrorKind, Msg, WorkflowView};

static INIT_LOGGING: Once = Once::new();

fn init_logging() {
    INIT_LOGGING.call_once(client_logging::initialize_for_tests);
}

fn wire_document(id: &str, filename: &str, page_count: u32) -> WireDocument {
    WireDocument {
        id: id.to_string(),
        filename: filename.to_string(),
        page_count,
        created_at: None,
    }
}

fn application_error(message: &str) -> ApiError {
    ApiError {
        kind: ApiFailureKind::Application,
        message: message.to_string(),
    }
}

/// Canned transport. Each call returns the configured response; calls are
/// recorded so tests can assert what actually went over the wire.
struct FakeApi {
    list_response: Mutex<Result<Vec<WireDocument>, ApiError>>,
    upload_response: Mutex<Option<Result<WireDocument, ApiError>>>,
    analysis_response: Mutex<Option<Result<WireAnalysis, ApiError>>>,
    delete_response: Mutex<Option<Result<(), ApiError>>>,
    analysis_requests: Mutex<Vec<String>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            list_response: Mutex::new(Ok(Vec::new())),
            upload_response: Mutex::new(None),
            analysis_response: Mutex::new(None),
            delete_response: Mutex::new(None),
            analysis_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentApi for FakeApi {
    async fn list_documents(&self) -> Result<Vec<WireDocument>, ApiError> {
        self.list_response.lock().unwrap().clone()
    }

    async fn search_documents(&self, _query: &str) -> Result<Vec<WireDocument>, ApiError> {
        self.list_documents().await
    }

    async fn upload_pdf(
        &self,
        _filename: &str,
        _mime_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<WireDocument, ApiError> {
        self.upload_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(application_error("no upload configured")))
    }

    async fn fetch_analysis(&self, document_id: &str) -> Result<WireAnalysis, ApiError> {
        self.analysis_requests
            .lock()
            .unwrap()
            .push(document_id.to_string());
        self.analysis_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(application_error("no analysis configured")))
    }

    async fn delete_document(&self, _document_id: &str) -> Result<(), ApiError> {
        self.delete_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(application_error("no delete configured")))
    }
}

fn session_over(api: Arc<FakeApi>) -> Session {
    Session::with_handle(ClientHandle::with_api(api))
}

/// Pump the session until `done(view)` holds or the deadline passes.
fn pump_until(session: &mut Session, done: impl Fn(&WorkflowView) -> bool) -> WorkflowView {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        session.pump();
        let view = session.view();
        if done(&view) {
            return view;
        }
        assert!(Instant::now() < deadline, "timed out waiting; view: {view:?}");
        thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn upload_success_adds_the_document_and_starts_analysis() {
    init_logging();
    let api = Arc::new(FakeApi::default());
    *api.upload_response.lock().unwrap() = Some(Ok(wire_document("doc-1", "resume.pdf", 2)));
    *api.analysis_response.lock().unwrap() = Some(Ok(WireAnalysis {
        document_id: None,
        overall_score: 78,
        key_strengths: vec!["clear structure".to_string()],
        priority_improvements: vec!["quantify impact".to_string()],
        overall_assessment: "solid".to_string(),
    }));

    let mut session = session_over(api.clone());
    pump_until(&mut session, |view| !view.busy.listing);

    session.apply(Msg::CandidateSelected {
        filename: "resume.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: vec![0u8; 2048],
    });
    session.apply(Msg::UploadSubmitted);
    assert!(session.view().busy.uploading);

    let view = pump_until(&mut session, |view| {
        matches!(view.analysis, AnalysisPane::Ready(_))
    });

    assert_eq!(view.documents.len(), 1);
    assert_eq!(view.documents[0].id, "doc-1");
    assert_eq!(view.documents[0].filename, "resume.pdf");
    assert!(view.candidate.is_none());
    assert_eq!(view.upload_progress, 100);
    assert!(view.last_error.is_none());
    match &view.analysis {
        AnalysisPane::Ready(result) => {
            assert_eq!(result.document_id, "doc-1");
            assert_eq!(result.overall_score, 78);
        }
        other => panic!("expected a ready analysis, got {other:?}"),
    }
    assert_eq!(*api.analysis_requests.lock().unwrap(), vec!["doc-1"]);
}

#[test]
fn upload_failure_keeps_the_candidate_and_reports_the_error() {
    init_logging();
    let api = Arc::new(FakeApi::default());
    *api.upload_response.lock().unwrap() = Some(Err(application_error("file too large")));

    let mut session = session_over(api);
    pump_until(&mut session, |view| !view.busy.listing);

    session.apply(Msg::CandidateSelected {
        filename: "resume.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: vec![0u8; 1024],
    });
    session.apply(Msg::UploadSubmitted);

    let view = pump_until(&mut session, |view| view.last_error.is_some());

    let error = view.last_error.as_ref().unwrap();
    assert_eq!(error.kind, ErrorKind::Application);
    assert_eq!(error.message, "file too large");
    assert!(view.documents.is_empty());
    assert_eq!(view.upload_progress, 0);
    assert!(!view.busy.uploading);
    assert_eq!(
        view.candidate.as_ref().map(|c| c.filename.as_str()),
        Some("resume.pdf")
    );
}

#[test]
fn delete_failure_leaves_the_document_and_its_analysis_in_place() {
    init_logging();
    let api = Arc::new(FakeApi::default());
    *api.list_response.lock().unwrap() = Ok(vec![wire_document("doc-1", "resume.pdf", 2)]);
    *api.delete_response.lock().unwrap() = Some(Err(application_error("not yours")));
    *api.analysis_response.lock().unwrap() = Some(Ok(WireAnalysis {
        document_id: None,
        overall_score: 61,
        key_strengths: vec![],
        priority_improvements: vec![],
        overall_assessment: String::new(),
    }));

    let mut session = session_over(api);
    pump_until(&mut session, |view| view.documents.len() == 1);

    session.apply(Msg::AnalyzeRequested {
        document_id: "doc-1".to_string(),
    });
    pump_until(&mut session, |view| {
        matches!(view.analysis, AnalysisPane::Ready(_))
    });

    session.apply(Msg::DeleteConfirmed {
        document_id: "doc-1".to_string(),
    });
    let view = pump_until(&mut session, |view| view.last_error.is_some());

    assert_eq!(view.documents.len(), 1);
    assert!(!view.documents[0].deleting);
    assert_eq!(view.busy.deleting, 0);
    assert_eq!(view.last_error.as_ref().unwrap().kind, ErrorKind::Application);
    assert!(matches!(view.analysis, AnalysisPane::Ready(_)));
}

#[test]
fn sign_out_clears_the_view_and_ignores_late_completions() {
    init_logging();
    let api = Arc::new(FakeApi::default());
    *api.list_response.lock().unwrap() = Ok(vec![wire_document("doc-1", "resume.pdf", 2)]);

    let mut session = session_over(api);
    pump_until(&mut session, |view| view.documents.len() == 1);

    session.apply(Msg::SearchInputChanged("rust".to_string()));
    session.sign_out();

    // Let the debounce timer and any in-flight replies land after the reset.
    thread::sleep(Duration::from_millis(400));
    session.pump();

    let view = session.view();
    assert!(view.documents.is_empty());
    assert!(view.search_input.is_empty());
    assert!(view.last_error.is_none());
    assert!(!view.busy.listing && !view.busy.searching);
}

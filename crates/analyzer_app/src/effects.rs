use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use analyzer_client::{ApiCommand, ApiCommands, ApiError, ApiEvent, ApiFailureKind, ClientHandle};
use analyzer_client::{WireAnalysis, WireDocument};
use analyzer_core::{AnalysisResult, Document, Effect, ErrorInfo, ErrorKind, Msg};
use client_logging::client_debug;

/// Quiet period before an edited search query is actually sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Executes the effects the core emits and feeds completions back as
/// messages. Network calls go to the `ClientHandle` worker; the debounce
/// timer is a short-lived thread tagged with the token it was armed for.
pub struct EffectRunner {
    commands: ApiCommands,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(handle: ClientHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        let commands = handle.commands();
        let runner = Self {
            commands,
            msg_tx: msg_tx.clone(),
        };
        runner.spawn_event_loop(handle, msg_tx);
        runner
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchList { token } => {
                    self.commands.submit(ApiCommand::FetchList { token });
                }
                Effect::SearchDocuments { token, query } => {
                    self.commands
                        .submit(ApiCommand::SearchDocuments { token, query });
                }
                Effect::SubmitUpload {
                    token,
                    filename,
                    mime_type,
                    bytes,
                } => {
                    self.commands.submit(ApiCommand::SubmitUpload {
                        token,
                        filename,
                        mime_type,
                        bytes,
                    });
                }
                Effect::FetchAnalysis { token, document_id } => {
                    self.commands
                        .submit(ApiCommand::FetchAnalysis { token, document_id });
                }
                Effect::DeleteDocument { token, document_id } => {
                    self.commands
                        .submit(ApiCommand::DeleteDocument { token, document_id });
                }
                Effect::ScheduleSearchDebounce { token } => {
                    client_debug!("arming search debounce (token={token})");
                    let tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(SEARCH_DEBOUNCE);
                        let _ = tx.send(Msg::SearchDebounceElapsed { token });
                    });
                }
            }
        }
    }

    fn spawn_event_loop(&self, handle: ClientHandle, msg_tx: mpsc::Sender<Msg>) {
        thread::spawn(move || loop {
            match handle.try_recv() {
                Some(event) => {
                    if msg_tx.send(map_event(event)).is_err() {
                        break;
                    }
                }
                None => thread::sleep(EVENT_POLL_INTERVAL),
            }
        });
    }
}

fn map_event(event: ApiEvent) -> Msg {
    match event {
        ApiEvent::LibraryLoaded { token, result } => Msg::LibraryLoaded {
            token,
            result: result
                .map(|docs| docs.into_iter().map(map_document).collect())
                .map_err(map_error),
        },
        ApiEvent::UploadFinished { token, result } => Msg::UploadFinished {
            token,
            result: result.map(map_document).map_err(map_error),
        },
        ApiEvent::AnalysisFinished {
            token,
            document_id,
            result,
        } => Msg::AnalysisFinished {
            token,
            result: result
                .map(|report| map_analysis(&document_id, report))
                .map_err(map_error),
        },
        ApiEvent::DeleteFinished {
            token,
            document_id,
            result,
        } => Msg::DeleteFinished {
            token,
            document_id,
            result: result.map_err(map_error),
        },
    }
}

fn map_document(document: WireDocument) -> Document {
    Document {
        id: document.id,
        filename: document.filename,
        page_count: document.page_count,
        created_at: document
            .created_at
            .map(|created| created.to_rfc3339())
            .unwrap_or_default(),
    }
}

/// The report is keyed by the id it was requested for; the wire field is
/// informational only and not every backend variant sends it.
fn map_analysis(document_id: &str, report: WireAnalysis) -> AnalysisResult {
    AnalysisResult {
        document_id: document_id.to_string(),
        overall_score: report.overall_score,
        key_strengths: report.key_strengths,
        priority_improvements: report.priority_improvements,
        overall_assessment: report.overall_assessment,
    }
}

fn map_error(error: ApiError) -> ErrorInfo {
    let kind = match error.kind {
        ApiFailureKind::Application => ErrorKind::Application,
        ApiFailureKind::InvalidRequest
        | ApiFailureKind::HttpStatus(_)
        | ApiFailureKind::Timeout
        | ApiFailureKind::Network
        | ApiFailureKind::Decode => ErrorKind::Transport,
    };
    ErrorInfo::new(kind, error.message)
}

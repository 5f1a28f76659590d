use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::{client_info, client_warn};

use crate::api::{DocumentApi, RestDocumentApi};
use crate::{ApiSettings, ClientBuildError, TokenProvider};
use crate::{WireAnalysis, WireDocument};

/// One network call to perform. Tokens are opaque here; they are echoed back
/// on the matching event so the state machine can drop stale replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    FetchList {
        token: u64,
    },
    SearchDocuments {
        token: u64,
        query: String,
    },
    SubmitUpload {
        token: u64,
        filename: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    FetchAnalysis {
        token: u64,
        document_id: String,
    },
    DeleteDocument {
        token: u64,
        document_id: String,
    },
}

/// Completion of one network call, in completion order (not issue order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEvent {
    LibraryLoaded {
        token: u64,
        result: Result<Vec<WireDocument>, crate::ApiError>,
    },
    UploadFinished {
        token: u64,
        result: Result<WireDocument, crate::ApiError>,
    },
    AnalysisFinished {
        token: u64,
        document_id: String,
        result: Result<WireAnalysis, crate::ApiError>,
    },
    DeleteFinished {
        token: u64,
        document_id: String,
        result: Result<(), crate::ApiError>,
    },
}

/// Cloneable command side of a `ClientHandle`.
#[derive(Clone)]
pub struct ApiCommands {
    cmd_tx: mpsc::Sender<ApiCommand>,
}

impl ApiCommands {
    pub fn submit(&self, command: ApiCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

/// Runs the transport on a dedicated worker thread with its own tokio
/// runtime. Commands go in over a channel; completion events come back out
/// and are polled by the session loop.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ApiCommand>,
    event_rx: mpsc::Receiver<ApiEvent>,
}

impl ClientHandle {
    pub fn new(
        settings: ApiSettings,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientBuildError> {
        let api = Arc::new(RestDocumentApi::new(settings, token_provider)?);
        Ok(Self::with_api(api))
    }

    /// Construct over any transport; used by tests to substitute a fake.
    pub fn with_api(api: Arc<dyn DocumentApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ApiEvent>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    client_warn!("client worker could not start a runtime: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = run_command(api.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit(&self, command: ApiCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ApiEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn commands(&self) -> ApiCommands {
        ApiCommands {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}

async fn run_command(api: &dyn DocumentApi, command: ApiCommand) -> ApiEvent {
    match command {
        ApiCommand::FetchList { token } => {
            client_info!("fetching document list (token={token})");
            let result = api.list_documents().await;
            if let Err(err) = &result {
                client_warn!("list fetch failed: {err}");
            }
            ApiEvent::LibraryLoaded { token, result }
        }
        ApiCommand::SearchDocuments { token, query } => {
            client_info!("searching documents (token={token}, query_len={})", query.len());
            let result = api.search_documents(&query).await;
            if let Err(err) = &result {
                client_warn!("search failed: {err}");
            }
            ApiEvent::LibraryLoaded { token, result }
        }
        ApiCommand::SubmitUpload {
            token,
            filename,
            mime_type,
            bytes,
        } => {
            client_info!("uploading {filename} ({} bytes, token={token})", bytes.len());
            let result = api.upload_pdf(&filename, &mime_type, bytes).await;
            if let Err(err) = &result {
                client_warn!("upload of {filename} failed: {err}");
            }
            ApiEvent::UploadFinished { token, result }
        }
        ApiCommand::FetchAnalysis { token, document_id } => {
            client_info!("fetching analysis for {document_id} (token={token})");
            let result = api.fetch_analysis(&document_id).await;
            if let Err(err) = &result {
                client_warn!("analysis of {document_id} failed: {err}");
            }
            ApiEvent::AnalysisFinished {
                token,
                document_id,
                result,
            }
        }
        ApiCommand::DeleteDocument { token, document_id } => {
            client_info!("deleting document {document_id} (token={token})");
            let result = api.delete_document(&document_id).await;
            if let Err(err) = &result {
                client_warn!("delete of {document_id} failed: {err}");
            }
            ApiEvent::DeleteFinished {
                token,
                document_id,
                result,
            }
        }
    }
}

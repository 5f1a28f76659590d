use crate::state::{MAX_CANDIDATE_BYTES, PDF_MIME};
use crate::view_model::PROGRESS_CAP;
use crate::{AnalysisPane, Effect, ErrorInfo, Msg, UploadCandidate, WorkflowState};

const PROGRESS_STEP: u8 = 10;

/// Pure update function: applies a message to state and returns any effects.
///
/// This is the only place `WorkflowState` is mutated. Completion messages
/// carry the request token they were issued with; a token that no longer
/// matches the slot's current value identifies a stale reply, which is
/// dropped rather than applied.
pub fn update(mut state: WorkflowState, msg: Msg) -> (WorkflowState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => {
            let token = state.next_library_token();
            state.set_listing();
            state.mark_dirty();
            vec![Effect::FetchList { token }]
        }
        Msg::SessionEnded => {
            state.reset_session();
            Vec::new()
        }
        Msg::CandidateSelected {
            filename,
            mime_type,
            bytes,
        } => {
            // Invalid selections leave any existing candidate untouched.
            if mime_type != PDF_MIME {
                state.set_error(ErrorInfo::validation("only PDF files are accepted"));
                return (state, Vec::new());
            }
            if bytes.len() > MAX_CANDIDATE_BYTES {
                state.set_error(ErrorInfo::validation("file exceeds the 5 MB limit"));
                return (state, Vec::new());
            }
            state.set_candidate(Some(UploadCandidate {
                filename,
                mime_type,
                bytes,
            }));
            state.set_upload_progress(0);
            state.clear_error();
            state.mark_dirty();
            Vec::new()
        }
        Msg::CandidateCleared => {
            // The candidate must survive an in-flight upload so a failure
            // can be retried without re-selecting the file.
            if !state.is_uploading()
                && (state.candidate().is_some() || state.upload_progress() > 0)
            {
                state.set_candidate(None);
                state.set_upload_progress(0);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadSubmitted => {
            if state.is_uploading() {
                state.set_error(ErrorInfo::concurrency("an upload is already in progress"));
                return (state, Vec::new());
            }
            let Some(candidate) = state.candidate().cloned() else {
                state.set_error(ErrorInfo::validation("no file selected"));
                return (state, Vec::new());
            };
            let token = state.next_upload_token();
            state.set_uploading(true);
            state.set_upload_progress(0);
            state.clear_error();
            state.mark_dirty();
            vec![Effect::SubmitUpload {
                token,
                filename: candidate.filename,
                mime_type: candidate.mime_type,
                bytes: candidate.bytes,
            }]
        }
        Msg::ProgressTick => {
            // Perceived progress only: advance while the transfer is pending,
            // capped below 100 so completion is never fabricated.
            if state.is_uploading() && state.upload_progress() < PROGRESS_CAP {
                let next = (state.upload_progress() + PROGRESS_STEP).min(PROGRESS_CAP);
                state.set_upload_progress(next);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadFinished { token, result } => {
            // A token minted before a session reset can never match again,
            // so a torn-down session's reply cannot land in a fresh one.
            if token != state.upload_token() || !state.is_uploading() {
                return (state, Vec::new());
            }
            state.set_uploading(false);
            state.mark_dirty();
            match result {
                Ok(document) => {
                    let document_id = document.id.clone();
                    state.set_upload_progress(100);
                    state.set_candidate(None);
                    state.clear_error();
                    state.merge_document(document);
                    // Hand the new document straight to the analysis slot;
                    // no user action required.
                    start_analysis(&mut state, document_id)
                }
                Err(error) => {
                    state.set_upload_progress(0);
                    state.set_error(error);
                    Vec::new()
                }
            }
        }
        Msg::AnalyzeRequested { document_id } => {
            if !state.contains_document(&document_id) {
                state.set_error(ErrorInfo::validation(format!(
                    "unknown document {document_id}"
                )));
                return (state, Vec::new());
            }
            if state.analysis().is_loading_for(&document_id) {
                // Same id already loading: no second network call.
                return (state, Vec::new());
            }
            state.mark_dirty();
            start_analysis(&mut state, document_id)
        }
        Msg::AnalysisFinished { token, result } => {
            if token != state.analysis_token() {
                return (state, Vec::new());
            }
            let AnalysisPane::Loading { document_id } = state.analysis().clone() else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            match result {
                Ok(report) => {
                    state.clear_error();
                    state.set_analysis(AnalysisPane::Ready(report));
                }
                Err(error) => {
                    // Surface the failure; the user must re-trigger, there is
                    // no automatic retry.
                    state.set_analysis(AnalysisPane::Failed { document_id });
                    state.set_error(error);
                }
            }
            Vec::new()
        }
        Msg::SearchInputChanged(input) => {
            state.set_search_input(input);
            let token = state.next_debounce_token();
            state.mark_dirty();
            vec![Effect::ScheduleSearchDebounce { token }]
        }
        Msg::SearchDebounceElapsed { token } => {
            if token != state.debounce_token() {
                // A newer edit or an explicit submit superseded this timer.
                return (state, Vec::new());
            }
            issue_library_request(&mut state)
        }
        Msg::SearchSubmitted => {
            // Explicit submission bypasses the quiet period and invalidates
            // any timer still pending for the last edit.
            state.next_debounce_token();
            issue_library_request(&mut state)
        }
        Msg::LibraryLoaded { token, result } => {
            if token != state.library_token() || !state.library_busy() {
                return (state, Vec::new());
            }
            state.clear_library_busy();
            state.mark_dirty();
            match result {
                Ok(documents) => state.replace_documents(documents),
                // Failure keeps the previous sequence untouched.
                Err(error) => state.set_error(error),
            }
            Vec::new()
        }
        Msg::DeleteConfirmed { document_id } => {
            if !state.contains_document(&document_id) {
                state.set_error(ErrorInfo::validation(format!(
                    "unknown document {document_id}"
                )));
                return (state, Vec::new());
            }
            if state.is_deleting(&document_id) {
                state.set_error(ErrorInfo::concurrency(format!(
                    "document {document_id} is already being deleted"
                )));
                return (state, Vec::new());
            }
            // Optimistic mark only: the row stays visible (controls disabled)
            // until the server confirms.
            let token = state.next_delete_token();
            state.mark_deleting(document_id.clone(), token);
            state.mark_dirty();
            vec![Effect::DeleteDocument { token, document_id }]
        }
        Msg::DeleteFinished {
            token,
            document_id,
            result,
        } => {
            if !state.unmark_deleting(&document_id, token) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(()) => state.remove_document(&document_id),
                Err(error) => state.set_error(error),
            }
            Vec::new()
        }
        Msg::ErrorDismissed => {
            if state.has_error() {
                state.clear_error();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn start_analysis(state: &mut WorkflowState, document_id: String) -> Vec<Effect> {
    let token = state.next_analysis_token();
    state.set_analysis(AnalysisPane::Loading {
        document_id: document_id.clone(),
    });
    vec![Effect::FetchAnalysis { token, document_id }]
}

/// List and search share one library slot; an empty query is a plain list.
fn issue_library_request(state: &mut WorkflowState) -> Vec<Effect> {
    let token = state.next_library_token();
    let query = state.search_input().trim().to_string();
    state.mark_dirty();
    if query.is_empty() {
        state.set_listing();
        vec![Effect::FetchList { token }]
    } else {
        state.set_searching();
        vec![Effect::SearchDocuments { token, query }]
    }
}

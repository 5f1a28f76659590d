use crate::{AnalysisResult, Document, ErrorInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session became active; triggers the initial library fetch.
    SessionStarted,
    /// User signed out; discard all state and ignore late completions.
    SessionEnded,
    /// User picked or dropped a file (picker and drag-drop share this path).
    CandidateSelected {
        filename: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// User discarded the pending candidate.
    CandidateCleared,
    /// User clicked upload for the pending candidate.
    UploadSubmitted,
    /// Fixed-interval timer tick driving perceived upload progress.
    ProgressTick,
    /// Transport completion for the single in-flight upload.
    UploadFinished {
        token: u64,
        result: Result<Document, ErrorInfo>,
    },
    /// User asked for the analysis of a document (also sent automatically
    /// after a successful upload, via the effect loop).
    AnalyzeRequested { document_id: String },
    /// Transport completion for an analysis fetch.
    AnalysisFinished {
        token: u64,
        result: Result<AnalysisResult, ErrorInfo>,
    },
    /// User edited the search box (raw text, debounced downstream).
    SearchInputChanged(String),
    /// The debounce quiet period for a given edit elapsed.
    SearchDebounceElapsed { token: u64 },
    /// User pressed enter / clicked search; bypasses the debounce.
    SearchSubmitted,
    /// Transport completion for a list or search request.
    LibraryLoaded {
        token: u64,
        result: Result<Vec<Document>, ErrorInfo>,
    },
    /// User confirmed deletion of a document (the confirmation dialog is a
    /// UI-level gate that happens before this message).
    DeleteConfirmed { document_id: String },
    /// Transport completion for a delete request.
    DeleteFinished {
        token: u64,
        document_id: String,
        result: Result<(), ErrorInfo>,
    },
    /// User dismissed the error notification.
    ErrorDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}

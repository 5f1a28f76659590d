use std::collections::BTreeMap;

use crate::view_model::{BusyView, CandidateView, DocumentRow, WorkflowView};
use crate::ErrorInfo;

/// The only MIME type accepted for upload candidates.
pub const PDF_MIME: &str = "application/pdf";

/// Client-side size cap for upload candidates (the UI advertises "max 5MB").
pub const MAX_CANDIDATE_BYTES: usize = 5 * 1024 * 1024;

/// Metadata for one uploaded document, as reported by the server.
///
/// Immutable once fetched except for removal; `created_at` is RFC 3339 text
/// and ordering is server-determined (never re-sorted client-side).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub page_count: u32,
    pub created_at: String,
}

/// A locally selected, not-yet-uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// AI feedback for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub document_id: String,
    pub overall_score: u8,
    pub key_strengths: Vec<String>,
    pub priority_improvements: Vec<String>,
    pub overall_assessment: String,
}

/// The single analysis report slot, scoped to the focused document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisPane {
    #[default]
    Idle,
    Loading {
        document_id: String,
    },
    Ready(AnalysisResult),
    Failed {
        document_id: String,
    },
}

impl AnalysisPane {
    /// Id of the focused document, if any report is associated with one.
    pub fn focused_document_id(&self) -> Option<&str> {
        match self {
            AnalysisPane::Idle => None,
            AnalysisPane::Loading { document_id } | AnalysisPane::Failed { document_id } => {
                Some(document_id)
            }
            AnalysisPane::Ready(result) => Some(&result.document_id),
        }
    }

    pub fn is_loading_for(&self, document_id: &str) -> bool {
        matches!(self, AnalysisPane::Loading { document_id: id } if id == document_id)
    }
}

/// The aggregate workflow state. Only `update` mutates it; the UI renders
/// from the `WorkflowView` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowState {
    documents: Vec<Document>,
    candidate: Option<UploadCandidate>,
    upload_progress: u8,
    analysis: AnalysisPane,
    last_error: Option<ErrorInfo>,
    search_input: String,
    listing: bool,
    searching: bool,
    uploading: bool,
    // In-flight deletes, keyed by document id, each carrying the token its
    // request was issued with.
    deleting: BTreeMap<String, u64>,
    // Monotonic request tokens; a completion whose token no longer matches
    // the slot's current value is stale and must be dropped.
    library_token: u64,
    analysis_token: u64,
    debounce_token: u64,
    upload_token: u64,
    delete_token: u64,
    dirty: bool,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> WorkflowView {
        WorkflowView {
            documents: self
                .documents
                .iter()
                .map(|doc| DocumentRow {
                    id: doc.id.clone(),
                    filename: doc.filename.clone(),
                    page_count: doc.page_count,
                    created_at: doc.created_at.clone(),
                    deleting: self.deleting.contains_key(&doc.id),
                })
                .collect(),
            candidate: self.candidate.as_ref().map(|c| CandidateView {
                filename: c.filename.clone(),
                size_bytes: c.size_bytes(),
            }),
            upload_progress: self.upload_progress,
            uploaded: self.upload_progress == 100 && self.candidate.is_none() && !self.uploading,
            analysis: self.analysis.clone(),
            busy: BusyView {
                listing: self.listing,
                uploading: self.uploading,
                analyzing: matches!(self.analysis, AnalysisPane::Loading { .. }),
                searching: self.searching,
                deleting: self.deleting.len(),
            },
            last_error: self.last_error.clone(),
            search_input: self.search_input.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ----- internal accessors and mutators, used by `update` only -----

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn contains_document(&self, document_id: &str) -> bool {
        self.documents.iter().any(|doc| doc.id == document_id)
    }

    /// Replace the full list atomically (list/search completion).
    pub(crate) fn replace_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.clear_analysis_if_unfocused();
    }

    /// Append or replace one document by id (upload completion).
    pub(crate) fn merge_document(&mut self, document: Document) {
        match self.documents.iter_mut().find(|doc| doc.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
    }

    /// Remove by id, never by position: concurrent deletes may complete
    /// out of order.
    pub(crate) fn remove_document(&mut self, document_id: &str) {
        self.documents.retain(|doc| doc.id != document_id);
        self.clear_analysis_if_unfocused();
    }

    fn clear_analysis_if_unfocused(&mut self) {
        let orphaned = self
            .analysis
            .focused_document_id()
            .is_some_and(|id| !self.contains_document(id));
        if orphaned {
            self.reset_analysis();
        }
    }

    pub(crate) fn analysis(&self) -> &AnalysisPane {
        &self.analysis
    }

    pub(crate) fn set_analysis(&mut self, pane: AnalysisPane) {
        self.analysis = pane;
    }

    /// Drop the report and invalidate any in-flight analysis fetch.
    pub(crate) fn reset_analysis(&mut self) {
        self.analysis = AnalysisPane::Idle;
        self.analysis_token += 1;
    }

    pub(crate) fn candidate(&self) -> Option<&UploadCandidate> {
        self.candidate.as_ref()
    }

    pub(crate) fn set_candidate(&mut self, candidate: Option<UploadCandidate>) {
        self.candidate = candidate;
    }

    pub(crate) fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub(crate) fn set_upload_progress(&mut self, progress: u8) {
        self.upload_progress = progress;
    }

    pub(crate) fn set_error(&mut self, error: ErrorInfo) {
        self.last_error = Some(error);
        self.dirty = true;
    }

    pub(crate) fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub(crate) fn search_input(&self) -> &str {
        &self.search_input
    }

    pub(crate) fn set_search_input(&mut self, input: String) {
        self.search_input = input;
    }

    pub(crate) fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub(crate) fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }

    pub(crate) fn library_busy(&self) -> bool {
        self.listing || self.searching
    }

    pub(crate) fn set_listing(&mut self) {
        self.listing = true;
        self.searching = false;
    }

    pub(crate) fn set_searching(&mut self) {
        self.searching = true;
        self.listing = false;
    }

    pub(crate) fn clear_library_busy(&mut self) {
        self.listing = false;
        self.searching = false;
    }

    pub(crate) fn is_deleting(&self, document_id: &str) -> bool {
        self.deleting.contains_key(document_id)
    }

    pub(crate) fn mark_deleting(&mut self, document_id: String, token: u64) {
        self.deleting.insert(document_id, token);
    }

    /// Clears the in-flight mark only when the completion's token matches
    /// the request the id is currently marked for.
    pub(crate) fn unmark_deleting(&mut self, document_id: &str, token: u64) -> bool {
        if self.deleting.get(document_id) == Some(&token) {
            self.deleting.remove(document_id);
            return true;
        }
        false
    }

    pub(crate) fn library_token(&self) -> u64 {
        self.library_token
    }

    pub(crate) fn next_library_token(&mut self) -> u64 {
        self.library_token += 1;
        self.library_token
    }

    pub(crate) fn analysis_token(&self) -> u64 {
        self.analysis_token
    }

    pub(crate) fn next_analysis_token(&mut self) -> u64 {
        self.analysis_token += 1;
        self.analysis_token
    }

    pub(crate) fn debounce_token(&self) -> u64 {
        self.debounce_token
    }

    pub(crate) fn next_debounce_token(&mut self) -> u64 {
        self.debounce_token += 1;
        self.debounce_token
    }

    pub(crate) fn upload_token(&self) -> u64 {
        self.upload_token
    }

    pub(crate) fn next_upload_token(&mut self) -> u64 {
        self.upload_token += 1;
        self.upload_token
    }

    pub(crate) fn next_delete_token(&mut self) -> u64 {
        self.delete_token += 1;
        self.delete_token
    }

    /// Tear down the session: everything goes back to its empty initial
    /// form, but the token counters keep climbing so completions issued
    /// before the reset can never match a token handed out after it.
    pub(crate) fn reset_session(&mut self) {
        self.documents.clear();
        self.candidate = None;
        self.upload_progress = 0;
        self.analysis = AnalysisPane::Idle;
        self.last_error = None;
        self.search_input.clear();
        self.listing = false;
        self.searching = false;
        self.uploading = false;
        self.deleting.clear();
        self.library_token += 1;
        self.analysis_token += 1;
        self.debounce_token += 1;
        self.upload_token += 1;
        self.delete_token += 1;
        self.dirty = true;
    }
}

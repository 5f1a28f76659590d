#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the full document list. The token tags the eventual
    /// `Msg::LibraryLoaded` so stale replies can be discarded.
    FetchList { token: u64 },
    /// Server-side search over the document list.
    SearchDocuments { token: u64, query: String },
    /// Upload the pending candidate as a multipart request. The token tags
    /// the eventual `Msg::UploadFinished`.
    SubmitUpload {
        token: u64,
        filename: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// Fetch the AI analysis for one document.
    FetchAnalysis { token: u64, document_id: String },
    /// Delete one document remotely. The token tags the eventual
    /// `Msg::DeleteFinished` for this id.
    DeleteDocument { token: u64, document_id: String },
    /// Arm the search debounce timer; fires `Msg::SearchDebounceElapsed`
    /// with the same token after the quiet period.
    ScheduleSearchDebounce { token: u64 },
}

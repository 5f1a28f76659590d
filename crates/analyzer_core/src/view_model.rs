use crate::{AnalysisPane, ErrorInfo};

/// Highest value simulated progress may reach before the upload resolves;
/// jumping to 100 is reserved for confirmed success.
pub const PROGRESS_CAP: u8 = 90;

/// Immutable snapshot the UI renders from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkflowView {
    pub documents: Vec<DocumentRow>,
    pub candidate: Option<CandidateView>,
    pub upload_progress: u8,
    /// True right after a successful upload, before the next state change
    /// touches the progress bar (the "uploaded, analyzing..." banner).
    pub uploaded: bool,
    pub analysis: AnalysisPane,
    pub busy: BusyView,
    pub last_error: Option<ErrorInfo>,
    pub search_input: String,
    pub dirty: bool,
}

/// One row of the document library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub id: String,
    pub filename: String,
    pub page_count: u32,
    pub created_at: String,
    /// Row controls are disabled while its delete is in flight.
    pub deleting: bool,
}

/// The pending candidate as shown in the uploader card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateView {
    pub filename: String,
    pub size_bytes: usize,
}

impl CandidateView {
    /// Human-readable size, e.g. "2.00 MB".
    pub fn size_label(&self) -> String {
        let mb = self.size_bytes as f64 / (1024.0 * 1024.0);
        if mb >= 0.01 {
            format!("{mb:.2} MB")
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

/// Advisory busy markers preventing overlapping operations of one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusyView {
    pub listing: bool,
    pub uploading: bool,
    pub analyzing: bool,
    pub searching: bool,
    /// Number of in-flight deletes (distinct document ids).
    pub deleting: usize,
}

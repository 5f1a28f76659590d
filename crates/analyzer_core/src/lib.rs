//! Analyzer core: pure document-workflow state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{ErrorInfo, ErrorKind};
pub use msg::Msg;
pub use state::{
    AnalysisPane, AnalysisResult, Document, UploadCandidate, WorkflowState, MAX_CANDIDATE_BYTES,
    PDF_MIME,
};
pub use update::update;
pub use view_model::{BusyView, CandidateView, DocumentRow, WorkflowView, PROGRESS_CAP};

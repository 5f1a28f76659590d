use std::fmt;

/// Broad classification of a reported failure, used by the UI to pick
/// presentation (e.g. destructive vs. informational toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network call (bad file type, unknown id).
    Validation,
    /// Rejected because it would overlap an in-flight operation of the same class.
    Concurrency,
    /// Network-level failure: unreachable, timeout, non-2xx status.
    Transport,
    /// The server answered `success: false` with a message.
    Application,
}

/// A user-visible, dismissable failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn concurrency(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Concurrency, message)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Validation => "validation",
            ErrorKind::Concurrency => "concurrency",
            ErrorKind::Transport => "transport",
            ErrorKind::Application => "application",
        };
        write!(f, "{kind}: {}", self.message)
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Document metadata as the backend reports it. The original backend spells
/// the id `_id` and the fields camelCase; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireDocument {
    #[serde(alias = "_id")]
    pub id: String,
    pub filename: String,
    #[serde(default, alias = "pageCount")]
    pub page_count: u32,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// AI analysis payload for one document.
///
/// `document_id` is not reliably present in every backend variant; the
/// caller keys the result by the id it requested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAnalysis {
    #[serde(default)]
    pub document_id: Option<String>,
    pub overall_score: u8,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub priority_improvements: Vec<String>,
    #[serde(default)]
    pub overall_assessment: String,
}

/// A normalized transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiFailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailureKind {
    /// The request could not be constructed (bad url, bad MIME string).
    InvalidRequest,
    /// Non-2xx response without a usable application message.
    HttpStatus(u16),
    Timeout,
    Network,
    /// The server answered `success: false` with a message.
    Application,
    /// 2xx response whose body did not match the expected envelope.
    Decode,
}

impl fmt::Display for ApiFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailureKind::InvalidRequest => write!(f, "invalid request"),
            ApiFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailureKind::Timeout => write!(f, "timeout"),
            ApiFailureKind::Network => write!(f, "network error"),
            ApiFailureKind::Application => write!(f, "application error"),
            ApiFailureKind::Decode => write!(f, "malformed response"),
        }
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}

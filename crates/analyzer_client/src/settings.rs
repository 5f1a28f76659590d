use std::time::Duration;

use thiserror::Error;

/// Whether list/search payloads arrive wrapped once or twice.
///
/// The backend variants disagree: some return `data: { documents: [...] }`,
/// others `data: [...]` directly. This is configuration, not something the
/// client guesses at per response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `data` is the document array itself.
    Bare,
    /// `data` is an object holding a `documents` array.
    Wrapped,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Backend root including the API prefix, e.g. `http://host/api/v1`.
    pub base_url: String,
    /// Attach a bearer token from the `TokenProvider` to each request.
    pub require_auth: bool,
    pub connect_timeout: Duration,
    /// Every call carries this timeout so a hung request eventually reports
    /// failure instead of leaving a busy flag set forever.
    pub request_timeout: Duration,
    pub list_shape: PayloadShape,
    pub search_shape: PayloadShape,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://resume-backend-2zxa.onrender.com/api/v1".to_string(),
            require_auth: true,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            list_shape: PayloadShape::Wrapped,
            search_shape: PayloadShape::Bare,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid base url {url}: {message}")]
    BaseUrl { url: String, message: String },
    #[error("failed to construct http client: {0}")]
    Http(String),
}

/// Validate the base URL and strip any trailing slash so endpoint paths can
/// be appended uniformly.
pub(crate) fn normalized_base_url(settings: &ApiSettings) -> Result<String, ClientBuildError> {
    let raw = settings.base_url.trim_end_matches('/');
    url::Url::parse(raw).map_err(|err| ClientBuildError::BaseUrl {
        url: settings.base_url.clone(),
        message: err.to_string(),
    })?;
    Ok(raw.to_string())
}

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;

use crate::settings::normalized_base_url;
use crate::types::map_reqwest_error;
use crate::{
    ApiError, ApiFailureKind, ApiSettings, ClientBuildError, PayloadShape, TokenProvider,
    WireAnalysis, WireDocument,
};

/// The transport surface the workflow depends on. One method per endpoint;
/// each resolves to a normalized result and issues exactly one request.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<WireDocument>, ApiError>;
    async fn search_documents(&self, query: &str) -> Result<Vec<WireDocument>, ApiError>;
    async fn upload_pdf(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<WireDocument, ApiError>;
    async fn fetch_analysis(&self, document_id: &str) -> Result<WireAnalysis, ApiError>;
    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError>;
}

/// `reqwest`-backed implementation against the REST backend.
pub struct RestDocumentApi {
    client: reqwest::Client,
    base_url: String,
    settings: ApiSettings,
    token_provider: Arc<dyn TokenProvider>,
}

impl RestDocumentApi {
    pub fn new(
        settings: ApiSettings,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, ClientBuildError> {
        let base_url = normalized_base_url(&settings)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientBuildError::Http(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            settings,
            token_provider,
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}/{path}", self.base_url));
        if self.settings.require_auth {
            // The token is short-lived; fetch it fresh for every request.
            if let Some(token) = self.token_provider.token() {
                builder = builder.bearer_auth(token);
            }
        }
        builder
    }

    async fn send_for_data(&self, builder: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        decode_envelope(status.as_u16(), status.is_success(), &body)
    }
}

#[async_trait]
impl DocumentApi for RestDocumentApi {
    async fn list_documents(&self) -> Result<Vec<WireDocument>, ApiError> {
        let data = self
            .send_for_data(self.request(reqwest::Method::GET, "documents"))
            .await?;
        documents_from(data, self.settings.list_shape)
    }

    async fn search_documents(&self, query: &str) -> Result<Vec<WireDocument>, ApiError> {
        let builder = self
            .request(reqwest::Method::GET, "documents/search")
            .query(&[("query", query)]);
        let data = self.send_for_data(builder).await?;
        documents_from(data, self.settings.search_shape)
    }

    async fn upload_pdf(
        &self,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<WireDocument, ApiError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidRequest, err.to_string()))?;
        let form = multipart::Form::new().part("pdf", part);
        let builder = self
            .request(reqwest::Method::POST, "documents/upload")
            .multipart(form);
        let data = self.send_for_data(builder).await?;
        document_from_upload(data)
    }

    async fn fetch_analysis(&self, document_id: &str) -> Result<WireAnalysis, ApiError> {
        let data = self
            .send_for_data(self.request(reqwest::Method::GET, &format!("analysis/{document_id}")))
            .await?;
        serde_json::from_value(data)
            .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), ApiError> {
        self.send_for_data(
            self.request(reqwest::Method::DELETE, &format!("documents/{document_id}")),
        )
        .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Normalize one response into its `data` payload or a typed failure.
///
/// Non-2xx is failure regardless of body; a `success: false` body with a
/// message wins over the bare status because it is more specific; anything
/// unparseable falls back to a failure keyed by the HTTP status.
fn decode_envelope(status: u16, ok: bool, body: &[u8]) -> Result<Value, ApiError> {
    let envelope: Envelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if !ok => {
            return Err(ApiError::new(
                ApiFailureKind::HttpStatus(status),
                format!("server returned status {status}"),
            ));
        }
        Err(err) => return Err(ApiError::new(ApiFailureKind::Decode, err.to_string())),
    };

    if !envelope.success {
        if let Some(message) = envelope.message {
            return Err(ApiError::new(ApiFailureKind::Application, message));
        }
        if !ok {
            return Err(ApiError::new(
                ApiFailureKind::HttpStatus(status),
                format!("server returned status {status}"),
            ));
        }
        return Err(ApiError::new(ApiFailureKind::Application, "request failed"));
    }
    if !ok {
        return Err(ApiError::new(
            ApiFailureKind::HttpStatus(status),
            format!("server returned status {status}"),
        ));
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}

/// Unpack a document array from `data`, honoring the configured wrapping.
/// An absent payload is an empty (not erroneous) result.
fn documents_from(data: Value, shape: PayloadShape) -> Result<Vec<WireDocument>, ApiError> {
    let value = match shape {
        PayloadShape::Bare => data,
        PayloadShape::Wrapped => data
            .get("documents")
            .cloned()
            .unwrap_or(Value::Null),
    };
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value)
        .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
}

/// Upload responses wrap the new document in `data.document`; some backend
/// variants return it as `data` directly.
fn document_from_upload(data: Value) -> Result<WireDocument, ApiError> {
    let value = match data.get("document") {
        Some(document) => document.clone(),
        None => data,
    };
    serde_json::from_value(value)
        .map_err(|err| ApiError::new(ApiFailureKind::Decode, err.to_string()))
}

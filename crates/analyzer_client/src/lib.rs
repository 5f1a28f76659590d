//! Analyzer client: REST transport and command/event bridge to the backend.
mod api;
mod auth;
mod handle;
mod settings;
mod types;

pub use api::{DocumentApi, RestDocumentApi};
pub use auth::{NoAuth, StaticToken, TokenProvider};
pub use handle::{ApiCommand, ApiCommands, ApiEvent, ClientHandle};
pub use settings::{ApiSettings, ClientBuildError, PayloadShape};
pub use types::{ApiError, ApiFailureKind, WireAnalysis, WireDocument};

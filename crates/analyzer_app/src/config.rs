use std::sync::Arc;
use std::time::Duration;

use analyzer_client::{ApiSettings, NoAuth, PayloadShape, TokenProvider};

/// Environment-driven application configuration.
///
/// Several backend deployments exist (a hosted instance and local dev
/// servers on differing ports), so the base URL is a setting rather than a
/// constant. The hosted instance requires a bearer token; local ones do not.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub require_auth: bool,
    pub request_timeout_secs: u64,
    /// Whether search responses wrap the array as `data.documents`.
    pub wrapped_search: bool,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://resume-backend-2zxa.onrender.com/api/v1".to_string(),
            require_auth: true,
            request_timeout_secs: 30,
            wrapped_search: false,
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            base_url: std::env::var("ANALYZER_BASE_URL").unwrap_or(default.base_url),
            require_auth: env_flag("ANALYZER_REQUIRE_AUTH").unwrap_or(default.require_auth),
            request_timeout_secs: std::env::var("ANALYZER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.request_timeout_secs),
            wrapped_search: env_flag("ANALYZER_WRAPPED_SEARCH").unwrap_or(default.wrapped_search),
            verbose: env_flag("ANALYZER_VERBOSE").unwrap_or(default.verbose),
        }
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            require_auth: self.require_auth,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            search_shape: if self.wrapped_search {
                PayloadShape::Wrapped
            } else {
                PayloadShape::Bare
            },
            ..ApiSettings::default()
        }
    }

    pub fn token_provider(&self) -> Arc<dyn TokenProvider> {
        if self.require_auth {
            Arc::new(EnvTokenProvider)
        } else {
            Arc::new(NoAuth)
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Reads `ANALYZER_BEARER_TOKEN` on every call, so a rotated token is picked
/// up without restarting the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvTokenProvider;

impl TokenProvider for EnvTokenProvider {
    fn token(&self) -> Option<String> {
        std::env::var("ANALYZER_BEARER_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
    }
}

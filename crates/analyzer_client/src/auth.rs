/// Supplies a short-lived bearer token for the current identity.
///
/// Called fresh before every authenticated request; returning `None` sends
/// the request unauthenticated and lets the server answer 401 if it insists.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Provider for backends that do not require authentication.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuth;

impl TokenProvider for NoAuth {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Fixed token, mainly for tests and the demo binary.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

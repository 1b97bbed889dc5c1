//! Bearer token source.
//!
//! Token storage and expiry live outside this crate; the client only asks
//! for the current value before every call.

/// Supplies the opaque bearer token attached to every request.
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when signed out.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, typically read from the environment.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    /// Read `ADLOC_API_TOKEN`; empty values count as signed out.
    pub fn from_env() -> Self {
        Self(std::env::var("ADLOC_API_TOKEN").ok().filter(|t| !t.is_empty()))
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

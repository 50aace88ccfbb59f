//! Access tokens and request-scoped credential providers.
//!
//! Gateways ask a [`TokenProvider`] for a token on every request instead of
//! mutating shared client headers, so a refreshed session is picked up by the
//! next request without touching the client.

use async_trait::async_trait;

use super::error::ApiError;

/// Bearer token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ApiError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ApiError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AccessToken(***)")
    }
}

/// Supplies the credential for a single request.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the token to attach, or `None` for anonymous requests.
    async fn access_token(&self) -> Result<Option<AccessToken>, ApiError>;
}

/// Provider returning a fixed token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: Option<AccessToken>,
}

impl StaticTokenProvider {
    /// Provider that always attaches `token`.
    #[must_use]
    pub const fn new(token: AccessToken) -> Self {
        Self { token: Some(token) }
    }

    /// Provider that never attaches a token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<Option<AccessToken>, ApiError> {
        Ok(self.token.clone())
    }
}

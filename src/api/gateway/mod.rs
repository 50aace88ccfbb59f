//! Gateways for loading list pages from the REST backend.
//!
//! The [`PageGateway`] trait is the seam between the table controller and
//! the network: controllers only ever see envelopes and [`ApiError`]s, which
//! keeps them testable with scripted or mocked gateways.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use url::Url;

use super::envelope::PageEnvelope;
use super::error::ApiError;
use super::token::TokenProvider;

mod error_mapping;
mod http_utils;

use error_mapping::{map_http_error, map_transport_error};
use http_utils::extract_api_message;

/// Ordered query-string parameters for a list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns the first value recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns true when `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Borrow the parameters as name/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Gateway that can load list pages and apply partial updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageGateway: Send + Sync {
    /// Fetch one page from `endpoint` using `params` as the query string.
    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<PageEnvelope<serde_json::Value>, ApiError>;

    /// Send a partial update to `endpoint` and return the updated record.
    async fn patch(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError>;
}

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// `reqwest`-backed gateway.
pub struct HttpPageGateway {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl HttpPageGateway {
    /// Builds a gateway rooted at `base_url`.
    ///
    /// Endpoints are resolved relative to the base, so `properties/` against
    /// `https://api.example.com/api` becomes `https://api.example.com/api/properties/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` when the base URL cannot be parsed or
    /// `ApiError::Configuration` when the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        tokens: Arc<dyn TokenProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
            .build()
            .map_err(|error| ApiError::Configuration {
                message: format!("failed to configure HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url: normalise_base_url(base_url)?,
            tokens,
        })
    }

    /// Returns the normalised base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|error| ApiError::InvalidUrl(format!("{endpoint}: {error}")))
    }

    async fn authorise(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(match self.tokens.access_token().await? {
            Some(token) => request.bearer_auth(token.value()),
            None => request,
        })
    }

    async fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .authorise(request)
            .await?
            .send()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_http_error(operation, status, extract_api_message(&body)))
    }
}

#[async_trait]
impl PageGateway for HttpPageGateway {
    async fn fetch_page(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<PageEnvelope<serde_json::Value>, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, params = ?params.pairs(), "fetching page");

        let request = self.client.get(url).query(params.pairs());
        self.send("list", request)
            .await?
            .json::<PageEnvelope<serde_json::Value>>()
            .await
            .map_err(|error| ApiError::Decode {
                message: format!("list response: {error}"),
            })
    }

    async fn patch(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, "patching record");

        let request = self.client.patch(url).json(body);
        self.send("update", request)
            .await?
            .json::<serde_json::Value>()
            .await
            .map_err(|error| ApiError::Decode {
                message: format!("update response: {error}"),
            })
    }
}

/// Parses the base URL and guarantees a trailing slash so that `Url::join`
/// appends endpoints instead of replacing the last path segment.
fn normalise_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::MissingBaseUrl);
    }

    let mut url = Url::parse(trimmed).map_err(|error| ApiError::InvalidUrl(error.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{trimmed} cannot be a base URL")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

//! Namespace resolution for import spaces.
//!
//! Which conditional rules apply to a batch depends on the namespace of the
//! import space it belongs to, held by the platform's metadata API.
//! Resolution sits behind a trait so batch processing is testable without
//! network access; the HTTP client is configured from the environment.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rowguard::resolver::{HttpSpaceResolver, NamespaceResolver};
//!
//! let resolver = HttpSpaceResolver::from_env()?;
//! let namespace = resolver.resolve("us_sp_123").await?;
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::{LookupError, LookupResult};

/// Default client-side timeout for space lookups.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolves an import space to its namespace string.
///
/// One call per batch; failures are surfaced to the batch boundary, which
/// handles them fail-open.
#[async_trait]
pub trait NamespaceResolver: Send + Sync {
    /// Resolve the namespace of an import space.
    async fn resolve(&self, space_id: &str) -> LookupResult<String>;
}

// =============================================================================
// HTTP resolver
// =============================================================================

/// Metadata API response envelope.
#[derive(Debug, Deserialize)]
struct SpaceResponse {
    data: SpaceData,
}

#[derive(Debug, Deserialize)]
struct SpaceData {
    /// Spaces created without a namespace report it as empty.
    #[serde(default)]
    namespace: String,
}

/// HTTP client for the spaces metadata API.
///
/// Reads `GET {base}/spaces/{id}` and extracts `data.namespace`.
#[derive(Debug, Clone)]
pub struct HttpSpaceResolver {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpSpaceResolver {
    /// Create a resolver with an explicit API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a resolver from `SPACES_API_URL`, `SPACES_API_TOKEN` and
    /// `SPACES_TIMEOUT_SECS`.
    pub fn from_env() -> LookupResult<Self> {
        // Pick up a .env file if present
        let _ = dotenvy::dotenv();

        let base_url = env::var("SPACES_API_URL")
            .map_err(|_| LookupError::MissingCredentials("SPACES_API_URL not set".to_string()))?;

        let mut resolver = Self::new(base_url);
        if let Ok(token) = env::var("SPACES_API_TOKEN") {
            resolver = resolver.with_token(token);
        }
        if let Some(secs) = env::var("SPACES_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            resolver = resolver.with_timeout(Duration::from_secs(secs));
        }
        Ok(resolver)
    }

    /// Set the bearer token sent with lookups.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the client-side request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn space_url(&self, space_id: &str) -> String {
        format!("{}/spaces/{}", self.base_url.trim_end_matches('/'), space_id)
    }
}

#[async_trait]
impl NamespaceResolver for HttpSpaceResolver {
    async fn resolve(&self, space_id: &str) -> LookupResult<String> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

        let mut request = client
            .get(self.space_url(space_id))
            .header("Accept", "application/json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::UnknownSpace(space_id.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(LookupError::RequestFailed(format!("HTTP {}: {}", status, body)));
        }

        let parsed: SpaceResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        Ok(parsed.data.namespace)
    }
}

// =============================================================================
// Fixed resolver
// =============================================================================

/// Resolver that always answers with a preset namespace.
///
/// Used by the offline CLI path, by requests that carry an explicit
/// namespace, and by tests.
#[derive(Debug, Clone, Default)]
pub struct FixedNamespace(pub String);

impl FixedNamespace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }
}

#[async_trait]
impl NamespaceResolver for FixedNamespace {
    async fn resolve(&self, _space_id: &str) -> LookupResult<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_response_parsing() {
        let body = r#"{ "data": { "id": "us_sp_123", "namespace": "Update Records" } }"#;
        let parsed: SpaceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.namespace, "Update Records");

        // A space without a namespace reads as empty
        let body = r#"{ "data": { "id": "us_sp_456" } }"#;
        let parsed: SpaceResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.namespace, "");
    }

    #[test]
    fn test_space_url_building() {
        let resolver = HttpSpaceResolver::new("https://api.example.com/v1/");
        assert_eq!(
            resolver.space_url("us_sp_123"),
            "https://api.example.com/v1/spaces/us_sp_123"
        );
    }

    #[tokio::test]
    async fn test_fixed_namespace_ignores_space_id() {
        let resolver = FixedNamespace::new("Update Records");
        assert_eq!(resolver.resolve("anything").await.unwrap(), "Update Records");
        assert_eq!(resolver.resolve("else").await.unwrap(), "Update Records");

        let resolver = FixedNamespace::default();
        assert_eq!(resolver.resolve("x").await.unwrap(), "");
    }
}

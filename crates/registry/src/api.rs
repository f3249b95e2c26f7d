//! HTTP client for the registry's components API.
//!
//! Wraps `GET /service/rest/v1/components` using [`reqwest`]. The
//! credential is an opaque, already-encoded value that is sent as
//! `Authorization: Basic <credential>` without any re-encoding.

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};

use crate::models::ComponentPage;

/// Path appended to the registry base URL to reach the REST API.
const REST_ROOT_PATH: &str = "/service/rest";

/// Authorization scheme prefix placed in front of the credential.
const AUTH_SCHEME_PREFIX: &str = "Basic ";

/// HTTP client for one registry instance.
pub struct RegistryClient {
    client: reqwest::Client,
    rest_root: String,
    credential: String,
}

/// Errors from the registry REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The HTTP request itself failed (network, DNS, TLS, bad URL, or an
    /// undecodable body).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The registry returned a non-2xx status code.
    #[error("Registry API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The credential contains bytes that are not valid in a header value.
    #[error("Credential cannot be sent in an Authorization header: {0}")]
    InvalidCredential(String),
}

impl RegistryClient {
    /// Create a client for a registry.
    ///
    /// * `base_url`   - Registry base URL, e.g. `https://nexus.example.com`.
    /// * `credential` - Pre-encoded value sent after `Basic `.
    ///
    /// Neither value is validated here; problems surface on the first
    /// request.
    pub fn new(base_url: &str, credential: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, credential)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (e.g. one
    /// built with a request timeout).
    pub fn with_client(client: reqwest::Client, base_url: &str, credential: String) -> Self {
        Self {
            client,
            rest_root: rest_root(base_url),
            credential,
        }
    }

    /// REST root all endpoints are resolved against.
    pub fn rest_root(&self) -> &str {
        &self.rest_root
    }

    /// Fetch one page of components for `repository`.
    ///
    /// Sends `GET /v1/components?repository=<repository>` and, when
    /// `continuation_token` is given, `&continuationToken=<token>`.
    pub async fn list_components(
        &self,
        repository: &str,
        continuation_token: Option<&str>,
    ) -> Result<ComponentPage, RegistryError> {
        let mut request = self
            .client
            .get(format!("{}/v1/components", self.rest_root))
            .header(AUTHORIZATION, self.authorization()?)
            .header(ACCEPT, "application/json")
            .query(&[("repository", repository)]);

        if let Some(token) = continuation_token {
            request = request.query(&[("continuationToken", token)]);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn authorization(&self) -> Result<HeaderValue, RegistryError> {
        let mut value = HeaderValue::from_str(&format!("{AUTH_SCHEME_PREFIX}{}", self.credential))
            .map_err(|e| RegistryError::InvalidCredential(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Ensure the response has a success status code, returning a
    /// [`RegistryError::ApiError`] with the status and body otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, RegistryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(RegistryError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RegistryError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Build the REST root from a base URL, tolerating a trailing slash.
fn rest_root(base_url: &str) -> String {
    format!("{}{REST_ROOT_PATH}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rest_root_appends_service_path() {
        assert_eq!(
            rest_root("https://nexus.example.com"),
            "https://nexus.example.com/service/rest"
        );
        assert_eq!(
            rest_root("https://nexus.example.com/"),
            "https://nexus.example.com/service/rest"
        );
    }

    #[test]
    fn authorization_uses_credential_verbatim() {
        let client = RegistryClient::new("http://localhost", "dXNlcjpwYXNz".into());
        let value = client.authorization().unwrap();
        assert_eq!(value.to_str().unwrap(), "Basic dXNlcjpwYXNz");
        assert!(value.is_sensitive());
    }

    #[test]
    fn control_characters_in_credential_are_rejected() {
        let client = RegistryClient::new("http://localhost", "abc\ndef".into());
        assert_matches!(
            client.authorization(),
            Err(RegistryError::InvalidCredential(_))
        );
    }

    #[tokio::test]
    async fn empty_base_url_fails_at_request_time() {
        let client = RegistryClient::new("", String::new());
        let result = client.list_components("npm-proxy", None).await;
        assert_matches!(result, Err(RegistryError::Request(_)));
    }
}

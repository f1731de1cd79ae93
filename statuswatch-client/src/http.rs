//! HTTP status source.
//!
//! Polls a JSON endpoint that answers `GET` with:
//!
//! ```json
//! { "status": "ok", "description": "All systems operational" }
//! ```
//!
//! Extra fields are ignored. A missing or non-string `status` or `description`
//! is reported as [`FetchError::Malformed`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use statuswatch_client::{HttpStatusClient, StatusSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpStatusClient::builder()
//!         .endpoint("http://192.168.1.20:8080/status")
//!         .build()?;
//!
//!     let snapshot = client.fetch().await?;
//!     println!("status: {}", snapshot.status());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use statuswatch_types::StatusSnapshot;

use crate::{FetchError, StatusSource};

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/status";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Status source backed by a single HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    client: Client,
    endpoint: Url,
    description: String,
}

impl HttpStatusClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpStatusClientBuilder {
        HttpStatusClientBuilder::default()
    }

    /// The URL this client polls.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_body(&self) -> Result<String, FetchError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "endpoint returned status {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        let body = self.fetch_body().await?;
        let snapshot = parse_status(&body)?;
        debug!(
            endpoint = %self.endpoint,
            status = snapshot.status(),
            "fetched status"
        );
        Ok(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpStatusClient.
#[derive(Debug, Default)]
pub struct HttpStatusClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpStatusClientBuilder {
    /// Set the full status URL (default: "http://localhost:8080/status").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// Fails with [`FetchError::InvalidEndpoint`] if the endpoint is not an
    /// absolute `http`/`https` URL.
    pub fn build(self) -> Result<HttpStatusClient, FetchError> {
        let raw = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint =
            Url::parse(&raw).map_err(|e| FetchError::InvalidEndpoint(format!("{raw}: {e}")))?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(FetchError::InvalidEndpoint(format!(
                "{raw}: unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        Ok(HttpStatusClient {
            client,
            description: format!("http: {}", endpoint),
            endpoint,
        })
    }
}

/// Body returned by the status endpoint.
#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
    description: String,
}

fn parse_status(body: &str) -> Result<StatusSnapshot, FetchError> {
    let parsed: StatusBody =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;
    Ok(StatusSnapshot::new(&parsed.status, parsed.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpStatusClient {
        HttpStatusClient::builder()
            .endpoint(format!("{}/status", server.uri()))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = HttpStatusClient::builder().build().unwrap();
        assert_eq!(client.endpoint().as_str(), DEFAULT_ENDPOINT);
        assert_eq!(client.description(), "http: http://localhost:8080/status");
    }

    #[test]
    fn test_builder_rejects_bad_endpoint() {
        let err = HttpStatusClient::builder()
            .endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint(_)));

        let err = HttpStatusClient::builder()
            .endpoint("ftp://example.com/status")
            .build()
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_parse_status_normalizes() {
        let snapshot =
            parse_status(r#"{"status":"WARNING","description":"Disk full","uptime":12}"#).unwrap();
        assert_eq!(snapshot.status(), "warning");
        assert_eq!(snapshot.description(), "Disk full");
    }

    #[test]
    fn test_parse_status_keeps_unknown_values() {
        let snapshot = parse_status(r#"{"status":"Degraded","description":"?"}"#).unwrap();
        assert_eq!(snapshot.status(), "degraded");
    }

    #[test]
    fn test_parse_status_missing_fields() {
        let err = parse_status(r#"{"description":"no status"}"#).unwrap_err();
        assert!(err.is_malformed());

        let err = parse_status(r#"{"status":"ok"}"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_parse_status_wrong_types() {
        let err = parse_status(r#"{"status":3,"description":"x"}"#).unwrap_err();
        assert!(err.is_malformed());

        let err = parse_status("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "Inspect", "description": "CPU high"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let snapshot = client.fetch().await.unwrap();

        assert_eq!(snapshot.status(), "inspect");
        assert_eq!(snapshot.description(), "CPU high");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Http(_)));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"state":"ok"}"#))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch().await.unwrap_err();

        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ok", "description": "slow"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let client = HttpStatusClient::builder()
            .endpoint("http://127.0.0.1:9/status")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_makes_single_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.fetch().await.is_err());
        // Mock expectations are verified when the server drops.
    }
}

//! Shared JSON-over-HTTP plumbing for the backend clients.

use std::time::{Duration, Instant};

use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use crate::BackendError;

/// Configuration for backend HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string (default: "tabthreads/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { user_agent: "tabthreads/0.1".to_string(), timeout: Duration::from_millis(20_000) }
    }
}

/// A reqwest client that decodes JSON bodies and maps failures.
#[derive(Debug, Clone)]
pub struct JsonClient {
    http: Client,
}

impl JsonClient {
    pub fn new(config: &HttpConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self { http })
    }

    /// GET `url` with optional query pairs and decode the JSON body.
    ///
    /// Any non-success status becomes [`BackendError::HttpError`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T, BackendError> {
        let start = Instant::now();

        let mut request = self.http.get(url).header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(url, status = status.as_u16(), "backend response");

        if !status.is_success() {
            return Err(BackendError::HttpError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let decoded = serde_json::from_slice(&bytes).map_err(|e| BackendError::Parse(e.to_string()))?;

        tracing::debug!(url, elapsed_ms = start.elapsed().as_millis() as u64, bytes = bytes.len(), "decoded backend response");

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.user_agent, "tabthreads/0.1");
        assert_eq!(config.timeout, Duration::from_millis(20_000));
    }

    #[tokio::test]
    async fn test_get_json_decodes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/data")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"value": 3}"#)
            .create_async()
            .await;

        let client = JsonClient::new(&HttpConfig::default()).unwrap();
        let body: serde_json::Value = client.get_json(&format!("{}/data", server.url()), &[]).await.unwrap();

        assert_eq!(body["value"], 3);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_json_maps_status() {
        let mut server = Server::new_async().await;
        let _m1 = server.mock("GET", "/data").with_status(503).create_async().await;

        let client = JsonClient::new(&HttpConfig::default()).unwrap();
        let result: Result<serde_json::Value, _> = client.get_json(&format!("{}/data", server.url()), &[]).await;

        assert!(matches!(result, Err(BackendError::HttpError { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_get_json_parse_error() {
        let mut server = Server::new_async().await;
        let _m2 = server.mock("GET", "/data").with_status(200).with_body("<html>").create_async().await;

        let client = JsonClient::new(&HttpConfig::default()).unwrap();
        let result: Result<serde_json::Value, _> = client.get_json(&format!("{}/data", server.url()), &[]).await;

        assert!(matches!(result, Err(BackendError::Parse(_))));
    }
}

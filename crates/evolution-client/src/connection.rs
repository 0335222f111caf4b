//! Shared connection to an Evolution API server
//!
//! Holds the base URL and an HTTP client preconfigured with the `apikey`
//! and JSON content-type headers. Every manager borrows the same
//! connection through an `Arc`.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{EvolutionError, Result};
use crate::response::ApiResponse;

/// Header carrying the global API key
pub const API_KEY_HEADER: &str = "apikey";

/// Connection settings and HTTP client
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    base_url: String,
}

impl Connection {
    /// Create a new connection
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|e| EvolutionError::Config(format!("Invalid API key header: {}", e)))?;
        headers.insert(API_KEY_HEADER, key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| EvolutionError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Global endpoint URL: `{base}/{endpoint}`
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_matches('/'))
    }

    /// Instance-scoped URL: `{base}/{endpoint}/{instance}`
    pub fn instance_url(&self, endpoint: &str, instance: &str) -> String {
        format!("{}/{}", self.url(endpoint), instance)
    }

    pub async fn get(&self, url: &str) -> Result<Value> {
        self.execute(self.client.get(url), Method::GET, url, Duration::ZERO)
            .await
    }

    /// GET with query parameters
    pub async fn get_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.execute(self.client.get(url).query(query), Method::GET, url, Duration::ZERO)
            .await
    }

    pub async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.execute(self.client.post(url).json(body), Method::POST, url, Duration::ZERO)
            .await
    }

    /// POST, then hold the caller for `pause` before returning.
    ///
    /// The pause keeps bulk senders under the remote abuse detection.
    pub async fn post_paced(&self, url: &str, body: &Value, pause: Duration) -> Result<Value> {
        self.execute(self.client.post(url).json(body), Method::POST, url, pause)
            .await
    }

    /// Like [`Connection::post_paced`] but keeps the success envelope
    pub async fn post_paced_envelope(
        &self,
        url: &str,
        body: &Value,
        pause: Duration,
    ) -> Result<ApiResponse> {
        self.execute_envelope(self.client.post(url).json(body), Method::POST, url, pause)
            .await
    }

    pub async fn put(&self, url: &str, body: &Value) -> Result<Value> {
        self.execute(self.client.put(url).json(body), Method::PUT, url, Duration::ZERO)
            .await
    }

    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.execute(self.client.delete(url), Method::DELETE, url, Duration::ZERO)
            .await
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        method: Method,
        url: &str,
        pause: Duration,
    ) -> Result<Value> {
        let envelope = self.execute_envelope(request, method, url, pause).await?;
        Ok(envelope.response.unwrap_or(Value::Null))
    }

    async fn execute_envelope(
        &self,
        request: RequestBuilder,
        method: Method,
        url: &str,
        pause: Duration,
    ) -> Result<ApiResponse> {
        debug!("{} {}", method, url);

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            EvolutionError::from(e)
        })?;

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        let envelope = ApiResponse::from_response(response).await;
        if envelope.success {
            Ok(envelope)
        } else {
            error!(
                "{} {} failed: {:?} - {}",
                method, url, envelope.status_code, envelope.message
            );
            Err(EvolutionError::Api(envelope))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let conn = Connection::new("https://evo.example.com/", "key", None).unwrap();
        assert_eq!(conn.base_url(), "https://evo.example.com");
        assert_eq!(
            conn.url("/instance/fetchInstances"),
            "https://evo.example.com/instance/fetchInstances"
        );
        assert_eq!(
            conn.instance_url("message/sendText/", "bot1"),
            "https://evo.example.com/message/sendText/bot1"
        );
    }

    #[test]
    fn test_invalid_api_key() {
        let result = Connection::new("https://evo.example.com", "bad\nkey", None);
        assert!(matches!(result, Err(EvolutionError::Config(_))));
    }
}

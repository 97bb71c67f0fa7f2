use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use shared::error::ApiErrorBody;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Request primitive consumed by the SDK. Paths are relative to the versioned
/// open-API prefix; responses are parsed as JSON (`Value::Null` for empty
/// bodies). Non-2xx responses surface as [`ClientError::Server`] with the
/// decoded error payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value>;
    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value>;
}

/// `reqwest`-backed transport that injects the caller's API key as the
/// `Authorization` header on every request.
pub struct HttpTransport {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, path, "api request");

        let mut request = self
            .http
            .request(method, &url)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .json::<ApiErrorBody>()
                .await
                .unwrap_or_else(|err| ApiErrorBody::from_message(err.to_string()));
            warn!(status = status.as_u16(), path, %body, "api request failed");
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.execute(Method::GET, path, None).await
    }

    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.execute(Method::POST, path, body).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

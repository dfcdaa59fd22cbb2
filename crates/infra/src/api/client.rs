//! JSON-over-HTTP client for the agent's REST API
//!
//! Every non-2xx response becomes `ConsoleError::Remote` carrying the body
//! text (or the canonical reason phrase when the body is empty). Nothing is
//! retried and nothing is cached.

use console_domain::{ApiConfig, ConsoleError, ConsoleResult};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Client bound to one backend base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the `[api]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Internal` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ApiConfig) -> ConsoleResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self::with_http(http, &config.base_url))
    }

    pub fn with_http(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a GET request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ConsoleResult<T> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    /// Execute a POST request with a JSON body
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ConsoleResult<R> {
        self.execute(Method::POST, path, Some(body)).await
    }

    /// Execute a POST request without a body
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> ConsoleResult<R> {
        self.execute(Method::POST, path, None::<&()>).await
    }

    /// Execute a PUT request with a JSON body
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ConsoleResult<R> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    async fn execute<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ConsoleResult<R> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, url = %url, "API request");

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            // `.json` also sets `Content-Type: application/json`.
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let error = Self::status_error(response).await;
            warn!(%method, url = %url, %status, error = %error, "API request rejected");
            return Err(error);
        }

        Self::decode(response).await
    }

    /// Error for a non-2xx response. A body that cannot be read is a
    /// transport failure, not an empty body.
    async fn status_error(response: Response) -> ConsoleError {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return ConsoleError::network(format!(
                    "failed to read {} response body: {err}",
                    status.as_u16()
                ));
            }
        };
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("unknown status").to_string()
        } else {
            body
        };
        ConsoleError::remote(status.as_u16(), message)
    }

    async fn decode<R: DeserializeOwned>(response: Response) -> ConsoleResult<R> {
        let status = response.status();

        // 204/205 carry no body by RFC; only unit-like targets accept that.
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ConsoleError::decode(format!(
                    "no content response ({}), but a body was expected",
                    status.as_u16()
                ))
            });
        }

        let text = response.text().await.map_err(|err| ConsoleError::from(InfraError::from(err)))?;
        serde_json::from_str(&text).map_err(|err| ConsoleError::from(InfraError::from(err)))
    }
}

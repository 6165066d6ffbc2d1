//! Byte-level HTTP transport consumed by remote sources.
//!
//! Remote sources build an [`HttpRequest`] per endpoint call and hand it to an
//! [`HttpClient`]. Status handling and payload interpretation stay with the
//! caller; the transport only reports whether a response arrived.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Payload format an endpoint is expected to answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Csv,
    Json,
}

impl PayloadFormat {
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

/// One GET call against a remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub format: PayloadFormat,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn csv(url: impl Into<String>) -> Self {
        Self::new(url, PayloadFormat::Csv)
    }

    pub fn json(url: impl Into<String>) -> Self {
        Self::new(url, PayloadFormat::Json)
    }

    fn new(url: impl Into<String>, format: PayloadFormat) -> Self {
        Self {
            url: url.into(),
            format,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// URL without its query string; safe to log since API keys live there.
    pub fn redacted_url(&self) -> &str {
        self.url
            .split_once('?')
            .map_or(self.url.as_str(), |(path, _)| path)
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The request never produced a complete response.
///
/// Messages never contain the request URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Transport contract consumed by the remote source.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stockwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let timeout_ms = request.timeout_ms;
            let response = self
                .client
                .get(&request.url)
                .header(ACCEPT, request.format.mime())
                .timeout(Duration::from_millis(timeout_ms))
                .send()
                .await
                .map_err(|e| classify(e, timeout_ms))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| HttpError::Body(e.without_url().to_string()))?;

            tracing::debug!(
                url = request.redacted_url(),
                status,
                bytes = body.len(),
                "http response"
            );
            Ok(HttpResponse::new(status, body.to_vec()))
        })
    }
}

// reqwest errors embed the full URL, API key included.
fn classify(error: reqwest::Error, timeout_ms: u64) -> HttpError {
    let error = error.without_url();
    if error.is_timeout() {
        HttpError::Timeout { timeout_ms }
    } else if error.is_connect() {
        HttpError::Connect(error.to_string())
    } else {
        HttpError::Request(error.to_string())
    }
}

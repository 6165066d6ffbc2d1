use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::remote::{CompanyInfoDto, StockApi, TransportError};
use crate::Symbol;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_API_KEY: &str = "demo";
pub const API_KEY_ENV: &str = "STOCKWATCH_ALPHAVANTAGE_API_KEY";
pub const BASE_URL_ENV: &str = "STOCKWATCH_ALPHAVANTAGE_BASE_URL";

/// Keys Alpha Vantage uses for throttling notices and request errors. They
/// arrive with a 200 status, as JSON, even on CSV endpoints.
const NOTICE_KEYS: [&str; 3] = ["Note", "Information", "Error Message"];

/// Alpha Vantage connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

impl ApiConfig {
    /// Read `STOCKWATCH_ALPHAVANTAGE_API_KEY` and `STOCKWATCH_ALPHAVANTAGE_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        Self {
            base_url: non_blank(BASE_URL_ENV)
                .unwrap_or_else(|| String::from(DEFAULT_BASE_URL))
                .trim_end_matches('/')
                .to_owned(),
            api_key: non_blank(API_KEY_ENV).unwrap_or_else(|| String::from(DEFAULT_API_KEY)),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: String::from(DEFAULT_API_KEY),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Debug for ApiConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Alpha Vantage implementation of [`StockApi`].
#[derive(Clone)]
pub struct AlphaVantageApi {
    http_client: Arc<dyn HttpClient>,
    config: ApiConfig,
}

impl AlphaVantageApi {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Real reqwest transport configured from the environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), ApiConfig::from_env())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn query_url(&self, function: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/query?function={function}", self.config.base_url);
        for (name, value) in params {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url.push_str("&apikey=");
        url.push_str(&urlencoding::encode(&self.config.api_key));
        url
    }

    async fn fetch(&self, function: &str, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let request = request.with_timeout_ms(self.config.timeout_ms);
        tracing::debug!(function, url = request.redacted_url(), "alphavantage request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            TransportError::unreachable(format!("alphavantage transport error: {e}"))
        })?;

        if !response.is_success() {
            return Err(TransportError::status(response.status));
        }

        Ok(response.body)
    }

    async fn fetch_csv(&self, function: &str, url: String) -> Result<Vec<u8>, TransportError> {
        let body = self.fetch(function, HttpRequest::csv(url)).await?;
        reject_json_on_csv_endpoint(&body)?;
        Ok(body)
    }
}

impl StockApi for AlphaVantageApi {
    fn listing_snapshot<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.query_url("LISTING_STATUS", &[]);
            self.fetch_csv("LISTING_STATUS", url).await
        })
    }

    fn intraday_series<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.query_url(
                "TIME_SERIES_INTRADAY",
                &[
                    ("symbol", symbol.as_str()),
                    ("interval", "60min"),
                    ("datatype", "csv"),
                ],
            );
            self.fetch_csv("TIME_SERIES_INTRADAY", url).await
        })
    }

    fn company_profile<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyInfoDto, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.query_url("OVERVIEW", &[("symbol", symbol.as_str())]);
            let body = self.fetch("OVERVIEW", HttpRequest::json(url)).await?;
            parse_overview(&body)
        })
    }
}

fn parse_overview(body: &[u8]) -> Result<CompanyInfoDto, TransportError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        TransportError::malformed(format!("failed to parse alphavantage overview: {e}"))
    })?;

    let Value::Object(object) = value else {
        return Err(TransportError::malformed(
            "alphavantage overview is not a json object",
        ));
    };

    if !object.contains_key("Symbol") {
        if let Some(notice) = notice_text(&object) {
            return Err(TransportError::error_payload(notice));
        }
    }

    serde_json::from_value(Value::Object(object)).map_err(|e| {
        TransportError::malformed(format!("unexpected alphavantage overview shape: {e}"))
    })
}

/// CSV endpoints answer throttling and bad requests with a JSON object.
fn reject_json_on_csv_endpoint(body: &[u8]) -> Result<(), TransportError> {
    let first = body.iter().find(|byte| !byte.is_ascii_whitespace());
    if first != Some(&b'{') {
        return Ok(());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Err(notice_text(&object).map_or_else(
            || TransportError::malformed("expected csv payload, received a json object"),
            TransportError::error_payload,
        )),
        _ => Err(TransportError::malformed(
            "expected csv payload, received unparsable json",
        )),
    }
}

fn notice_text(object: &Map<String, Value>) -> Option<String> {
    NOTICE_KEYS.iter().find_map(|key| {
        object.get(*key).map(|value| match value {
            Value::String(text) => format!("{key}: {text}"),
            other => format!("{key}: {other}"),
        })
    })
}

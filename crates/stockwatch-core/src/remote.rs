//! Remote source contract.
//!
//! The repository only ever sees raw snapshot bytes, raw intraday bytes and a
//! loosely typed company profile. Everything provider specific (URLs, keys,
//! payload quirks) lives behind [`StockApi`].
//!
//! | Call | Payload | Consumed by |
//! |------|---------|-------------|
//! | [`StockApi::listing_snapshot`] | CSV bytes | [`crate::csv::CompanyListingParser`] |
//! | [`StockApi::intraday_series`] | CSV bytes | [`crate::csv::IntradayInfoParser`] |
//! | [`StockApi::company_profile`] | [`CompanyInfoDto`] | [`CompanyInfo::from`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{CompanyInfo, Symbol};

/// Remote failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// No response at all (connect failure, timeout, body read failure).
    Unreachable,
    /// A response with a non-2xx status.
    Status,
    /// A 2xx response whose body is the provider's error or throttling notice.
    ErrorPayload,
    /// A 2xx response that could not be understood.
    Malformed,
}

/// Structured error returned by remote source calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Unreachable,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            kind: TransportErrorKind::Status,
            message: format!("remote returned status {status}"),
        }
    }

    pub fn error_payload(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::ErrorPayload,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Malformed,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            TransportErrorKind::Unreachable => "transport.unreachable",
            TransportErrorKind::Status => "transport.status",
            TransportErrorKind::ErrorPayload => "transport.error_payload",
            TransportErrorKind::Malformed => "transport.malformed",
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for TransportError {}

/// Company profile as the remote reports it; any field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfoDto {
    #[serde(rename = "Symbol", default)]
    pub symbol: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Industry", default)]
    pub industry: Option<String>,
}

impl From<CompanyInfoDto> for CompanyInfo {
    fn from(dto: CompanyInfoDto) -> Self {
        Self {
            symbol: dto.symbol.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
            country: dto.country.unwrap_or_default(),
            industry: dto.industry.unwrap_or_default(),
        }
    }
}

/// Remote market data source.
///
/// Implementations must be `Send + Sync`; the repository shares one instance
/// behind an `Arc` across concurrent per-symbol fetches.
pub trait StockApi: Send + Sync {
    /// Full listing snapshot as CSV (`symbol,name,exchange,...` with a header).
    fn listing_snapshot<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>>;

    /// Intraday series for `symbol` as CSV (`timestamp,open,high,low,close,volume`).
    fn intraday_series<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>>;

    /// Company profile for `symbol`.
    fn company_profile<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyInfoDto, TransportError>> + Send + 'a>>;
}

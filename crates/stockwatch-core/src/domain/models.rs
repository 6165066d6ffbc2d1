use serde::{Deserialize, Serialize};

use crate::MarketDateTime;

/// One tradable security from a listing snapshot.
///
/// Symbols are kept exactly as the snapshot spells them; duplicates are legal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyListing {
    pub name: String,
    pub symbol: String,
    pub exchange: String,
}

impl CompanyListing {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        exchange: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            exchange: exchange.into(),
        }
    }
}

/// Company profile. Fields absent from the remote payload are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub description: String,
    pub name: String,
    pub country: String,
    pub industry: String,
}

/// A single intraday price point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntradayInfo {
    pub date: MarketDateTime,
    pub close: f64,
}

impl IntradayInfo {
    pub const fn new(date: MarketDateTime, close: f64) -> Self {
        Self { date, close }
    }
}

//! Remote source implementations.

pub mod alphavantage;

pub use alphavantage::{AlphaVantageApi, ApiConfig};

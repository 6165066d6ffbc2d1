//! # Stockwatch Core
//!
//! Listing sync, CSV decoding and remote market data contracts for stockwatch.
//!
//! ## Overview
//!
//! - **Domain models** for company listings, company profiles and intraday prices
//! - **CSV decoder** that turns raw snapshot and series payloads into records
//! - **Remote source trait** with an Alpha Vantage implementation
//! - **Listing store trait** backed by the DuckDB warehouse or memory
//! - **Repository** that serves listings cache-first as a stream of [`Outcome`]s
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Remote source implementations (Alpha Vantage) |
//! | [`cache`] | In-memory listing store |
//! | [`csv`] | Streaming CSV decoder and record parsers |
//! | [`domain`] | Domain models |
//! | [`error`] | Validation and sync errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`outcome`] | Loading/Success/Error result container |
//! | [`remote`] | Remote source trait and transport errors |
//! | [`repository`] | Listing sync and per-symbol fetches |
//! | [`store`] | Listing store trait |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use futures::StreamExt;
//! use stockwatch_core::{AlphaVantageApi, Outcome, StockRepository, Warehouse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = StockRepository::new(
//!         Arc::new(AlphaVantageApi::from_env()),
//!         Arc::new(Warehouse::open_default()?),
//!     );
//!
//!     let mut outcomes = repository.sync_listings(false, "apple");
//!     while let Some(outcome) = outcomes.next().await {
//!         match outcome {
//!             Outcome::Loading { in_progress } => println!("loading: {in_progress}"),
//!             Outcome::Success { data } => println!("{} listings", data.len()),
//!             Outcome::Error { message, .. } => eprintln!("{message}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Security
//!
//! - The API key is read from the environment and never logged
//! - Logged URLs have their query string removed

pub mod adapters;
pub mod cache;
pub mod csv;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod outcome;
pub mod remote;
pub mod repository;
pub mod store;

pub use adapters::{AlphaVantageApi, ApiConfig};

pub use cache::MemoryListingStore;

pub use self::csv::{decode, CompanyListingParser, CsvParser, IntradayInfoParser, ParseError};

pub use domain::{CompanyInfo, CompanyListing, IntradayInfo, MarketDateTime, Symbol};

pub use error::{SyncError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, PayloadFormat, ReqwestHttpClient,
};

pub use outcome::Outcome;

pub use remote::{CompanyInfoDto, StockApi, TransportError, TransportErrorKind};

pub use repository::{
    ListingsOutcome, StockRepository, COMPANY_INFO_ERROR, INTRADAY_ERROR, LISTINGS_ERROR,
};

pub use store::{ListingStore, StoreError};

// Warehouse (re-exported from stockwatch-warehouse)
pub use stockwatch_warehouse::{
    IngestEntry, ListingRecord, ListingSyncReport, Warehouse, WarehouseConfig, WarehouseError,
};

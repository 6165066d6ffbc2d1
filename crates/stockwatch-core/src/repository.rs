//! Cache-first listing sync and direct per-symbol fetches.
//!
//! ## Listings
//!
//! [`StockRepository::sync_listings`] yields, in order:
//!
//! ```text
//! Loading(true)
//! Success(cached listings matching the query)      possibly empty
//! ── stop here with Loading(false) when the cache answered the query
//!    and no refresh was forced
//! Success(full snapshot after cache replacement)
//! Loading(false)
//! ```
//!
//! A failure reading the cache or refreshing it ends the stream with a single
//! `Error("Couldn't load data")` in place of the remaining items.
//!
//! ## Per-symbol data
//!
//! Intraday series and company profiles are fetched on every call and never
//! cached.

use std::io::Cursor;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use stockwatch_warehouse::ListingRecord;

use crate::csv::{CompanyListingParser, CsvParser, IntradayInfoParser};
use crate::remote::StockApi;
use crate::store::{ListingStore, StoreError};
use crate::{CompanyInfo, CompanyListing, IntradayInfo, Outcome, Symbol, SyncError};

pub const LISTINGS_ERROR: &str = "Couldn't load data";
pub const INTRADAY_ERROR: &str = "Couldn't load intraday info";
pub const COMPANY_INFO_ERROR: &str = "Couldn't load company info";

pub type ListingsOutcome = Outcome<Vec<CompanyListing>>;

/// Mediates between the listing cache and the remote source.
#[derive(Clone)]
pub struct StockRepository {
    api: Arc<dyn StockApi>,
    store: Arc<dyn ListingStore>,
    listing_parser: CompanyListingParser,
    intraday_parser: IntradayInfoParser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncStep {
    Begin,
    ReadCache,
    FetchRemote,
    Finish,
    Done,
}

struct SyncState {
    repository: StockRepository,
    force_remote: bool,
    query: String,
    step: SyncStep,
}

impl StockRepository {
    pub fn new(api: Arc<dyn StockApi>, store: Arc<dyn ListingStore>) -> Self {
        Self {
            api,
            store,
            listing_parser: CompanyListingParser,
            intraday_parser: IntradayInfoParser,
        }
    }

    /// Stream listing outcomes for `query`, refreshing from the remote when the
    /// cache is empty or `force_remote` is set.
    ///
    /// Nothing runs until the stream is polled. Dropping it early cancels any
    /// step not yet started.
    pub fn sync_listings(&self, force_remote: bool, query: &str) -> BoxStream<'static, ListingsOutcome> {
        let state = SyncState {
            repository: self.clone(),
            force_remote,
            query: query.trim().to_owned(),
            step: SyncStep::Begin,
        };

        stream::unfold(state, |mut state| async move {
            let outcome = match state.step {
                SyncStep::Begin => {
                    state.step = SyncStep::ReadCache;
                    Outcome::loading(true)
                }
                SyncStep::ReadCache => match state.repository.cached_listings(&state.query).await {
                    Ok(listings) => {
                        let cache_is_empty = listings.is_empty() && state.query.is_empty();
                        let use_cache_only = !cache_is_empty && !state.force_remote;
                        tracing::debug!(
                            query = %state.query,
                            cached = listings.len(),
                            force_remote = state.force_remote,
                            use_cache_only,
                            "read cached listings"
                        );
                        state.step = if use_cache_only {
                            SyncStep::Finish
                        } else {
                            SyncStep::FetchRemote
                        };
                        Outcome::success(listings)
                    }
                    Err(error) => {
                        state.step = SyncStep::Done;
                        flatten(&error, "sync_listings", LISTINGS_ERROR)
                    }
                },
                SyncStep::FetchRemote => match state.repository.refresh_listings().await {
                    Ok(listings) => {
                        state.step = SyncStep::Finish;
                        Outcome::success(listings)
                    }
                    Err(error) => {
                        state.step = SyncStep::Done;
                        flatten(&error, "sync_listings", LISTINGS_ERROR)
                    }
                },
                SyncStep::Finish => {
                    state.step = SyncStep::Done;
                    Outcome::loading(false)
                }
                SyncStep::Done => return None,
            };
            Some((outcome, state))
        })
        .boxed()
    }

    /// Intraday series for `symbol`, flattened to an [`Outcome`].
    pub async fn fetch_intraday(&self, symbol: &str) -> Outcome<Vec<IntradayInfo>> {
        match self.try_fetch_intraday(symbol).await {
            Ok(points) => Outcome::success(points),
            Err(error) => flatten(&error, "fetch_intraday", INTRADAY_ERROR),
        }
    }

    /// Company profile for `symbol`, flattened to an [`Outcome`].
    pub async fn fetch_company_info(&self, symbol: &str) -> Outcome<CompanyInfo> {
        match self.try_fetch_company_info(symbol).await {
            Ok(info) => Outcome::success(info),
            Err(error) => flatten(&error, "fetch_company_info", COMPANY_INFO_ERROR),
        }
    }

    pub async fn try_fetch_intraday(&self, symbol: &str) -> Result<Vec<IntradayInfo>, SyncError> {
        let symbol = Symbol::parse(symbol)?;
        let body = self.api.intraday_series(&symbol).await?;
        Ok(self.intraday_parser.parse(Cursor::new(body))?)
    }

    pub async fn try_fetch_company_info(&self, symbol: &str) -> Result<CompanyInfo, SyncError> {
        let symbol = Symbol::parse(symbol)?;
        let dto = self.api.company_profile(&symbol).await?;
        Ok(CompanyInfo::from(dto))
    }

    async fn cached_listings(&self, query: &str) -> Result<Vec<CompanyListing>, SyncError> {
        let query = query.to_owned();
        let records = self
            .with_store(move |store| store.query_listings(&query))
            .await?;
        Ok(records.into_iter().map(CompanyListing::from).collect())
    }

    async fn refresh_listings(&self) -> Result<Vec<CompanyListing>, SyncError> {
        let body = self.api.listing_snapshot().await?;
        let listings = self.listing_parser.parse(Cursor::new(body))?;

        let records: Vec<ListingRecord> = listings.into_iter().map(ListingRecord::from).collect();
        let rows = records.len();
        self.with_store(move |store| store.replace_all_listings(&records))
            .await?;
        tracing::info!(rows, "refreshed listing cache from remote snapshot");

        self.cached_listings("").await
    }

    /// Run a store call on the blocking pool; stores do synchronous I/O.
    async fn with_store<T, F>(&self, work: F) -> Result<T, SyncError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ListingStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || work(store.as_ref()))
            .await
            .map_err(StoreError::from)?;
        Ok(result?)
    }
}

fn flatten<T>(error: &SyncError, operation: &'static str, message: &str) -> Outcome<T> {
    tracing::warn!(operation, code = error.code(), error = %error, "{message}");
    Outcome::error(message)
}

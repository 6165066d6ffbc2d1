//! Listing cache boundary.

use stockwatch_warehouse::{ListingRecord, Warehouse, WarehouseError};
use thiserror::Error;

use crate::CompanyListing;

/// Cache read or write failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error("listing store lock poisoned")]
    Poisoned,

    #[error("listing store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Persistent listing cache consumed by the repository.
///
/// `replace_all_listings` must be atomic: a concurrent reader sees either the
/// previous snapshot or the new one, never a mix or an empty table in between.
pub trait ListingStore: Send + Sync {
    /// Listings whose name or symbol contains `filter`, ignoring case, in
    /// snapshot order. An empty filter returns everything.
    fn query_listings(&self, filter: &str) -> Result<Vec<ListingRecord>, StoreError>;

    /// Discard every cached listing and store `records` in their place.
    fn replace_all_listings(&self, records: &[ListingRecord]) -> Result<(), StoreError>;
}

impl ListingStore for Warehouse {
    fn query_listings(&self, filter: &str) -> Result<Vec<ListingRecord>, StoreError> {
        Ok(Warehouse::query_listings(self, filter)?)
    }

    fn replace_all_listings(&self, records: &[ListingRecord]) -> Result<(), StoreError> {
        Warehouse::replace_all_listings(self, records)?;
        Ok(())
    }
}

impl From<ListingRecord> for CompanyListing {
    fn from(record: ListingRecord) -> Self {
        Self {
            name: record.name,
            symbol: record.symbol,
            exchange: record.exchange,
        }
    }
}

impl From<CompanyListing> for ListingRecord {
    fn from(listing: CompanyListing) -> Self {
        Self {
            symbol: listing.symbol,
            name: listing.name,
            exchange: listing.exchange,
        }
    }
}

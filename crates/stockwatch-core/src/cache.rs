//! In-process listing cache.

use std::sync::RwLock;

use stockwatch_warehouse::ListingRecord;

use crate::store::{ListingStore, StoreError};

/// Thread-safe in-memory [`ListingStore`] with the same matching rules as the
/// warehouse: case-insensitive substring on name or symbol, snapshot order.
#[derive(Debug, Default)]
pub struct MemoryListingStore {
    records: RwLock<Vec<ListingRecord>>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listings(records: Vec<ListingRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Copy of the full cached snapshot.
    pub fn snapshot(&self) -> Result<Vec<ListingRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.clone())
    }
}

impl ListingStore for MemoryListingStore {
    fn query_listings(&self, filter: &str) -> Result<Vec<ListingRecord>, StoreError> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        let needle = filter.to_lowercase();
        Ok(records
            .iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record.symbol.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    fn replace_all_listings(&self, records: &[ListingRecord]) -> Result<(), StoreError> {
        let mut stored = self.records.write().map_err(|_| StoreError::Poisoned)?;
        *stored = records.to_vec();
        Ok(())
    }
}

//! # Stockwatch Warehouse
//!
//! DuckDB-based storage for the company listing cache.
//!
//! ## Overview
//!
//! The warehouse keeps the last full listing snapshot fetched from the remote
//! source. It supports exactly two data operations:
//!
//! - **Substring query**: case-insensitive match on listing name or symbol,
//!   ordered by snapshot position. An empty filter returns every row.
//! - **Full replace**: delete every cached listing and insert a new snapshot
//!   inside one transaction, so readers never see a half-replaced table.
//!
//! Every replace is recorded in `ingest_log` under a fresh request id.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockwatch_warehouse::{ListingRecord, Warehouse};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open_default()?;
//!
//!     warehouse.replace_all_listings(&[ListingRecord {
//!         symbol: "AAPL".to_string(),
//!         name: "Apple Inc".to_string(),
//!         exchange: "NASDAQ".to_string(),
//!     }])?;
//!
//!     let matches = warehouse.query_listings("apple")?;
//!     println!("Found {} listings", matches.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `company_listings` | Cached listing snapshot |
//! | `ingest_log` | Snapshot replacement audit log |
//! | `schema_migrations` | Applied migration versions |

pub mod duckdb;
pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::{params, Connection};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use self::duckdb::{DuckDbConnectionManager, PooledConnection};

const LISTINGS_DATASET: &str = "company_listings";

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the connection pool lock.
    #[error("connection pool lock poisoned")]
    PoolPoisoned,
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept in the pool.
    pub max_pool_size: usize,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            db_path: resolve_stockwatch_home().join("cache").join("warehouse.duckdb"),
            max_pool_size: 4,
        }
    }
}

/// Persisted form of a company listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListingRecord {
    /// Ticker symbol as delivered by the remote snapshot.
    pub symbol: String,
    /// Company name.
    pub name: String,
    /// Listing exchange.
    pub exchange: String,
}

/// Report from a full listing replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingSyncReport {
    /// Request id recorded in `ingest_log`.
    pub request_id: String,
    /// Number of listings written.
    pub row_count: usize,
}

/// One `ingest_log` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestEntry {
    pub request_id: String,
    pub dataset: String,
    pub status: String,
    pub row_count: i64,
    pub timestamp: String,
}

/// The main warehouse interface for the listing cache.
#[derive(Clone)]
pub struct Warehouse {
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open a warehouse with the specified configuration.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::open(config.db_path, config.max_pool_size)?;
        let warehouse = Self { manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Open a throwaway warehouse that lives only as long as this handle.
    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        let manager = DuckDbConnectionManager::open_in_memory(2)?;
        let warehouse = Self { manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Initialize database schema.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file (`None` when in memory).
    pub fn db_path(&self) -> Option<&Path> {
        self.manager.db_path()
    }

    /// Query cached listings whose name or symbol contains `filter`,
    /// ignoring case. An empty filter returns every cached listing.
    ///
    /// # Security
    /// The filter is passed as a query parameter, never interpolated.
    pub fn query_listings(&self, filter: &str) -> Result<Vec<ListingRecord>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(
            "SELECT symbol, name, exchange FROM company_listings \
             WHERE contains(lower(name), lower(?)) OR contains(lower(symbol), lower(?)) \
             ORDER BY position",
        )?;

        let rows = statement.query_map(params![filter, filter], |row| {
            Ok(ListingRecord {
                symbol: row.get(0)?,
                name: row.get(1)?,
                exchange: row.get(2)?,
            })
        })?;

        let mut listings = Vec::new();
        for row in rows {
            listings.push(row?);
        }
        Ok(listings)
    }

    /// Replace the whole listing cache with `records`.
    ///
    /// The delete, the inserts and the audit row commit together or not at
    /// all.
    pub fn replace_all_listings(
        &self,
        records: &[ListingRecord],
    ) -> Result<ListingSyncReport, WarehouseError> {
        let request_id = Uuid::new_v4().to_string();
        let row_count = i64::try_from(records.len()).unwrap_or(i64::MAX);

        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), WarehouseError> {
            connection.execute("DELETE FROM company_listings", [])?;

            let mut insert = connection.prepare(
                "INSERT INTO company_listings (position, symbol, name, exchange, updated_at) \
                 VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
            )?;
            for (position, record) in (0_i64..).zip(records) {
                insert.execute(params![position, record.symbol, record.name, record.exchange])?;
            }

            connection.execute(
                "INSERT INTO ingest_log (request_id, dataset, status, row_count, timestamp) \
                 VALUES (?, ?, 'ok', ?, CURRENT_TIMESTAMP)",
                params![request_id, LISTINGS_DATASET, row_count],
            )?;
            Ok(())
        })();

        finalize_transaction(&connection, result)?;
        tracing::info!(%request_id, rows = records.len(), "replaced cached company listings");

        Ok(ListingSyncReport {
            request_id,
            row_count: records.len(),
        })
    }

    /// Number of cached listings.
    pub fn listing_count(&self) -> Result<usize, WarehouseError> {
        let connection = self.manager.acquire()?;
        let count: i64 =
            connection.query_row("SELECT COUNT(*) FROM company_listings", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// The most recent successful listing replacement, if any.
    pub fn last_listing_sync(&self) -> Result<Option<IngestEntry>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(
            "SELECT request_id, dataset, status, row_count, CAST(timestamp AS VARCHAR) \
             FROM ingest_log WHERE dataset = ? ORDER BY timestamp DESC, rowid DESC LIMIT 1",
        )?;
        let mut rows = statement.query(params![LISTINGS_DATASET])?;

        match rows.next()? {
            Some(row) => Ok(Some(IngestEntry {
                request_id: row.get(0)?,
                dataset: row.get(1)?,
                status: row.get(2)?,
                row_count: row.get(3)?,
                timestamp: row.get(4)?,
            })),
            None => Ok(None),
        }
    }
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

/// Resolve the stockwatch home directory from environment or default.
fn resolve_stockwatch_home() -> PathBuf {
    if let Some(path) = env::var_os("STOCKWATCH_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".stockwatch");
    }

    PathBuf::from(".stockwatch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn listing(symbol: &str, name: &str, exchange: &str) -> ListingRecord {
        ListingRecord {
            symbol: symbol.to_string(),
            name: name.to_string(),
            exchange: exchange.to_string(),
        }
    }

    #[test]
    fn initializes_listing_tables_on_disk() {
        let temp = tempdir().expect("tempdir");
        let stockwatch_home = temp.path().join("stockwatch-home");
        let db_path = stockwatch_home.join("cache").join("warehouse.duckdb");

        let warehouse = Warehouse::open(WarehouseConfig {
            db_path: db_path.clone(),
            max_pool_size: 2,
        })
        .expect("warehouse open");

        assert!(db_path.exists());
        assert_eq!(warehouse.db_path(), Some(db_path.as_path()));
        assert_eq!(warehouse.listing_count().expect("count"), 0);
        assert!(warehouse.last_listing_sync().expect("log").is_none());
    }

    #[test]
    fn query_matches_name_or_symbol_ignoring_case() {
        let warehouse = Warehouse::open_in_memory().expect("warehouse");
        warehouse
            .replace_all_listings(&[
                listing("AAPL", "Apple Inc", "NASDAQ"),
                listing("MSFT", "Microsoft Corporation", "NASDAQ"),
                listing("PINE", "Alpine Income Property Trust", "NYSE"),
            ])
            .expect("replace");

        let by_name = warehouse.query_listings("aPPle").expect("query");
        assert_eq!(by_name, vec![listing("AAPL", "Apple Inc", "NASDAQ")]);

        let by_symbol = warehouse.query_listings("msf").expect("query");
        assert_eq!(by_symbol.len(), 1);
        assert_eq!(by_symbol[0].symbol, "MSFT");

        let substring = warehouse.query_listings("pin").expect("query");
        assert_eq!(substring.len(), 1);
        assert_eq!(substring[0].symbol, "PINE");
    }

    #[test]
    fn filter_wildcards_are_matched_literally() {
        let warehouse = Warehouse::open_in_memory().expect("warehouse");
        warehouse
            .replace_all_listings(&[listing("AAPL", "Apple Inc", "NASDAQ")])
            .expect("replace");

        assert!(warehouse.query_listings("%").expect("query").is_empty());
        assert!(warehouse.query_listings("'; DROP TABLE company_listings; --").expect("query").is_empty());
        assert_eq!(warehouse.listing_count().expect("count"), 1);
    }

    #[test]
    fn replace_discards_previous_snapshot_and_keeps_order() {
        let warehouse = Warehouse::open_in_memory().expect("warehouse");
        warehouse
            .replace_all_listings(&[listing("OLD", "Old Co", "NYSE")])
            .expect("first replace");

        let report = warehouse
            .replace_all_listings(&[
                listing("ZZZ", "Last Alphabetically", "NYSE"),
                listing("AAA", "First Alphabetically", "NYSE"),
            ])
            .expect("second replace");
        assert_eq!(report.row_count, 2);

        let all = warehouse.query_listings("").expect("query");
        let symbols = all.iter().map(|row| row.symbol.as_str()).collect::<Vec<_>>();
        assert_eq!(symbols, vec!["ZZZ", "AAA"]);

        let entry = warehouse
            .last_listing_sync()
            .expect("log")
            .expect("entry recorded");
        assert_eq!(entry.dataset, "company_listings");
        assert_eq!(entry.row_count, 2);
    }

    #[test]
    fn duplicate_symbols_are_preserved() {
        let warehouse = Warehouse::open_in_memory().expect("warehouse");
        warehouse
            .replace_all_listings(&[
                listing("DUP", "Duplicate One", "NYSE"),
                listing("DUP", "Duplicate Two", "NASDAQ"),
            ])
            .expect("replace");

        assert_eq!(warehouse.listing_count().expect("count"), 2);
    }
}

//! Streaming CSV decoding for remote listing and intraday payloads.
//!
//! Payloads are split on `\n` and each physical line is decoded on its own, so
//! a stray quote can only ever cost the line it appears on. The first line is
//! always treated as a header and discarded. Every other line is handed to a
//! field mapper; lines the mapper rejects, and lines that are not valid UTF-8,
//! are dropped. Only a failure to read the underlying stream aborts decoding.

use std::io::{self, BufRead, BufReader, Read};

use ::csv::{ByteRecord, ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::{CompanyListing, IntradayInfo, MarketDateTime};

/// The byte stream could not be read to the end.
#[derive(Debug, Error)]
#[error("failed to read csv stream at line {line}: {source}")]
pub struct ParseError {
    line: u64,
    #[source]
    source: io::Error,
}

/// Decode `reader` into records, one `map_fields` call per data line.
///
/// Fields are passed untrimmed and in column order. The reader is consumed and
/// dropped before this function returns, whether decoding succeeds or not.
pub fn decode<R, T, F>(reader: R, mut map_fields: F) -> Result<Vec<T>, ParseError>
where
    R: Read,
    F: FnMut(&[&str]) -> Option<T>,
{
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true);

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    let mut byte_record = ByteRecord::new();

    for (index, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let mut line = line.map_err(|source| ParseError {
            line: index as u64 + 1,
            source,
        })?;

        if index == 0 {
            continue;
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            continue;
        }

        let decoded = builder
            .from_reader(line.as_slice())
            .read_byte_record(&mut byte_record);
        let record = match decoded {
            Ok(true) => StringRecord::from_byte_record(byte_record.clone()).ok(),
            Ok(false) | Err(_) => None,
        };
        let Some(record) = record else {
            skipped += 1;
            continue;
        };

        let fields: Vec<&str> = record.iter().collect();
        match map_fields(&fields) {
            Some(value) => records.push(value),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(decoded = records.len(), skipped, "dropped malformed csv lines");
    }

    Ok(records)
}

/// Field mapping for one record shape.
pub trait CsvParser {
    type Record;

    /// Map one line's fields to a record, or `None` to drop the line.
    fn parse_fields(&self, fields: &[&str]) -> Option<Self::Record>;

    fn parse<R: Read>(&self, reader: R) -> Result<Vec<Self::Record>, ParseError>
    where
        Self: Sized,
    {
        decode(reader, |fields| self.parse_fields(fields))
    }
}

/// `symbol,name,exchange,...` rows from the listing snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyListingParser;

impl CsvParser for CompanyListingParser {
    type Record = CompanyListing;

    fn parse_fields(&self, fields: &[&str]) -> Option<Self::Record> {
        let symbol = fields.first()?;
        let name = fields.get(1)?;
        let exchange = fields.get(2)?;
        Some(CompanyListing::new(*name, *symbol, *exchange))
    }
}

/// `timestamp,open,high,low,close,volume` rows from an intraday series.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntradayInfoParser;

impl CsvParser for IntradayInfoParser {
    type Record = IntradayInfo;

    fn parse_fields(&self, fields: &[&str]) -> Option<Self::Record> {
        let date = MarketDateTime::parse(fields.first()?).ok()?;
        let close = fields.get(4)?.parse::<f64>().ok()?;
        if !close.is_finite() {
            return None;
        }
        Some(IntradayInfo::new(date, close))
    }
}

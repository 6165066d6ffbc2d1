use std::io::Write;

use futures::StreamExt;
use serde_json::{json, Value};
use stockwatch_core::{IngestEntry, Outcome, WarehouseError};

use crate::cli::ListingsArgs;
use crate::error::CliError;
use crate::output::stream_writer::{NdjsonStreamWriter, StreamEventError};

use super::{CommandStatus, Context};

const LISTINGS_UNAVAILABLE: &str = "listings.unavailable";

pub async fn run<W: Write>(
    args: &ListingsArgs,
    context: &Context,
    out: &mut W,
) -> Result<CommandStatus, CliError> {
    let mut writer = NdjsonStreamWriter::new(out);
    let mut status = CommandStatus::default();
    let mut outcomes = context.repository.sync_listings(args.refresh, &args.query);

    while let Some(outcome) = outcomes.next().await {
        match outcome {
            Outcome::Loading { in_progress: true } => writer.emit_start(Some(json!({
                "in_progress": true,
                "query": args.query.trim(),
                "refresh": args.refresh,
            })))?,
            Outcome::Loading { in_progress: false } => {
                let summary = cache_summary(
                    context.warehouse.listing_count(),
                    context.warehouse.last_listing_sync(),
                );
                writer.emit_end(Some(summary))?;
            }
            Outcome::Success { data } => writer.emit_chunk(Some(json!({
                "count": data.len(),
                "listings": data,
            })))?,
            Outcome::Error { message, data } => {
                status.saw_error = true;
                writer.emit_error(
                    StreamEventError::new(LISTINGS_UNAVAILABLE, message),
                    data.map(|listings| json!({ "listings": listings })),
                )?;
            }
        }
    }

    Ok(status)
}

/// Closing payload for a finished sync. The sync already succeeded, so a
/// warehouse that cannot answer only blanks the affected field.
fn cache_summary(
    cached_listings: Result<usize, WarehouseError>,
    last_sync: Result<Option<IngestEntry>, WarehouseError>,
) -> Value {
    let cached_listings = cached_listings
        .inspect_err(|error| tracing::warn!(error = %error, "could not count cached listings"))
        .ok();
    let last_sync = last_sync
        .inspect_err(|error| tracing::warn!(error = %error, "could not read listing sync log"))
        .ok()
        .flatten();

    json!({
        "in_progress": false,
        "cached_listings": cached_listings,
        "last_sync": last_sync,
    })
}

pub mod stream_writer;

use std::io::Write;

use serde::Serialize;

use crate::error::CliError;

/// Write `value` as a single JSON document followed by a newline.
pub fn render_json<W: Write, T: Serialize>(
    out: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}

use std::io::Write;

use stockwatch_core::Symbol;

use crate::cli::SymbolArgs;
use crate::error::CliError;
use crate::output::render_json;

use super::{CommandStatus, Context};

pub async fn run<W: Write>(
    args: &SymbolArgs,
    context: &Context,
    out: &mut W,
    pretty: bool,
) -> Result<CommandStatus, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let outcome = context.repository.fetch_intraday(symbol.as_str()).await;

    render_json(out, &outcome, pretty)?;
    Ok(CommandStatus::from_outcome(&outcome))
}

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
    let outcome = context.repository.fetch_company_info(symbol.as_str()).await;

    render_json(out, &outcome, pretty)?;
    Ok(CommandStatus::from_outcome(&outcome))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;
    use stockwatch_core::Warehouse;

    use super::*;
    use crate::commands::fakes::FixedApi;

    #[tokio::test]
    async fn remote_failure_prints_error_outcome_and_flags_status() {
        let context = Context::new(
            Arc::new(FixedApi::offline()),
            Warehouse::open_in_memory().expect("warehouse"),
        );
        let mut sink = Vec::new();
        let args = SymbolArgs {
            symbol: String::from("IBM"),
        };

        let status = run(&args, &context, &mut sink, true).await.expect("run");

        let printed: Value = serde_json::from_slice(&sink).expect("json");
        assert_eq!(printed["status"], "error");
        assert_eq!(printed["message"], "Couldn't load company info");
        assert!(printed["data"].is_null());
        assert!(status.saw_error);
    }
}

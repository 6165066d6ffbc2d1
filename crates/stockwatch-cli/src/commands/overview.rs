use std::io::Write;

use serde::Serialize;
use stockwatch_core::{CompanyInfo, IntradayInfo, Outcome, Symbol};

use crate::cli::SymbolArgs;
use crate::error::CliError;
use crate::output::render_json;

use super::{CommandStatus, Context};

/// Company screen: profile and intraday series fetched side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewState {
    pub symbol: String,
    pub company: Option<CompanyInfo>,
    pub intraday: Vec<IntradayInfo>,
    pub errors: Vec<String>,
    pub is_loading: bool,
}

impl OverviewState {
    fn loading(symbol: &Symbol) -> Self {
        Self {
            symbol: symbol.to_string(),
            company: None,
            intraday: Vec::new(),
            errors: Vec::new(),
            is_loading: true,
        }
    }

    /// Fold both outcomes in; a failure on one side keeps the other's data.
    fn merge(mut self, company: Outcome<CompanyInfo>, intraday: Outcome<Vec<IntradayInfo>>) -> Self {
        match company {
            Outcome::Loading { .. } => {}
            Outcome::Success { data } => self.company = Some(data),
            Outcome::Error { message, data } => {
                self.company = data;
                self.errors.push(message);
            }
        }

        match intraday {
            Outcome::Loading { .. } => {}
            Outcome::Success { data } => self.intraday = data,
            Outcome::Error { message, data } => {
                self.intraday = data.unwrap_or_default();
                self.errors.push(message);
            }
        }

        self.is_loading = false;
        self
    }
}

pub async fn run<W: Write>(
    args: &SymbolArgs,
    context: &Context,
    out: &mut W,
    pretty: bool,
) -> Result<CommandStatus, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let repository = &context.repository;

    let (company, intraday) = tokio::join!(
        repository.fetch_company_info(symbol.as_str()),
        repository.fetch_intraday(symbol.as_str()),
    );

    let state = OverviewState::loading(&symbol).merge(company, intraday);
    render_json(out, &state, pretty)?;

    Ok(CommandStatus {
        saw_error: !state.errors.is_empty(),
    })
}

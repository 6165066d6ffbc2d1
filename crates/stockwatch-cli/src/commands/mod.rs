mod company;
mod intraday;
mod listings;
mod overview;

use std::io::Write;
use std::sync::Arc;

use stockwatch_core::{
    AlphaVantageApi, ApiConfig, Outcome, ReqwestHttpClient, StockApi, StockRepository, Warehouse,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Long-lived handles shared by every command.
pub struct Context {
    pub repository: StockRepository,
    pub warehouse: Warehouse,
}

impl Context {
    pub fn new(api: Arc<dyn StockApi>, warehouse: Warehouse) -> Self {
        Self {
            repository: StockRepository::new(api, Arc::new(warehouse.clone())),
            warehouse,
        }
    }

    /// Alpha Vantage over reqwest plus the warehouse under `STOCKWATCH_HOME`.
    pub fn from_env(timeout_ms: u64) -> Result<Self, CliError> {
        if timeout_ms == 0 {
            return Err(CliError::Configuration(String::from(
                "--timeout-ms must be greater than zero",
            )));
        }

        let config = ApiConfig::from_env().with_timeout_ms(timeout_ms);
        tracing::debug!(?config, "resolved alphavantage configuration");
        let api = AlphaVantageApi::new(Arc::new(ReqwestHttpClient::new()), config);
        let warehouse = Warehouse::open_default()?;
        Ok(Self::new(Arc::new(api), warehouse))
    }
}

/// What the process exit code needs to know about a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandStatus {
    pub saw_error: bool,
}

impl CommandStatus {
    pub fn from_outcome<T>(outcome: &Outcome<T>) -> Self {
        Self {
            saw_error: outcome.is_error(),
        }
    }
}

pub async fn run<W: Write>(
    cli: &Cli,
    context: &Context,
    out: &mut W,
) -> Result<CommandStatus, CliError> {
    match &cli.command {
        Command::Listings(args) => listings::run(args, context, out).await,
        Command::Intraday(args) => intraday::run(args, context, out, cli.pretty).await,
        Command::Company(args) => company::run(args, context, out, cli.pretty).await,
        Command::Overview(args) => overview::run(args, context, out, cli.pretty).await,
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use stockwatch_core::{CompanyInfoDto, StockApi, Symbol, TransportError};

    /// Remote source answering from fixed payloads.
    pub struct FixedApi {
        pub snapshot: Result<Vec<u8>, TransportError>,
        pub intraday: Result<Vec<u8>, TransportError>,
        pub profile: Result<CompanyInfoDto, TransportError>,
        pub calls: AtomicUsize,
    }

    impl FixedApi {
        pub fn offline() -> Self {
            let down = || TransportError::unreachable("offline");
            Self {
                snapshot: Err(down()),
                intraday: Err(down()),
                profile: Err(down()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StockApi for FixedApi {
        fn listing_snapshot<'a>(
            &'a self,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let snapshot = self.snapshot.clone();
            Box::pin(async move { snapshot })
        }

        fn intraday_series<'a>(
            &'a self,
            _symbol: &'a Symbol,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let intraday = self.intraday.clone();
            Box::pin(async move { intraday })
        }

        fn company_profile<'a>(
            &'a self,
            _symbol: &'a Symbol,
        ) -> Pin<Box<dyn Future<Output = Result<CompanyInfoDto, TransportError>> + Send + 'a>>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let profile = self.profile.clone();
            Box::pin(async move { profile })
        }
    }
}

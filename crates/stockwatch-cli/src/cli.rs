//! CLI argument definitions for stockwatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `listings` | Stream cached (and, when needed, refreshed) company listings |
//! | `intraday` | Fetch the hourly intraday series for a symbol |
//! | `company` | Fetch the company profile for a symbol |
//! | `overview` | Fetch profile and intraday series concurrently |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `5000` | Request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! # Search the local listing cache, fetching a snapshot only if it is empty
//! stockwatch listings apple
//!
//! # Force a fresh snapshot
//! stockwatch listings --refresh
//!
//! # Company screen
//! stockwatch overview IBM --pretty
//! ```

use clap::{Args, Parser, Subcommand};

/// stockwatch - company listings, profiles and intraday prices
///
/// Listings are served from a local DuckDB cache and refreshed from
/// Alpha Vantage when the cache is empty or a refresh is requested.
#[derive(Debug, Parser)]
#[command(
    name = "stockwatch",
    author,
    version,
    about = "Company listings, profiles and intraday prices",
    long_about = "stockwatch keeps a local cache of exchange listings and fetches per-symbol \
data from Alpha Vantage.\n\
\n\
Environment:\n\
  STOCKWATCH_ALPHAVANTAGE_API_KEY   API key (default: demo)\n\
  STOCKWATCH_ALPHAVANTAGE_BASE_URL  API base URL\n\
  STOCKWATCH_HOME                   data directory (default: ~/.stockwatch)\n\
  STOCKWATCH_LOG                    log filter (default: warn)"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 5000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream listing outcomes as NDJSON events.
    Listings(ListingsArgs),
    /// Fetch the hourly intraday series for a symbol.
    Intraday(SymbolArgs),
    /// Fetch the company profile for a symbol.
    Company(SymbolArgs),
    /// Fetch profile and intraday series concurrently and merge them.
    Overview(SymbolArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ListingsArgs {
    /// Case-insensitive substring of the company name or symbol.
    #[arg(default_value = "")]
    pub query: String,

    /// Fetch a fresh snapshot even when the cache can answer the query.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SymbolArgs {
    /// Ticker symbol, e.g. AAPL.
    pub symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_defaults_to_empty_query_without_refresh() {
        let cli = Cli::try_parse_from(["stockwatch", "listings"]).expect("parse");
        match cli.command {
            Command::Listings(args) => {
                assert_eq!(args.query, "");
                assert!(!args.refresh);
            }
            Command::Intraday(_) | Command::Company(_) | Command::Overview(_) => {
                panic!("expected listings command")
            }
        }
        assert_eq!(cli.timeout_ms, 5000);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["stockwatch", "overview", "IBM", "--pretty", "--timeout-ms", "250"])
            .expect("parse");
        assert!(cli.pretty);
        assert_eq!(cli.timeout_ms, 250);
        assert!(matches!(cli.command, Command::Overview(SymbolArgs { ref symbol }) if symbol == "IBM"));
    }

    #[test]
    fn symbol_commands_require_a_symbol() {
        assert!(Cli::try_parse_from(["stockwatch", "company"]).is_err());
    }
}

//! # Domain Models
//!
//! Value types shared by the decoder, the remote source and the repository.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CompanyListing`] | Name, symbol and exchange of one tradable security |
//! | [`CompanyInfo`] | Company profile with empty-string defaults |
//! | [`IntradayInfo`] | Timestamped close price |
//! | [`Symbol`] | Validated ticker for per-symbol requests |
//! | [`MarketDateTime`] | Exchange-local timestamp without offset |

mod models;
mod symbol;
mod timestamp;

pub use models::{CompanyInfo, CompanyListing, IntradayInfo};
pub use symbol::Symbol;
pub use timestamp::MarketDateTime;

use thiserror::Error;

use crate::csv::ParseError;
use crate::remote::TransportError;
use crate::store::StoreError;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must match YYYY-MM-DD HH:MM:SS: '{value}'")]
    InvalidTimestamp { value: String },
}

impl ValidationError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptySymbol
            | Self::SymbolTooLong { .. }
            | Self::SymbolInvalidStart { .. }
            | Self::SymbolInvalidChar { .. } => "validation.symbol",
            Self::InvalidTimestamp { .. } => "validation.timestamp",
        }
    }
}

/// Failure taxonomy for a single repository operation.
///
/// The repository logs these and flattens them to a fixed user-facing message
/// inside [`crate::Outcome::Error`]; the `try_*` entry points return them as is.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl SyncError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(error) => error.code(),
            Self::Decode(_) => "decode.io",
            Self::Store(_) => "store.failure",
            Self::Validation(error) => error.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_error_code_follows_wrapped_error() {
        let error = SyncError::from(TransportError::status(503));
        assert_eq!(error.code(), "transport.status");

        let error = SyncError::from(ValidationError::EmptySymbol);
        assert_eq!(error.code(), "validation.symbol");
    }
}

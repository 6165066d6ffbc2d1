use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] stockwatch_core::ValidationError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("listing cache unavailable: {0}")]
    Store(#[from] stockwatch_core::WarehouseError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Configuration(_) => 2,
            Self::Store(_) => 10,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

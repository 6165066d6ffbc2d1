use serde::{Deserialize, Serialize};

/// Progress or result of a repository operation.
///
/// `Loading` toggles a busy indicator, `Success` carries data and `Error`
/// carries a user-facing message plus, optionally, the last data known good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Loading { in_progress: bool },
    Success { data: T },
    Error { message: String, data: Option<T> },
}

impl<T> Outcome<T> {
    pub const fn loading(in_progress: bool) -> Self {
        Self::Loading { in_progress }
    }

    pub const fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            data: None,
        }
    }

    pub const fn is_error(&self) -> bool {
        match self {
            Self::Error { .. } => true,
            Self::Loading { .. } | Self::Success { .. } => false,
        }
    }

    /// Data carried by `Success`, or by `Error` when it kept a last-known value.
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Error { data, .. } => data.as_ref(),
            Self::Loading { .. } => None,
        }
    }
}

use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use crate::ValidationError;

const MARKET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Exchange-local timestamp as emitted by intraday series (`2024-01-05 15:00:00`).
///
/// There is no offset: the value is whatever wall-clock time the remote reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketDateTime(PrimitiveDateTime);

impl MarketDateTime {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        PrimitiveDateTime::parse(input, MARKET_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            })
    }

    pub const fn from_primitive(value: PrimitiveDateTime) -> Self {
        Self(value)
    }

    pub const fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }

    pub fn format_market(self) -> String {
        // Every field in the description is numeric, so formatting a valid
        // PrimitiveDateTime cannot fail.
        self.0
            .format(MARKET_FORMAT)
            .unwrap_or_else(|_| self.0.to_string())
    }
}

impl Display for MarketDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_market())
    }
}

impl Serialize for MarketDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_market())
    }
}

impl<'de> Deserialize<'de> for MarketDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

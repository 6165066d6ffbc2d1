use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest ticker Alpha Vantage accepts in a `symbol=` parameter.
const MAX_SYMBOL_LEN: usize = 15;

/// Validated, upper-cased ticker used for per-symbol requests.
///
/// Only ASCII letters, digits, `.` and `-` are allowed, starting with a letter,
/// so a symbol can never smuggle extra query parameters into a request URL.
/// Listing symbols coming from a snapshot are kept as verbatim strings and
/// never pass through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Trim, upper-case and validate a ticker such as `brk.b` or ` aapl `.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim();
        if ticker.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let len = ticker.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        ticker
            .chars()
            .enumerate()
            .map(|(index, ch)| check_ticker_char(index, ch.to_ascii_uppercase()))
            .collect::<Result<String, _>>()
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_ticker_char(index: usize, ch: char) -> Result<char, ValidationError> {
    match (index, ch) {
        (_, 'A'..='Z') => Ok(ch),
        (0, _) => Err(ValidationError::SymbolInvalidStart { ch }),
        (_, '0'..='9' | '.' | '-') => Ok(ch),
        (index, _) => Err(ValidationError::SymbolInvalidChar { ch, index }),
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_uppercases_ticker() {
        let parsed = Symbol::parse(" brk.b ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "BRK.B");
        assert_eq!(parsed.to_string(), "BRK.B");
    }

    #[test]
    fn rejects_blank_ticker() {
        let err = Symbol::parse("   ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn rejects_overlong_ticker() {
        let err = Symbol::parse("ABCDEFGHIJKLMNOP").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolTooLong { len: 16, max: 15 });
    }

    #[test]
    fn deserializes_through_validation() {
        let parsed: Symbol = serde_json::from_str("\"msft\"").expect("symbol json");
        assert_eq!(parsed.as_str(), "MSFT");
        assert!(serde_json::from_str::<Symbol>("\"9X\"").is_err());
    }

    #[test]
    fn rejects_leading_digit_or_punctuation() {
        assert_eq!(
            Symbol::parse("1AAPL").expect_err("must fail"),
            ValidationError::SymbolInvalidStart { ch: '1' }
        );
        assert_eq!(
            Symbol::parse(".B").expect_err("must fail"),
            ValidationError::SymbolInvalidStart { ch: '.' }
        );
    }

    #[test]
    fn rejects_url_metacharacters() {
        let err = "AAPL&apikey".parse::<Symbol>().expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: '&', index: 4 });
    }

    #[test]
    fn accepts_share_classes_and_warrants() {
        for ticker in ["BRK-B", "BF.B", "SPCE-WS", "X1"] {
            assert!(Symbol::parse(ticker).is_ok(), "{ticker}");
        }
    }
}

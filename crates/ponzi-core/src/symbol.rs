//! Validated ticker symbols.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Maximum accepted symbol length.
pub const MAX_SYMBOL_LEN: usize = 10;

/// An upper-case ticker symbol such as `SPY` or `BRK.B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse user or file input into a symbol.
    ///
    /// Lower-case letters are upper-cased. Anything outside `A-Z`, `0-9`,
    /// `.` and `-` is rejected, as is the empty string.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ModelError::BadInput("empty symbol".to_string()));
        }
        if trimmed.len() > MAX_SYMBOL_LEN {
            return Err(ModelError::BadInput(format!("symbol too long: {trimmed}")));
        }
        let upper = trimmed.to_ascii_uppercase();
        if let Some(c) = upper.chars().find(|c| !is_symbol_char(*c)) {
            return Err(ModelError::BadInput(format!("invalid character {c:?} in symbol {trimmed}")));
        }
        Ok(Self(upper))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether `c` may appear in a symbol after upper-casing.
pub fn is_symbol_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-'
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(Symbol::parse("spy").unwrap().as_str(), "SPY");
        assert_eq!(Symbol::parse(" brk.b ").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(Symbol::parse(""), Err(ModelError::BadInput(_))));
        assert!(matches!(Symbol::parse("   "), Err(ModelError::BadInput(_))));
        assert!(Symbol::parse("SP Y").is_err());
        assert!(Symbol::parse("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let sym = Symbol::parse("QQQ").unwrap();
        let json = serde_json::to_string(&sym).unwrap();
        assert_eq!(json, "\"QQQ\"");
        let back: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sym);
        assert!(serde_json::from_str::<Symbol>("\"\"").is_err());
    }
}

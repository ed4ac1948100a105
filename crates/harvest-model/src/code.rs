//! Canonical code token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a token cannot become a [`Code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The token was empty.
    #[error("code is empty")]
    Empty,

    /// The token contained whitespace.
    #[error("code '{0}' contains whitespace")]
    Whitespace(String),
}

/// A candidate promo code, always stored upper-cased.
///
/// Two codes that differ only in case are the same code, so ordering and
/// equality operate on the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Code(String);

impl Code {
    /// Build a code from a raw token, upper-casing it.
    pub fn new(raw: &str) -> Result<Self, CodeError> {
        if raw.is_empty() {
            return Err(CodeError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(CodeError::Whitespace(raw.to_string()));
        }
        Ok(Self(raw.to_uppercase()))
    }

    /// The canonical upper-case text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Code {
    type Error = CodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        code.0
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_upper_cased() {
        let code = Code::new("lucky99").unwrap();
        assert_eq!(code.as_str(), "LUCKY99");
        assert_eq!(code, Code::new("LuCkY99").unwrap());
    }

    #[test]
    fn test_code_rejects_empty_and_whitespace() {
        assert_eq!(Code::new(""), Err(CodeError::Empty));
        assert!(matches!(Code::new("AB CD"), Err(CodeError::Whitespace(_))));
    }

    #[test]
    fn test_code_len_counts_chars() {
        let code = Code::new("été1").unwrap();
        assert_eq!(code.len(), 4);
    }
}

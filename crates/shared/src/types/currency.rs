//! Currency identifiers.
//!
//! Codes are normalized to upper case on construction, so two codes that
//! differ only in case compare equal everywhere else in the system.

use serde::{Deserialize, Serialize};

/// Errors produced when parsing an ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsoCodeError {
    /// The code was empty or whitespace.
    #[error("Currency code cannot be empty")]
    Empty,

    /// The code exceeds [`IsoCode::MAX_LEN`] characters.
    #[error("Currency code '{0}' is too long")]
    TooLong(String),

    /// The code contains something other than ASCII letters or digits.
    #[error("Currency code '{0}' contains invalid characters")]
    InvalidCharacter(String),
}

/// A short currency identifier such as `SEK` or `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IsoCode(String);

impl IsoCode {
    /// Longest code accepted by storage.
    pub const MAX_LEN: usize = 8;

    /// Parses and normalizes a currency code.
    pub fn new(code: &str) -> Result<Self, IsoCodeError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(IsoCodeError::Empty);
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(IsoCodeError::TooLong(trimmed.to_string()));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IsoCodeError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Builds a code from a literal known to be valid.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_ascii_uppercase())
    }

    /// Returns the normalized code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IsoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for IsoCode {
    type Err = IsoCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for IsoCode {
    type Error = IsoCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&str> for IsoCode {
    type Error = IsoCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IsoCode> for String {
    fn from(code: IsoCode) -> Self {
        code.0
    }
}

impl AsRef<str> for IsoCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for IsoCode {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for IsoCode {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// A currency offered to users, with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyChoice {
    /// Currency code.
    pub code: IsoCode,
    /// Label shown in selection lists. Falls back to the code.
    #[serde(default)]
    pub label: Option<String>,
}

impl CurrencyChoice {
    /// Creates a choice labelled with its own code.
    #[must_use]
    pub const fn new(code: IsoCode) -> Self {
        Self { code, label: None }
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.code.as_str())
    }
}

//! Locale identifiers and the field order they imply.

use std::fmt;

use thiserror::Error;

/// A locale problem. Always fatal: it means the caller configured the
/// extraction run for something this crate cannot parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// The identifier is not of the form `ll`, `ll-RR` or `ll_RR`.
    #[error("malformed locale identifier: {identifier:?}")]
    Malformed { identifier: String },

    /// The language has no date grammar.
    #[error("unsupported locale for date parsing: {identifier}")]
    Unsupported { identifier: String },
}

/// A language/region pair such as `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    pub language: String,
    pub region: Option<String>,
}

impl Locale {
    /// English (United States), used when no locale is given.
    pub fn en_us() -> Self {
        Self {
            language: "en".to_string(),
            region: Some("US".to_string()),
        }
    }

    /// Parse an identifier. An empty string selects [`Locale::en_us`].
    pub fn parse(identifier: &str) -> Result<Self, LocaleError> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Ok(Self::en_us());
        }

        let malformed = || LocaleError::Malformed {
            identifier: identifier.to_string(),
        };

        let mut parts = trimmed.split(|c| c == '-' || c == '_');
        let language = parts.next().ok_or_else(malformed)?;
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(malformed());
        }

        let region = match parts.next() {
            Some(region)
                if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                Some(region.to_ascii_uppercase())
            }
            Some(_) => return Err(malformed()),
            None => None,
        };

        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }

    /// Order of numeric date fields for this locale.
    pub fn date_order(&self) -> Result<DateOrder, LocaleError> {
        if self.language != "en" {
            return Err(LocaleError::Unsupported {
                identifier: self.to_string(),
            });
        }
        Ok(match self.region.as_deref() {
            None | Some("US") | Some("PH") | Some("CA") => DateOrder::MonthDayYear,
            Some(_) => DateOrder::DayMonthYear,
        })
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

/// How an all-numeric date like `01/02/03` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthDayYear,
    DayMonthYear,
}

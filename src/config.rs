//! Extraction configuration.

use chrono::NaiveDateTime;
use layered_date_finder::start_of_current_year;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Probability a candidate must reach to be reported as a date.
pub const DEFAULT_THRESHOLD: f64 = 0.50;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Caller-supplied settings for one extraction run.
///
/// Every field has a default, so a TOML document only needs the keys it
/// wants to change:
///
/// ```
/// use layered_dates::ExtractConfig;
///
/// let config = ExtractConfig::from_toml_str("threshold = 0.75").unwrap();
/// assert_eq!(config.threshold, 0.75);
/// assert_eq!(config.locale, "en-US");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Only report candidates with a complete day, month and year.
    pub strict: bool,
    /// Fills in fields a partial date leaves out. `None` means midnight on
    /// 1 January of the current year.
    pub base_date: Option<NaiveDateTime>,
    /// Minimum classifier probability for an annotation.
    pub threshold: f64,
    /// Locale identifier such as `en-US` or `en-GB`.
    pub locale: String,
}

impl ExtractConfig {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_base_date(mut self, base_date: NaiveDateTime) -> Self {
        self.base_date = Some(base_date);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ExtractConfig = toml::from_str(source).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold {
                value: self.threshold,
            });
        }
        Ok(())
    }

    /// The configured base date, or the start of the current year.
    pub fn resolved_base_date(&self) -> NaiveDateTime {
        self.base_date.unwrap_or_else(start_of_current_year)
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strict: false,
            base_date: None,
            threshold: DEFAULT_THRESHOLD,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

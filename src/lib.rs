#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Date extraction for contract text, with false-positive suppression.
//!
//! Finding things that look like dates is easy; most of them are section
//! numbers, prices and measurements. This crate runs candidates from
//! [`layered_date_finder`] through a pipeline that throws those away:
//!
//! - [`apply_filters`] - Ordered heuristic rules that reject or rewrite candidates
//! - [`parse_with_retry`] - Resolution that trims over-captured words
//! - [`date_parts_are_grounded`] - Checks every resolved field appears in the text
//! - [`extract_features`] - Character and bigram proportions around a candidate
//! - [`LogisticModel`] - The bundled [`DateClassifier`]
//!
//! [`DateExtractor`] produces raw dates; [`DateAnnotator`] scores them and
//! keeps those at or above the configured threshold.
//!
//! ## Example
//!
//! ```
//! use layered_dates::{get_date_annotations, ExtractConfig};
//!
//! let text = "This Agreement is dated as of January 5, 2020.";
//! let annotations = get_date_annotations(text, &ExtractConfig::default()).unwrap();
//!
//! assert_eq!(annotations.len(), 1);
//! assert_eq!(annotations[0].date.to_string(), "2020-01-05");
//! assert_eq!(annotations[0].text, "of January 5, 2020");
//! ```

mod annotate;
mod classifier;
mod config;
mod display;
mod errors;
mod extract;
mod features;
mod filter;
mod reconcile;
mod retry;

pub use annotate::{get_date_annotations, get_dates, Annotations, DateAnnotation, DateAnnotator};
pub use classifier::{default_model, DateClassifier, LogisticModel};
pub use config::{ExtractConfig, DEFAULT_LOCALE, DEFAULT_THRESHOLD};
pub use display::AnnotationDisplay;
pub use errors::{ConfigError, DateError, DateResult, LocaleError, ModelError};
pub use extract::{DateExtractor, RawDate, RawDates};
pub use features::{
    extract_features, FeatureConfig, FeatureVector, DEFAULT_CHARACTERS, WORD_SHAPE_COLUMNS,
};
pub use filter::{
    apply_filters, CleanCandidate, FilterOutcome, Lookback, Rule, RuleInput, Verdict,
    DATE_MAX_LENGTH, RULES,
};
pub use reconcile::date_parts_are_grounded;
pub use retry::{parse_with_retry, trim_attempts};

pub use layered_date_finder::{DateValue, Locale};

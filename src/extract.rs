//! Raw date extraction: candidates in, grounded dates out.
//!
//! [`RawDates`] drives the locator's candidates through the filter chain,
//! resolution with trimming and the date-parts check. Nothing here decides
//! whether a date is a false positive by context; see
//! [`crate::DateAnnotator`] for that.

use std::ops::Range;

use layered_date_finder::{
    Candidate, CandidateLocator, DateFinder, DateValue, Locale, LocaleError,
};
use tracing::trace;

use crate::filter::{apply_filters, FilterOutcome, Lookback};
use crate::reconcile::date_parts_are_grounded;
use crate::retry::parse_with_retry;
use crate::{DateError, DateResult, ExtractConfig};

/// A date found in the text before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDate {
    pub value: DateValue,
    /// Byte range of the candidate in the source text.
    pub span: Range<usize>,
}

/// Runs the raw extraction pipeline with a given locator.
#[derive(Debug, Clone)]
pub struct DateExtractor<L = DateFinder> {
    locator: L,
    config: ExtractConfig,
}

impl DateExtractor<DateFinder> {
    /// Extractor using the default English locator, based on
    /// `config.base_date`.
    pub fn new(config: ExtractConfig) -> Self {
        let locator = DateFinder::new(config.resolved_base_date());
        Self { locator, config }
    }
}

impl Default for DateExtractor<DateFinder> {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl<L: CandidateLocator> DateExtractor<L> {
    pub fn with_locator(locator: L, config: ExtractConfig) -> Self {
        Self { locator, config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Lazily extract raw dates from `text`, in document order.
    ///
    /// Every call starts over. The iterator yields a single `Err` and then
    /// stops when the configured locale cannot be used.
    pub fn raw_dates(&self, text: &str) -> RawDates<'_, L> {
        let locale = Locale::parse(&self.config.locale);
        let candidates = match &locale {
            Ok(_) => self.locator.extract_candidates(text, self.config.strict),
            Err(_) => Vec::new(),
        };
        RawDates {
            locator: &self.locator,
            locale,
            candidates: candidates.into_iter(),
            previous: None,
            finished: false,
        }
    }

    pub fn raw_date_list(&self, text: &str) -> DateResult<Vec<RawDate>> {
        self.raw_dates(text).collect()
    }
}

/// What the filter chain needs to remember about the last candidate.
#[derive(Debug)]
struct Previous {
    rejected: bool,
    digits_modifier: Vec<String>,
}

impl Previous {
    fn accepted() -> Self {
        Self {
            rejected: false,
            digits_modifier: Vec::new(),
        }
    }

    fn rejected(digits_modifier: Vec<String>) -> Self {
        Self {
            rejected: true,
            digits_modifier,
        }
    }
}

/// Iterator returned by [`DateExtractor::raw_dates`].
pub struct RawDates<'a, L> {
    locator: &'a L,
    locale: Result<Locale, LocaleError>,
    candidates: std::vec::IntoIter<Candidate>,
    previous: Option<Previous>,
    finished: bool,
}

impl<'a, L: CandidateLocator> Iterator for RawDates<'a, L> {
    type Item = DateResult<RawDate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let locale = match &self.locale {
            Ok(locale) => locale,
            Err(error) => {
                self.finished = true;
                return Some(Err(DateError::Locale(error.clone())));
            }
        };

        for candidate in self.candidates.by_ref() {
            let lookback = self.previous.as_ref().map(|previous| Lookback {
                rejected: previous.rejected,
                digits_modifier: &previous.digits_modifier,
            });

            let clean = match apply_filters(&candidate, lookback) {
                FilterOutcome::Accepted(clean) => clean,
                FilterOutcome::Rejected { rule, props } => {
                    trace!(candidate = %candidate.raw, rule, "candidate rejected");
                    self.previous = Some(Previous::rejected(props.digits_modifier));
                    continue;
                }
            };

            let resolved = match parse_with_retry(self.locator, &clean, locale) {
                Ok(resolved) => resolved,
                Err(error) => {
                    self.finished = true;
                    return Some(Err(DateError::Locale(error)));
                }
            };

            let value = resolved
                .filter(|resolved| date_parts_are_grounded(resolved, &clean.props))
                .and_then(|resolved| resolved.to_value());

            match value {
                Some(value) => {
                    self.previous = Some(Previous::accepted());
                    return Some(Ok(RawDate {
                        value,
                        span: candidate.span,
                    }));
                }
                None => {
                    trace!(candidate = %clean.date_string, "candidate did not resolve");
                    self.previous = Some(Previous::rejected(clean.props.digits_modifier));
                }
            }
        }

        self.finished = true;
        None
    }
}

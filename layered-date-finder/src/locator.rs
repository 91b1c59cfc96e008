//! Candidate location: finding substrings that might be dates.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::resolve::resolve_date_string;
use crate::tokens::{scan, Token, TokenKind};
use crate::{Candidate, DateProps, Locale, ParseError, ResolvedDate};

/// Minimum number of contiguous tokens (separators included) for a match.
const MIN_TOKENS: usize = 3;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Finds candidate date strings and resolves them to dates.
///
/// Implementations must be deterministic and free of shared mutable state:
/// the same text always yields the same candidates.
pub trait CandidateLocator {
    /// Candidate substrings of `text`, in document order.
    ///
    /// With `strict` set only candidates carrying a complete day, month and
    /// year are returned.
    fn extract_candidates(&self, text: &str, strict: bool) -> Vec<Candidate>;

    /// Resolve a (possibly rewritten) candidate string to a date.
    ///
    /// A [`ParseError::Locale`] must be returned unchanged; every other error
    /// only means the string is not a date.
    fn resolve(
        &self,
        date_string: &str,
        props: &DateProps,
        locale: &Locale,
    ) -> Result<ResolvedDate, ParseError>;
}

/// The default English candidate locator.
#[derive(Debug, Clone)]
pub struct DateFinder {
    base_date: NaiveDateTime,
}

impl DateFinder {
    /// Create a finder that fills missing date fields from `base_date`.
    pub fn new(base_date: NaiveDateTime) -> Self {
        Self { base_date }
    }

    /// The date used to fill in fields a candidate does not mention.
    pub fn base_date(&self) -> NaiveDateTime {
        self.base_date
    }

    fn candidate_from_run(text: &str, run: &[Token<'_>], strict: bool) -> Option<Candidate> {
        if run.len() < MIN_TOKENS {
            return None;
        }

        let first = run.iter().position(|t| t.kind != TokenKind::Delimiter)?;
        let last = run.iter().rposition(|t| t.kind != TokenKind::Delimiter)?;
        let tokens = &run[first..=last];
        let props = DateProps::from_tokens(tokens);

        if strict && !is_complete(&props) {
            return None;
        }

        let span = tokens[0].start..tokens[tokens.len() - 1].end;
        let raw = WHITESPACE.replace_all(&text[span.clone()], " ").into_owned();
        Some(Candidate::new(raw, span, props))
    }
}

impl Default for DateFinder {
    /// Base date of midnight on the first of January of the current year.
    fn default() -> Self {
        Self::new(start_of_current_year())
    }
}

/// Midnight on 1 January of the current local year.
pub fn start_of_current_year() -> NaiveDateTime {
    let year = Local::now().year();
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Strict mode: `12-05-2015` or `19 February 2013`.
fn is_complete(props: &DateProps) -> bool {
    props.digits.len() == 3 || (props.months.len() == 1 && props.digits.len() == 2)
}

impl CandidateLocator for DateFinder {
    fn extract_candidates(&self, text: &str, strict: bool) -> Vec<Candidate> {
        let tokens = scan(text);
        let mut candidates = Vec::new();

        let mut run_start = 0;
        for ix in 1..=tokens.len() {
            let contiguous = ix < tokens.len() && tokens[ix].start == tokens[ix - 1].end;
            if contiguous {
                continue;
            }
            if let Some(candidate) = Self::candidate_from_run(text, &tokens[run_start..ix], strict) {
                candidates.push(candidate);
            }
            run_start = ix;
        }

        trace!(count = candidates.len(), strict, "located date candidates");
        candidates
    }

    fn resolve(
        &self,
        date_string: &str,
        _props: &DateProps,
        locale: &Locale,
    ) -> Result<ResolvedDate, ParseError> {
        resolve_date_string(date_string, self.base_date, locale)
    }
}

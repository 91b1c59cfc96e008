//! Resolution with token trimming.
//!
//! The locator regularly captures a word too many or too few at either end
//! of a date. When the full string does not resolve, shorter and shorter
//! slices of it are tried: for each trim length, first from the front and
//! then from the back.

use layered_date_finder::{CandidateLocator, Locale, LocaleError, ParseError, ResolvedDate};
use tracing::warn;

use crate::CleanCandidate;

/// Strings to try, in order, for a cleaned date string.
pub fn trim_attempts(date_string: &str) -> Vec<String> {
    let tokens: Vec<&str> = date_string.split_whitespace().collect();
    let mut attempts = vec![date_string.to_string()];
    for cut in 1..tokens.len() {
        attempts.push(tokens[cut..].join(" "));
        attempts.push(tokens[..tokens.len() - cut].join(" "));
    }
    attempts
}

/// Resolve `candidate`, trimming tokens until something parses.
///
/// Returns `Ok(None)` when no attempt resolves. A locale error aborts
/// immediately since every later attempt would fail the same way.
pub fn parse_with_retry<L: CandidateLocator + ?Sized>(
    locator: &L,
    candidate: &CleanCandidate,
    locale: &Locale,
) -> Result<Option<ResolvedDate>, LocaleError> {
    for attempt in trim_attempts(&candidate.date_string) {
        match locator.resolve(&attempt, &candidate.props, locale) {
            Ok(resolved) => return Ok(Some(resolved)),
            Err(ParseError::Locale(error)) => return Err(error),
            Err(error) => {
                warn!(date_string = %attempt, %error, "cannot parse date");
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use layered_date_finder::{DateFinder, DateProps};

    fn finder() -> DateFinder {
        let base: NaiveDateTime = NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        DateFinder::new(base)
    }

    #[test]
    fn test_trim_attempts_order() {
        assert_eq!(
            trim_attempts("a b c"),
            vec!["a b c", "b c", "a b", "c", "a"]
        );
        assert_eq!(trim_attempts("a"), vec!["a"]);
    }

    #[test]
    fn test_retry_trims_trailing_range() {
        let candidate = CleanCandidate::new("January 5 to 7", DateProps::default());
        let resolved = parse_with_retry(&finder(), &candidate, &Locale::en_us())
            .unwrap()
            .unwrap();
        assert_eq!(
            resolved.datetime.date(),
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_retry_gives_up() {
        let candidate = CleanCandidate::new("to to", DateProps::default());
        assert_eq!(
            parse_with_retry(&finder(), &candidate, &Locale::en_us()),
            Ok(None)
        );
    }

    #[test]
    fn test_locale_error_is_not_swallowed() {
        let candidate = CleanCandidate::new("January 5, 2020", DateProps::default());
        let locale = Locale::parse("fr-FR").unwrap();
        assert!(matches!(
            parse_with_retry(&finder(), &candidate, &locale),
            Err(LocaleError::Unsupported { .. })
        ));
    }
}

//! Candidate date strings and their structural properties.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::tokens::{Token, TokenKind};

/// Structural hints recognized inside a candidate, grouped by token kind.
///
/// Every list keeps the tokens in the order they appear in the source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateProps {
    /// Bare numbers: "5", "2020"
    pub digits: Vec<String>,
    /// Ordinal numbers: "1st", "22nd"
    pub digits_modifier: Vec<String>,
    /// Month names: "January", "Dec"
    pub months: Vec<String>,
    /// Day-of-week names: "Monday", "fri"
    pub days: Vec<String>,
    /// Separator runs: "/", ", ", "."
    pub delimiters: Vec<String>,
    /// Residual words such as "of", "dated", "on"
    pub extra_tokens: Vec<String>,
    /// Clock times: "10:30", "23:59:59"
    pub times: Vec<String>,
    /// "am", "p.m."
    pub time_periods: Vec<String>,
    /// "UTC", "EST", "Z"
    pub timezones: Vec<String>,
}

impl DateProps {
    pub(crate) fn from_tokens(tokens: &[Token<'_>]) -> Self {
        let mut props = DateProps::default();
        for token in tokens {
            let bucket = match token.kind {
                TokenKind::Time => &mut props.times,
                TokenKind::DigitsModifier => &mut props.digits_modifier,
                TokenKind::Digits => &mut props.digits,
                TokenKind::Day => &mut props.days,
                TokenKind::Month => &mut props.months,
                TokenKind::Timezone => &mut props.timezones,
                TokenKind::TimePeriod => &mut props.time_periods,
                TokenKind::Extra => &mut props.extra_tokens,
                TokenKind::Delimiter => &mut props.delimiters,
            };
            bucket.push(token.text.to_string());
        }
        props
    }

    /// Number of delimiter runs that are exactly `delimiter`.
    pub fn count_delimiter(&self, delimiter: &str) -> usize {
        self.delimiters.iter().filter(|d| *d == delimiter).count()
    }
}

/// A substring of the source text that might encode a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// The matched text with whitespace runs collapsed to a single space
    pub raw: String,
    /// Byte range of the match in the source text
    pub span: Range<usize>,
    pub props: DateProps,
}

impl Candidate {
    pub fn new(raw: impl Into<String>, span: Range<usize>, props: DateProps) -> Self {
        Self {
            raw: raw.into(),
            span,
            props,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::scan;

    #[test]
    fn test_props_from_tokens() {
        let tokens = scan("on 12/31/99 at 10:30 pm EST");
        let props = DateProps::from_tokens(&tokens);
        assert_eq!(props.digits, vec!["12", "31", "99"]);
        assert_eq!(props.extra_tokens, vec!["on", "at"]);
        assert_eq!(props.times, vec!["10:30"]);
        assert_eq!(props.time_periods, vec!["pm"]);
        assert_eq!(props.timezones, vec!["EST"]);
        assert_eq!(props.count_delimiter("/"), 2);
        assert_eq!(props.count_delimiter(" "), 5);
    }
}

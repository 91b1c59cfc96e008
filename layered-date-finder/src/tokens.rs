//! Token grammar for date candidates.
//!
//! Tokens are matched case-insensitively and without word boundaries, so a
//! month name can be found inside a longer word ("Dec" in "Decided"). The
//! filter chain downstream is responsible for throwing those away.

use once_cell::sync::Lazy;
use regex::Regex;

/// Month names in calendar order, with every spelling we accept.
pub const EN_MONTHS: &[&[&str]] = &[
    &["january", "jan"],
    &["february", "feb", "febr"],
    &["march", "mar"],
    &["april", "apr"],
    &["may"],
    &["june", "jun"],
    &["july", "jul"],
    &["august", "aug"],
    &["september", "sep", "sept"],
    &["october", "oct"],
    &["november", "nov"],
    &["december", "dec"],
];

/// Day-of-week names, longest spellings first.
pub const EN_DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "tues",
    "thurs",
    "thur",
    "mon",
    "tue",
    "wed",
    "thu",
    "fri",
    "sat",
    "sun",
];

/// Words that commonly surround a date without being part of it.
///
/// The single letter `t` is the ISO date/time separator.
pub const EXTRA_TOKENS: &[&str] = &[
    "during",
    "due",
    "by",
    "on",
    "standard",
    "daylight",
    "savings",
    "time",
    "dated",
    "date",
    "of",
    "to",
    "through",
    "between",
    "until",
    "at",
    "day",
    "t",
];

/// Timezone abbreviations and their offset from UTC in hours.
pub const TIMEZONES: &[(&str, i32)] = &[
    ("utc", 0),
    ("gmt", 0),
    ("edt", -4),
    ("est", -5),
    ("cdt", -5),
    ("cst", -6),
    ("mdt", -6),
    ("mst", -7),
    ("pdt", -7),
    ("pst", -8),
    ("z", 0),
];

/// Which part of the grammar a token matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Time,
    DigitsModifier,
    Digits,
    Day,
    Month,
    Timezone,
    TimePeriod,
    Extra,
    Delimiter,
}

impl TokenKind {
    const ALL: [(&'static str, TokenKind); 9] = [
        ("time", TokenKind::Time),
        ("digits_modifier", TokenKind::DigitsModifier),
        ("digits", TokenKind::Digits),
        ("days", TokenKind::Day),
        ("months", TokenKind::Month),
        ("timezones", TokenKind::Timezone),
        ("time_periods", TokenKind::TimePeriod),
        ("extra_tokens", TokenKind::Extra),
        ("delimiters", TokenKind::Delimiter),
    ];
}

/// A single matched token with its byte range in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'t> {
    pub kind: TokenKind,
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
}

/// Longest words first so the leftmost-first alternation never stops at a prefix.
fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.into_iter().collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()));
    words.into_iter().map(regex::escape).collect::<Vec<_>>().join("|")
}

static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    let months = alternation(EN_MONTHS.iter().flat_map(|names| names.iter().copied()));
    let days = alternation(EN_DAYS.iter().copied());
    let timezones = alternation(TIMEZONES.iter().map(|(name, _)| *name));
    let extra = alternation(EXTRA_TOKENS.iter().copied());

    let pattern = format!(
        r"(?i)(?P<time>\d{{1,2}}:\d{{2}}(?::\d{{2}})?)|(?P<digits_modifier>\d+(?:st|nd|rd|th))|(?P<digits>\d+)|(?P<days>{days})|(?P<months>{months})|(?P<timezones>{timezones})|(?P<time_periods>a\.m\.|p\.m\.|am|pm)|(?P<extra_tokens>{extra})|(?P<delimiters>[/:\-,.\s_+@]+)"
    );
    Regex::new(&pattern).expect("date token grammar is a valid regex")
});

/// Scan `text` into date tokens, in order. Text between tokens is skipped.
pub fn scan(text: &str) -> Vec<Token<'_>> {
    TOKEN_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            TokenKind::ALL.iter().find_map(|(group, kind)| {
                caps.name(group).map(|m| Token {
                    kind: *kind,
                    text: m.as_str(),
                    start: m.start(),
                    end: m.end(),
                })
            })
        })
        .collect()
}

/// Look up a month name (full or abbreviated, any case) and return its number.
pub fn month_by_name(name: &str) -> Option<u32> {
    let lower = name.trim_end_matches('.').to_lowercase();
    EN_MONTHS
        .iter()
        .position(|names| names.contains(&lower.as_str()))
        .map(|ix| ix as u32 + 1)
}

pub(crate) fn is_day_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    EN_DAYS.contains(&lower.as_str())
}

pub(crate) fn timezone_offset_hours(name: &str) -> Option<i32> {
    let lower = name.to_lowercase();
    TIMEZONES
        .iter()
        .find(|(tz, _)| *tz == lower)
        .map(|(_, hours)| *hours)
}

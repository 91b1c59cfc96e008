//! Resolution of a cleaned date string into a calendar value.
//!
//! The grammar is deliberately forgiving about separators and strict about
//! words: any word that is not a month, weekday, meridiem or timezone makes
//! the string unresolvable, which is what lets the caller retry with a
//! shorter string.

use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::tokens::{is_day_name, month_by_name, timezone_offset_hours};
use crate::{DateOrder, Locale, ParseError};

/// A resolved date and time, with the raw UTC offset if one was given.
///
/// The offset is kept unchecked so that an impossible offset can be detected
/// (and the date dropped) when converting to a [`DateValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub datetime: NaiveDateTime,
    pub offset_seconds: Option<i32>,
}

impl ResolvedDate {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            offset_seconds: None,
        }
    }

    pub fn with_offset(mut self, offset_seconds: i32) -> Self {
        self.offset_seconds = Some(offset_seconds);
        self
    }

    /// Year, month, day, hour and minute, in that order.
    pub fn components(&self) -> [i64; 5] {
        let dt = &self.datetime;
        [
            i64::from(dt.year()),
            i64::from(dt.month()),
            i64::from(dt.day()),
            i64::from(dt.hour()),
            i64::from(dt.minute()),
        ]
    }

    /// Convert to the value reported to callers.
    ///
    /// Returns `None` when the offset cannot be represented. A value at
    /// exactly midnight is reported as a plain date.
    pub fn to_value(&self) -> Option<DateValue> {
        let zoned = match self.offset_seconds {
            Some(seconds) => {
                let offset = FixedOffset::east_opt(seconds)?;
                Some(offset.from_local_datetime(&self.datetime).single()?)
            }
            None => None,
        };

        if self.datetime.hour() == 0 && self.datetime.minute() == 0 {
            return Some(DateValue::Date(self.datetime.date()));
        }

        Some(match zoned {
            Some(zoned) => DateValue::Zoned(zoned),
            None => DateValue::DateTime(self.datetime),
        })
    }
}

/// A date as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl DateValue {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateValue::Date(date) => *date,
            DateValue::DateTime(dt) => dt.date(),
            DateValue::Zoned(dt) => dt.date_naive(),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            DateValue::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

static LEXER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<time>\d{1,2}:\d{2}(?::\d{2})?)|(?P<ordinal>\d+(?:st|nd|rd|th))|(?P<number>\d+)|(?P<word>[a-z]+)|(?P<sign>[+-])|(?P<sep>[\s,/._@:()']+)|(?P<other>.)",
    )
    .expect("date lexer is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'a> {
    Time(&'a str),
    Ordinal(&'a str),
    Number(&'a str),
    Word(&'a str),
    Sign(i32),
    Other(&'a str),
}

fn lex(input: &str) -> Vec<(Lexeme<'_>, usize, usize)> {
    LEXER
        .captures_iter(input)
        .filter_map(|caps| {
            let (lexeme, m) = if let Some(m) = caps.name("time") {
                (Lexeme::Time(m.as_str()), m)
            } else if let Some(m) = caps.name("ordinal") {
                (Lexeme::Ordinal(m.as_str()), m)
            } else if let Some(m) = caps.name("number") {
                (Lexeme::Number(m.as_str()), m)
            } else if let Some(m) = caps.name("word") {
                (Lexeme::Word(m.as_str()), m)
            } else if let Some(m) = caps.name("sign") {
                let sign = if m.as_str() == "-" { -1 } else { 1 };
                (Lexeme::Sign(sign), m)
            } else if let Some(m) = caps.name("other") {
                (Lexeme::Other(m.as_str()), m)
            } else {
                return None;
            };
            Some((lexeme, m.start(), m.end()))
        })
        .collect()
}

/// A number as written: its value and how many digits it had.
#[derive(Debug, Clone, Copy)]
struct Written {
    value: u32,
    width: usize,
}

#[derive(Debug, Default)]
struct Fields {
    year: Option<Written>,
    month: Option<u32>,
    day: Option<u32>,
    time: Option<(u32, u32, u32)>,
    pm: Option<bool>,
    offset_seconds: Option<i32>,
}

impl Fields {
    fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none() && self.time.is_none()
    }
}

struct Resolution<'a> {
    input: &'a str,
    fields: Fields,
    numbers: Vec<Written>,
    /// Index into `numbers` of the number taken as the year by its shape
    year_position: Option<usize>,
}

impl<'a> Resolution<'a> {
    fn conflict(&self, field: &'static str) -> ParseError {
        ParseError::Conflict {
            field,
            input: self.input.to_string(),
        }
    }

    fn out_of_range(&self) -> ParseError {
        ParseError::OutOfRange {
            input: self.input.to_string(),
        }
    }

    fn unrecognized(&self, token: &str) -> ParseError {
        ParseError::Unrecognized {
            token: token.to_string(),
            input: self.input.to_string(),
        }
    }

    fn parse_number(&self, digits: &str) -> Result<Written, ParseError> {
        let value = digits.parse::<u32>().map_err(|_| self.out_of_range())?;
        Ok(Written {
            value,
            width: digits.len(),
        })
    }

    fn read_lexemes(&mut self, lexemes: &[(Lexeme<'_>, usize, usize)]) -> Result<(), ParseError> {
        let mut ix = 0;
        while ix < lexemes.len() {
            let (lexeme, _, end) = lexemes[ix];
            match lexeme {
                Lexeme::Time(text) => {
                    if self.fields.time.is_some() {
                        return Err(self.conflict("time"));
                    }
                    let mut parts = text.split(':').map(|p| p.parse::<u32>().unwrap_or(u32::MAX));
                    let hour = parts.next().unwrap_or(0);
                    let minute = parts.next().unwrap_or(0);
                    let second = parts.next().unwrap_or(0);
                    self.fields.time = Some((hour, minute, second));
                }
                Lexeme::Ordinal(text) => {
                    if self.fields.day.is_some() {
                        return Err(self.conflict("day"));
                    }
                    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
                    self.fields.day = Some(self.parse_number(&digits)?.value);
                }
                Lexeme::Number(text) => {
                    let number = self.parse_number(text)?;
                    self.numbers.push(number);
                }
                Lexeme::Word(word) => self.read_word(word)?,
                Lexeme::Sign(sign) => {
                    // A sign only means something right after a clock time or timezone.
                    let anchored = self.fields.time.is_some() || self.fields.offset_seconds.is_some();
                    if let Some(&(next, next_start, _)) = lexemes.get(ix + 1) {
                        if anchored && next_start == end {
                            if let Some(seconds) = offset_seconds(next) {
                                let base = self.fields.offset_seconds.unwrap_or(0);
                                self.fields.offset_seconds = Some(base + sign * seconds);
                                ix += 1;
                            }
                        }
                    }
                }
                Lexeme::Other(text) => return Err(self.unrecognized(text)),
            }
            ix += 1;
        }
        Ok(())
    }

    fn read_word(&mut self, word: &str) -> Result<(), ParseError> {
        if let Some(month) = month_by_name(word) {
            if self.fields.month.is_some() {
                return Err(self.conflict("month"));
            }
            self.fields.month = Some(month);
        } else if is_day_name(word) || word == "t" {
            // weekdays carry no information once the date is known
        } else if word == "am" || word == "pm" {
            self.fields.pm = Some(word == "pm");
        } else if let Some(hours) = timezone_offset_hours(word) {
            if self.fields.offset_seconds.is_some() {
                return Err(self.conflict("timezone"));
            }
            self.fields.offset_seconds = Some(hours * 3600);
        } else {
            return Err(self.unrecognized(word));
        }
        Ok(())
    }

    fn assign_numbers(&mut self, order: DateOrder) -> Result<(), ParseError> {
        let numbers = std::mem::take(&mut self.numbers);

        // Compact forms: 20200105 and 200105.
        if let [only] = numbers.as_slice() {
            if self.fields.month.is_none() && self.fields.day.is_none() {
                let v = only.value;
                match only.width {
                    8 => {
                        self.fields.year = Some(Written { value: v / 10_000, width: 4 });
                        self.fields.month = Some(v / 100 % 100);
                        self.fields.day = Some(v % 100);
                        return Ok(());
                    }
                    6 => {
                        self.fields.year = Some(Written { value: v / 10_000, width: 2 });
                        self.fields.month = Some(v / 100 % 100);
                        self.fields.day = Some(v % 100);
                        return Ok(());
                    }
                    _ => {}
                }
            }
        }

        let mut rest = Vec::with_capacity(numbers.len());
        for (position, number) in numbers.into_iter().enumerate() {
            if number.width == 3 || number.width > 4 {
                return Err(self.unrecognized(&number.value.to_string()));
            }
            if number.width == 4 || number.value > 31 {
                if self.fields.year.is_some() {
                    return Err(self.conflict("year"));
                }
                self.fields.year = Some(number);
                self.year_position = Some(position);
            } else {
                rest.push(number);
            }
        }

        let slots: Vec<Slot> = if self.fields.month.is_some() {
            vec![Slot::Day, Slot::Year]
        } else if self.year_position == Some(0) {
            vec![Slot::Month, Slot::Day]
        } else {
            match order {
                DateOrder::MonthDayYear => vec![Slot::Month, Slot::Day, Slot::Year],
                DateOrder::DayMonthYear => vec![Slot::Day, Slot::Month, Slot::Year],
            }
        };
        let had_month = self.fields.month.is_some();

        let open: Vec<Slot> = slots
            .into_iter()
            .filter(|slot| match slot {
                Slot::Year => self.fields.year.is_none(),
                Slot::Month => self.fields.month.is_none(),
                Slot::Day => self.fields.day.is_none(),
            })
            .collect();
        if rest.len() > open.len() {
            return Err(self.conflict("numbers"));
        }

        for (slot, number) in open.into_iter().zip(rest) {
            match slot {
                Slot::Year => self.fields.year = Some(number),
                Slot::Month => self.fields.month = Some(number.value),
                Slot::Day => self.fields.day = Some(number.value),
            }
        }

        // 31/12/99 read month-first: the month cannot be 31, so swap.
        if !had_month {
            if let (Some(month), Some(day)) = (self.fields.month, self.fields.day) {
                if month > 12 && day <= 12 {
                    self.fields.month = Some(day);
                    self.fields.day = Some(month);
                }
            }
        }
        Ok(())
    }

    fn build(&self, base: NaiveDateTime) -> Result<ResolvedDate, ParseError> {
        if self.fields.is_empty() {
            return Err(ParseError::Empty);
        }

        let year = match self.fields.year {
            Some(Written { value, width }) if width <= 2 => {
                expand_two_digit_year(value as i32, base.year())
            }
            Some(Written { value, .. }) => value as i32,
            None => base.year(),
        };
        let month = self.fields.month.unwrap_or_else(|| base.month());
        let day = self.fields.day.unwrap_or_else(|| base.day());
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| self.out_of_range())?;

        let (mut hour, minute, second) = self
            .fields
            .time
            .unwrap_or((base.hour(), base.minute(), base.second()));
        let meridiem = self.fields.time.and(self.fields.pm);
        match meridiem {
            Some(_) if hour > 12 => return Err(self.out_of_range()),
            Some(true) if hour < 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            _ => {}
        }
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| self.out_of_range())?;

        let resolved = ResolvedDate::new(date.and_time(time));
        Ok(match self.fields.offset_seconds {
            Some(seconds) => resolved.with_offset(seconds),
            None => resolved,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Year,
    Month,
    Day,
}

fn offset_seconds(lexeme: Lexeme<'_>) -> Option<i32> {
    match lexeme {
        Lexeme::Time(text) => {
            let (hours, minutes) = text.split_once(':')?;
            Some(hours.parse::<i32>().ok()? * 3600 + minutes.get(..2)?.parse::<i32>().ok()? * 60)
        }
        Lexeme::Number(text) if text.len() == 4 => {
            let value = text.parse::<i32>().ok()?;
            Some(value / 100 * 3600 + value % 100 * 60)
        }
        Lexeme::Number(text) if text.len() <= 2 => Some(text.parse::<i32>().ok()? * 3600),
        _ => None,
    }
}

/// Place a two-digit year in the hundred-year window centred on `pivot_year`.
pub fn expand_two_digit_year(year: i32, pivot_year: i32) -> i32 {
    let mut full = year + pivot_year / 100 * 100;
    if full >= pivot_year + 50 {
        full -= 100;
    } else if full < pivot_year - 50 {
        full += 100;
    }
    full
}

/// Resolve `date_string` against `base`, which supplies any missing fields.
pub fn resolve_date_string(
    date_string: &str,
    base: NaiveDateTime,
    locale: &Locale,
) -> Result<ResolvedDate, ParseError> {
    let order = locale.date_order()?;

    let normalized = date_string
        .to_lowercase()
        .replace("a.m.", "am")
        .replace("p.m.", "pm");
    let lexemes = lex(&normalized);

    let mut resolution = Resolution {
        input: date_string,
        fields: Fields::default(),
        numbers: Vec::new(),
        year_position: None,
    };
    resolution.read_lexemes(&lexemes)?;
    resolution.assign_numbers(order)?;
    resolution.build(base)
}

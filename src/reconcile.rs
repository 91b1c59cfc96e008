//! Date-parts reconciliation.
//!
//! A resolved date is only trusted when the numbers that produced it are
//! actually written in the candidate. "Section 7.7.10 may" happily resolves
//! to a date in May, but nothing in the text says which day or year.

use std::collections::HashSet;

use layered_date_finder::{month_by_name, DateProps, ResolvedDate};

/// Year, month and day: the components that must be grounded.
const DATE_UNITS: usize = 3;

/// The cardinal number inside an ordinal token: "22nd" is 22.
fn ordinal_to_cardinal(modifier: &str) -> Option<i64> {
    let digits: String = modifier.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// The year as it may have been written: 1999 can appear as 99.
fn short_year(year: i64) -> i64 {
    if year > 1000 {
        year - 100 * (year / 100)
    } else {
        year
    }
}

/// Check that every literal number in `props` found a place in `resolved`.
///
/// Candidate literals are the bare digits, the month names converted to
/// month numbers and the ordinals converted to cardinals. The resolved
/// year, month, day, hour and minute are greedily matched against them.
/// The date is rejected when one of year, month or day was not matched
/// while some literal was left over.
pub fn date_parts_are_grounded(resolved: &ResolvedDate, props: &DateProps) -> bool {
    let units = resolved.components();

    let parsed: Vec<Option<i64>> = props.digits.iter().map(|d| d.parse().ok()).collect();
    // A number too long to be any date part can never be matched.
    let unmatchable_digits = parsed.iter().any(Option::is_none);
    let digits = parsed.iter().flatten().copied();
    let months: Vec<i64> = props
        .months
        .iter()
        .filter_map(|m| month_by_name(m).map(i64::from))
        .collect();
    let days = props
        .digits_modifier
        .iter()
        .filter_map(|m| ordinal_to_cardinal(m))
        .filter(|day| *day != 0);

    // The month name must agree with the resolved month.
    if !props.months.is_empty() {
        let month = units[1];
        if month != 0 && !months.contains(&month) {
            return false;
        }
    }

    let combined: Vec<i64> = digits.chain(months.iter().copied()).chain(days).collect();
    let literal_set: HashSet<i64> = combined.iter().copied().collect();
    let unit_set: HashSet<i64> = units.iter().copied().collect();

    let mut removable: HashSet<i64> = HashSet::new();
    let mut matched = [false; 5];
    for (ix, &value) in units.iter().enumerate() {
        if ix == 0 {
            let short = short_year(value);
            if combined.contains(&short) {
                matched[ix] = true;
                removable.insert(short);
                continue;
            }
        }
        if combined.contains(&value) {
            matched[ix] = true;
            removable.insert(value);
        }
    }

    let leftover_literals = unmatchable_digits
        || literal_set
            .difference(&unit_set)
            .any(|literal| !removable.contains(literal));
    let unmatched_date_unit = matched[..DATE_UNITS].iter().any(|m| !m);

    !(unmatched_date_unit && leftover_literals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn resolved(y: i32, m: u32, d: u32) -> ResolvedDate {
        ResolvedDate::new(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    fn digits(items: &[&str]) -> DateProps {
        DateProps {
            digits: items.iter().map(|s| s.to_string()).collect(),
            ..DateProps::default()
        }
    }

    #[test]
    fn test_grounded_date() {
        let props = digits(&["2023", "7", "15"]);
        assert!(date_parts_are_grounded(&resolved(2023, 7, 15), &props));
    }

    #[test]
    fn test_day_not_in_evidence() {
        let props = digits(&["2023", "7", "15"]);
        assert!(!date_parts_are_grounded(&resolved(2023, 7, 16), &props));
    }

    #[test]
    fn test_two_digit_year() {
        let props = digits(&["12", "31", "99"]);
        assert!(date_parts_are_grounded(&resolved(1999, 12, 31), &props));
    }

    #[test]
    fn test_month_name_must_match() {
        let props = DateProps {
            months: vec!["may".to_string()],
            digits: vec!["7".to_string(), "7".to_string(), "10".to_string()],
            ..DateProps::default()
        };
        assert!(!date_parts_are_grounded(&resolved(2010, 7, 7), &props));
    }

    #[test]
    fn test_partial_date_without_leftovers() {
        // "January 2020": the day comes from the base date but nothing is left over.
        let props = DateProps {
            months: vec!["January".to_string()],
            digits: vec!["2020".to_string()],
            ..DateProps::default()
        };
        assert!(date_parts_are_grounded(&resolved(2020, 1, 1), &props));
    }

    #[test]
    fn test_oversized_number_is_a_leftover() {
        let props = DateProps {
            months: vec!["January".to_string()],
            digits: vec!["99999999999999999999".to_string()],
            ..DateProps::default()
        };
        assert!(!date_parts_are_grounded(&resolved(2019, 1, 1), &props));

        let grounded = digits(&["2023", "7", "15", "99999999999999999999"]);
        assert!(date_parts_are_grounded(&resolved(2023, 7, 15), &grounded));
    }

    #[test]
    fn test_ordinal_day() {
        let props = DateProps {
            months: vec!["January".to_string()],
            digits: vec!["2020".to_string()],
            digits_modifier: vec!["22nd".to_string()],
            ..DateProps::default()
        };
        assert!(date_parts_are_grounded(&resolved(2020, 1, 22), &props));
        assert!(!date_parts_are_grounded(&resolved(2020, 1, 23), &props));
    }
}

use layered_date_finder::{CandidateLocator, DateFinder};

use crate::{apply_filters, FilterOutcome, Lookback};

/// Run every candidate of `text` through the chain, carrying the lookback
/// state the extractor would carry if every accepted candidate resolved.
fn outcomes(text: &str) -> Vec<(String, Result<String, &'static str>)> {
    let candidates = DateFinder::default().extract_candidates(text, false);
    let mut previous: Option<(bool, Vec<String>)> = None;
    let mut result = Vec::new();
    for candidate in &candidates {
        let lookback = previous.as_ref().map(|(rejected, modifiers)| Lookback {
            rejected: *rejected,
            digits_modifier: modifiers,
        });
        match apply_filters(candidate, lookback) {
            FilterOutcome::Accepted(clean) => {
                result.push((candidate.raw.clone(), Ok(clean.date_string)));
                previous = Some((false, Vec::new()));
            }
            FilterOutcome::Rejected { rule, props } => {
                result.push((candidate.raw.clone(), Err(rule)));
                previous = Some((true, props.digits_modifier));
            }
        }
    }
    result
}

fn rejected_by(text: &str) -> Vec<&'static str> {
    outcomes(text)
        .into_iter()
        .filter_map(|(_, outcome)| outcome.err())
        .collect()
}

#[test]
fn month_glued_to_following_word() {
    assert_eq!(
        outcomes("Walmart 5, 2020"),
        vec![("mart 5, 2020".to_string(), Err("month_inside_word"))]
    );
}

#[test]
fn numbered_heading_before_a_word() {
    assert_eq!(
        outcomes("Nil 62. Marquee"),
        vec![("62. Mar".to_string(), Err("number_dot_word"))]
    );
}

#[test]
fn common_false_positives() {
    assert_eq!(rejected_by("items 1 10 and"), vec!["two_small_numbers"]);
    assert_eq!(rejected_by("ratio 3/4 of 100"), vec!["fraction"]);
    assert_eq!(rejected_by("Suite 100, 2020"), vec!["implausible_digit_group"]);
    assert_eq!(rejected_by("You may, at any time"), vec!["bare_may"]);
    assert_eq!(
        rejected_by("See Section 7.7.10 may apply."),
        vec!["may_with_punctuation"]
    );
    assert_eq!(rejected_by("The payment of 3.14 dollars."), vec!["decimal_number"]);
    assert_eq!(rejected_by("on Monday"), vec!["weekday_only"]);
    assert_eq!(rejected_by("January February 2020"), vec!["multiple_months"]);
}

#[test]
fn text_without_date_tokens_is_fully_rejected() {
    for text in [
        "Due on the date of signing.",
        "The parties hereto agree at the time stated.",
        "Until terminated by either party, through the end of the term.",
    ] {
        for (raw, outcome) in outcomes(text) {
            assert!(outcome.is_err(), "{:?} in {:?} was accepted", raw, text);
        }
    }
}

#[test]
fn ordinal_from_rejected_candidate_is_merged() {
    let result = outcomes("the 22nd (twenty-second) day of January, 2020");
    assert_eq!(
        result,
        vec![
            ("22nd".to_string(), Err("modifier_without_digits")),
            (
                "day of January, 2020".to_string(),
                Ok("22  January, 2020".to_string())
            ),
        ]
    );
}

#[test]
fn cleanup_keeps_range_words() {
    assert_eq!(
        outcomes("during January 5 to 7, 2020"),
        vec![(
            "during January 5 to 7, 2020".to_string(),
            Ok("January 5 to 7, 2020".to_string())
        )]
    );
}

//! Heuristic filter chain for raw date candidates.
//!
//! The locator is generous: it reports section numbers, measurements and
//! month names buried inside other words. The rules below throw most of
//! that away before any parsing happens, and rewrite what is left into a
//! string the resolver can read.
//!
//! Rules run in a fixed order. A [`Verdict::Reject`] ends the chain, a
//! [`Verdict::Rewrite`] replaces the working candidate and continues, and
//! [`Verdict::Pass`] moves on to the next rule. Later rules rely on earlier
//! ones having removed pathological inputs, so the order is part of the
//! behavior.

use std::collections::HashSet;

use layered_date_finder::{Candidate, DateProps};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest cleaned string still considered a date.
pub const DATE_MAX_LENGTH: usize = 40;

/// A candidate string and properties ready for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanCandidate {
    pub date_string: String,
    pub props: DateProps,
}

impl CleanCandidate {
    pub fn new(date_string: impl Into<String>, props: DateProps) -> Self {
        Self {
            date_string: date_string.into(),
            props,
        }
    }
}

impl From<&Candidate> for CleanCandidate {
    fn from(candidate: &Candidate) -> Self {
        Self::new(candidate.raw.clone(), candidate.props.clone())
    }
}

/// What the chain remembers about the candidate just before this one.
#[derive(Debug, Clone, Copy)]
pub struct Lookback<'a> {
    /// The previous candidate did not produce a date.
    pub rejected: bool,
    /// Its ordinal tokens ("22nd") after filtering.
    pub digits_modifier: &'a [String],
}

/// Outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Reject,
    Rewrite(CleanCandidate),
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub candidate: &'a CleanCandidate,
    pub previous: Option<Lookback<'a>>,
}

impl<'a> RuleInput<'a> {
    fn props(&self) -> &'a DateProps {
        &self.candidate.props
    }

    fn date_string(&self) -> &'a str {
        &self.candidate.date_string
    }

    fn months_lowercase(&self) -> String {
        self.props().months.concat().to_lowercase()
    }
}

/// A named step in the chain.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&RuleInput<'_>) -> Verdict,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Result of running the whole chain over one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Dropped by `rule`; `props` is the working state at that point.
    Rejected { rule: &'static str, props: DateProps },
    Accepted(CleanCandidate),
}

/// The rules, in the order they are applied.
pub static RULES: &[Rule] = &[
    Rule { name: "day_of_merge", apply: day_of_merge },
    Rule { name: "multiple_months", apply: multiple_months },
    Rule { name: "month_inside_word", apply: month_inside_word },
    Rule { name: "modifier_without_digits", apply: modifier_without_digits },
    Rule { name: "weekday_only", apply: weekday_only },
    Rule { name: "insufficient_evidence", apply: insufficient_evidence },
    Rule { name: "two_small_numbers", apply: two_small_numbers },
    Rule { name: "decimal_number", apply: decimal_number },
    Rule { name: "number_dot_word", apply: number_dot_word },
    Rule { name: "fraction", apply: fraction },
    Rule { name: "implausible_digit_group", apply: implausible_digit_group },
    Rule { name: "bare_may", apply: bare_may },
    Rule { name: "may_with_punctuation", apply: may_with_punctuation },
    Rule { name: "strip_extra_tokens", apply: strip_extra_tokens },
    Rule { name: "too_long", apply: too_long },
    Rule { name: "numbers_only", apply: numbers_only },
];

/// Run the chain over `candidate`.
pub fn apply_filters(candidate: &Candidate, previous: Option<Lookback<'_>>) -> FilterOutcome {
    let mut working = CleanCandidate::from(candidate);
    for rule in RULES {
        let verdict = (rule.apply)(&RuleInput {
            candidate: &working,
            previous,
        });
        match verdict {
            Verdict::Pass => {}
            Verdict::Reject => {
                return FilterOutcome::Rejected {
                    rule: rule.name,
                    props: working.props,
                }
            }
            Verdict::Rewrite(rewritten) => working = rewritten,
        }
    }
    FilterOutcome::Accepted(working)
}

/// Strip ordinal suffixes the way they are spelled after a number.
fn strip_ordinal_suffix(modifier: &str) -> String {
    modifier
        .replace("st", "")
        .replace("nd", "")
        .replace("rd", "")
        .replace("th", "")
}

/// "the 22nd (twenty-second) day of January": the ordinal ended up in the
/// previous, rejected candidate. Pull it forward.
fn day_of_merge(input: &RuleInput<'_>) -> Verdict {
    let has_of = input
        .props()
        .extra_tokens
        .iter()
        .any(|t| t.eq_ignore_ascii_case("of"));
    let previous = match input.previous {
        Some(previous) if has_of && previous.rejected => previous,
        _ => return Verdict::Pass,
    };
    let modifier = match previous.digits_modifier {
        [modifier] => modifier,
        _ => return Verdict::Pass,
    };

    let mut props = input.props().clone();
    props.digits_modifier.push(modifier.clone());
    let date_string = format!("{}{}", strip_ordinal_suffix(modifier), input.date_string());
    Verdict::Rewrite(CleanCandidate::new(date_string, props))
}

fn multiple_months(input: &RuleInput<'_>) -> Verdict {
    reject_if(input.props().months.len() > 1)
}

/// "Dec" in "Decided", "Mar" in "Martin".
fn month_inside_word(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    match (props.months.as_slice(), props.extra_tokens.last()) {
        ([month], Some(last_extra)) => {
            let glued = format!("{}{}", month, last_extra);
            reject_if(input.date_string().contains(&glued))
        }
        _ => Verdict::Pass,
    }
}

fn modifier_without_digits(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    reject_if(!props.digits_modifier.is_empty() && props.digits.is_empty())
}

fn weekday_only(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    reject_if(!props.days.is_empty() && props.digits.is_empty())
}

fn insufficient_evidence(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    reject_if(props.months.is_empty() && props.digits_modifier.is_empty() && props.digits.len() <= 1)
}

static TWO_SMALL_NUMBERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}\s+\d{1,2}").expect("valid regex"));

/// "1 10"
fn two_small_numbers(input: &RuleInput<'_>) -> Verdict {
    reject_if(TWO_SMALL_NUMBERS.is_match(input.date_string()))
}

static DOTTED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{2,4}").expect("valid regex"));

/// "3.14" but not "01.02.2003".
fn decimal_number(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    reject_if(
        props.count_delimiter(".") > 0
            && props.months.is_empty()
            && !DOTTED_DATE.is_match(input.date_string()),
    )
}

static NUMBER_DOT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2,4}\.\s*[A-Za-z]").expect("valid regex"));

/// "Nil 62. Marquee"
fn number_dot_word(input: &RuleInput<'_>) -> Verdict {
    reject_if(NUMBER_DOT_WORD.is_match(input.date_string()))
}

/// "1/2 3" or "10-12 15"
fn fraction(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    let single_separator = props.count_delimiter("/") == 1 || props.count_delimiter("-") == 1;
    reject_if(single_separator && props.digits.len() > 2)
}

/// Three-digit groups and "00"-prefixed groups are never a day, month or year.
fn implausible_digit_group(input: &RuleInput<'_>) -> Verdict {
    reject_if(
        input
            .props()
            .digits
            .iter()
            .any(|d| d.chars().count() == 3 || d.starts_with("00")),
    )
}

/// "may" on its own is almost always the modal verb.
fn bare_may(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    reject_if(props.digits.is_empty() && props.days.is_empty() && input.months_lowercase() == "may")
}

/// "13.2 may", "7.7.10 may"
fn may_with_punctuation(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    let punctuation =
        props.count_delimiter(".") + props.count_delimiter("/") + props.count_delimiter("-");
    reject_if(!props.digits.is_empty() && punctuation > 0 && input.months_lowercase() == "may")
}

/// Remove every extra token except "to" and "t" from the string, longest
/// first, and forget the extra tokens.
fn strip_extra_tokens(input: &RuleInput<'_>) -> Verdict {
    let mut props = input.props().clone();
    let mut extra = std::mem::take(&mut props.extra_tokens);
    extra.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let mut date_string = input.date_string().to_string();
    for token in &extra {
        let lower = token.to_lowercase();
        if lower == "to" || lower == "t" {
            continue;
        }
        date_string = date_string.replace(token.as_str(), "");
    }

    Verdict::Rewrite(CleanCandidate::new(date_string.trim(), props))
}

fn too_long(input: &RuleInput<'_>) -> Verdict {
    reject_if(input.date_string().chars().count() > DATE_MAX_LENGTH)
}

/// Nothing but bare numbers separated by spaces or commas.
fn numbers_only(input: &RuleInput<'_>) -> Verdict {
    let props = input.props();
    let harmless: HashSet<char> = [',', ' ', '\n', '\t'].into_iter().collect();
    let meaningful = props
        .delimiters
        .iter()
        .flat_map(|d| d.chars())
        .any(|c| !harmless.contains(&c));
    reject_if(!meaningful && props.months.is_empty())
}

fn reject_if(condition: bool) -> Verdict {
    if condition {
        Verdict::Reject
    } else {
        Verdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(f: impl FnOnce(&mut DateProps)) -> DateProps {
        let mut props = DateProps::default();
        f(&mut props);
        props
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn run(rule: fn(&RuleInput<'_>) -> Verdict, date_string: &str, props: DateProps) -> Verdict {
        let candidate = CleanCandidate::new(date_string, props);
        rule(&RuleInput {
            candidate: &candidate,
            previous: None,
        })
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "day_of_merge");
        assert_eq!(names[13], "strip_extra_tokens");
        assert_eq!(names[15], "numbers_only");
    }

    #[test]
    fn test_day_of_merge() {
        let current = CleanCandidate::new(
            "of January, 2020",
            props(|p| {
                p.extra_tokens = strings(&["of"]);
                p.months = strings(&["January"]);
                p.digits = strings(&["2020"]);
            }),
        );
        let modifier = strings(&["22nd"]);
        let previous = Lookback {
            rejected: true,
            digits_modifier: &modifier,
        };

        let verdict = day_of_merge(&RuleInput {
            candidate: &current,
            previous: Some(previous),
        });
        match verdict {
            Verdict::Rewrite(rewritten) => {
                assert_eq!(rewritten.date_string, "22of January, 2020");
                assert_eq!(rewritten.props.digits_modifier, strings(&["22nd"]));
            }
            other => panic!("expected rewrite, got {:?}", other),
        }

        let accepted = Lookback {
            rejected: false,
            digits_modifier: &modifier,
        };
        assert_eq!(
            day_of_merge(&RuleInput {
                candidate: &current,
                previous: Some(accepted),
            }),
            Verdict::Pass
        );
    }

    #[test]
    fn test_multiple_months() {
        let two = props(|p| {
            p.months = strings(&["January", "February"]);
            p.digits = strings(&["2020"]);
        });
        assert_eq!(run(multiple_months, "January February 2020", two), Verdict::Reject);

        let one = props(|p| p.months = strings(&["January"]));
        assert_eq!(run(multiple_months, "January", one), Verdict::Pass);
    }

    #[test]
    fn test_month_inside_word() {
        let p = props(|p| {
            p.months = strings(&["Mar"]);
            p.extra_tokens = strings(&["t"]);
            p.digits = strings(&["5", "2020"]);
        });
        assert_eq!(run(month_inside_word, "Mart 5, 2020", p.clone()), Verdict::Reject);
        assert_eq!(run(month_inside_word, "Mar t 5, 2020", p), Verdict::Pass);
    }

    #[test]
    fn test_insufficient_evidence() {
        let one_digit = props(|p| p.digits = strings(&["5"]));
        assert_eq!(run(insufficient_evidence, "5", one_digit), Verdict::Reject);

        let ordinal = props(|p| {
            p.digits_modifier = strings(&["5th"]);
        });
        assert_eq!(run(insufficient_evidence, "5th", ordinal), Verdict::Pass);
    }

    #[test]
    fn test_shape_rules() {
        let two = props(|p| p.digits = strings(&["1", "10"]));
        assert_eq!(run(two_small_numbers, "1 10", two), Verdict::Reject);

        let decimal = props(|p| {
            p.digits = strings(&["3", "14"]);
            p.delimiters = strings(&["."]);
        });
        assert_eq!(run(decimal_number, "3.14", decimal), Verdict::Reject);

        let dotted = props(|p| {
            p.digits = strings(&["01", "02", "2003"]);
            p.delimiters = strings(&[".", "."]);
        });
        assert_eq!(run(decimal_number, "01.02.2003", dotted), Verdict::Pass);

        assert_eq!(
            run(number_dot_word, "62. Marquee", DateProps::default()),
            Verdict::Reject
        );

        let fraction_props = props(|p| {
            p.digits = strings(&["1", "2", "3"]);
            p.delimiters = strings(&["/", " "]);
        });
        assert_eq!(run(fraction, "1/2 3", fraction_props), Verdict::Reject);
    }

    #[test]
    fn test_implausible_digit_group() {
        let triple = props(|p| p.digits = strings(&["12", "100"]));
        assert_eq!(run(implausible_digit_group, "12 100", triple), Verdict::Reject);

        let double_zero = props(|p| p.digits = strings(&["0012"]));
        assert_eq!(run(implausible_digit_group, "0012", double_zero), Verdict::Reject);
    }

    #[test]
    fn test_may_rules() {
        let bare = props(|p| p.months = strings(&["may"]));
        assert_eq!(run(bare_may, "may", bare), Verdict::Reject);

        let section = props(|p| {
            p.months = strings(&["may"]);
            p.digits = strings(&["13", "2"]);
            p.delimiters = strings(&[".", " "]);
        });
        assert_eq!(run(may_with_punctuation, "13.2 may", section), Verdict::Reject);

        let real = props(|p| {
            p.months = strings(&["May"]);
            p.digits = strings(&["5", "2020"]);
            p.delimiters = strings(&[" ", ", "]);
        });
        assert_eq!(run(may_with_punctuation, "May 5, 2020", real), Verdict::Pass);
    }

    #[test]
    fn test_strip_extra_tokens() {
        let p = props(|p| {
            p.extra_tokens = strings(&["on", "to", "dated"]);
            p.months = strings(&["June"]);
            p.digits = strings(&["1", "3"]);
        });
        match run(strip_extra_tokens, "dated on June 1 to 3", p) {
            Verdict::Rewrite(cleaned) => {
                assert_eq!(cleaned.date_string, "June 1 to 3");
                assert!(cleaned.props.extra_tokens.is_empty());
            }
            other => panic!("expected rewrite, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_extra_tokens_is_idempotent() {
        let p = props(|p| {
            p.extra_tokens = strings(&["of"]);
            p.months = strings(&["January"]);
            p.digits = strings(&["5", "2020"]);
        });
        let once = match run(strip_extra_tokens, "of January 5, 2020", p) {
            Verdict::Rewrite(cleaned) => cleaned,
            other => panic!("expected rewrite, got {:?}", other),
        };
        let twice = match run(strip_extra_tokens, &once.date_string, once.props.clone()) {
            Verdict::Rewrite(cleaned) => cleaned,
            other => panic!("expected rewrite, got {:?}", other),
        };
        assert_eq!(once, twice);
    }

    #[test]
    fn test_too_long_and_numbers_only() {
        let long = "x".repeat(DATE_MAX_LENGTH + 1);
        assert_eq!(run(too_long, &long, DateProps::default()), Verdict::Reject);

        let spaced = props(|p| {
            p.digits = strings(&["12", "31", "1999"]);
            p.delimiters = strings(&[" ", ", "]);
        });
        assert_eq!(run(numbers_only, "12 31, 1999", spaced), Verdict::Reject);

        let slashed = props(|p| {
            p.digits = strings(&["12", "31", "99"]);
            p.delimiters = strings(&["/", "/"]);
        });
        assert_eq!(run(numbers_only, "12/31/99", slashed), Verdict::Pass);
    }

    #[test]
    fn test_apply_filters_reports_rule() {
        let candidate = Candidate::new(
            "Tuesday",
            0..7,
            props(|p| p.days = strings(&["Tuesday"])),
        );
        match apply_filters(&candidate, None) {
            FilterOutcome::Rejected { rule, .. } => assert_eq!(rule, "weekday_only"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}

use chrono::{Datelike, NaiveDate};

use crate::{
    get_date_annotations, get_dates, DateAnnotator, DateError, DateExtractor, ExtractConfig,
    LocaleError,
};

fn base_config() -> ExtractConfig {
    ExtractConfig::default().with_base_date(
        NaiveDate::from_ymd_opt(2019, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    )
}

fn annotate(text: &str, config: &ExtractConfig) -> Vec<(String, String)> {
    get_date_annotations(text, config)
        .unwrap()
        .into_iter()
        .map(|a| (a.text, a.date.to_string()))
        .collect()
}

#[test]
fn agreement_date() {
    let text = "This Agreement is dated as of January 5, 2020.";
    let annotations = get_date_annotations(text, &ExtractConfig::default()).unwrap();
    assert_eq!(annotations.len(), 1);

    let annotation = &annotations[0];
    assert_eq!(annotation.date.to_string(), "2020-01-05");
    assert_eq!(&text[annotation.coords.clone()], annotation.text);
    assert!(annotation.score >= 0.5);
}

#[test]
fn section_number_followed_by_may() {
    assert_eq!(get_dates("See Section 7.7.10 may apply."), Ok(vec![]));
}

#[test]
fn two_digit_year() {
    let dates = get_dates("12/31/99").unwrap();
    assert_eq!(dates.len(), 1);
    let date = dates[0].date();
    assert_eq!((date.year(), date.month(), date.day()), (1999, 12, 31));
}

#[test]
fn no_date_tokens_no_annotations() {
    for text in [
        "The parties hereto agree as follows.",
        "Due on the date of signing.",
        "",
    ] {
        assert_eq!(get_dates(text), Ok(vec![]), "{:?}", text);
        let extractor = DateExtractor::default();
        assert_eq!(extractor.raw_date_list(text), Ok(vec![]), "{:?}", text);
    }
}

#[test]
fn raising_threshold_never_adds_annotations() {
    let text = "Signed on 12/31/99 and amended on March 3, 2021. \
                Payment due by March 3. See Section 7.7.10 may apply.";
    let counts: Vec<usize> = [0.0, 0.25, 0.5, 0.6, 0.7, 0.8, 0.99]
        .iter()
        .map(|threshold| {
            get_date_annotations(text, &base_config().with_threshold(*threshold))
                .unwrap()
                .len()
        })
        .collect();
    assert!(counts.windows(2).all(|pair| pair[0] >= pair[1]), "{:?}", counts);
    assert_eq!(counts[0], 3);
    assert_eq!(counts[6], 0);
}

#[test]
fn locale_errors_reach_the_caller() {
    let config = ExtractConfig::default().with_locale("fr-FR");
    assert_eq!(
        get_date_annotations("January 5, 2020", &config),
        Err(DateError::Locale(LocaleError::Unsupported {
            identifier: "fr-FR".to_string()
        }))
    );

    let config = ExtractConfig::default().with_locale("en-US-POSIX");
    assert!(matches!(
        get_date_annotations("January 5, 2020", &config),
        Err(DateError::Locale(LocaleError::Malformed { .. }))
    ));
}

#[test]
fn day_first_locale() {
    let config = base_config().with_locale("en-GB");
    assert_eq!(
        annotate("Signed 01/02/2003.", &config),
        vec![("01/02/2003".to_string(), "2003-02-01".to_string())]
    );
}

#[test]
fn partial_date_takes_year_from_base_date() {
    assert_eq!(
        annotate("Payment due by March 3.", &base_config()),
        vec![("t due by March 3".to_string(), "2019-03-03".to_string())]
    );
}

#[test]
fn ordinal_day_before_parenthetical() {
    assert_eq!(
        annotate(
            "on the 22nd (twenty-second) day of January, 2020",
            &base_config()
        ),
        vec![("day of January, 2020".to_string(), "2020-01-22".to_string())]
    );
}

#[test]
fn strict_mode_requires_complete_dates() {
    let text = "Signed on 12/31/99, effective March 2021.";
    assert_eq!(annotate(text, &base_config()).len(), 2);
    assert_eq!(
        annotate(text, &base_config().with_strict(true)),
        vec![("on 12/31/99".to_string(), "1999-12-31".to_string())]
    );
}

#[test]
fn dates_iterator_is_lazy_and_restartable() {
    let annotator = DateAnnotator::new(base_config()).unwrap();
    let text = "Signed on 12/31/99 and amended on March 3, 2021.";

    let first = annotator.dates(text).next().unwrap().unwrap();
    assert_eq!(first.to_string(), "1999-12-31");

    let all = annotator.date_list(text).unwrap();
    assert_eq!(
        all.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["1999-12-31", "2021-03-03"]
    );
}

//! Classifier-scored date annotations.

use std::ops::Range;

use layered_date_finder::{CandidateLocator, DateFinder, DateValue};
use serde::Serialize;
use tracing::debug;

use crate::classifier::{default_model, DateClassifier, LogisticModel};
use crate::extract::{DateExtractor, RawDates};
use crate::features::extract_features;
use crate::{DateResult, ExtractConfig};

/// A date accepted by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateAnnotation {
    /// Byte range of the date in the source text.
    pub coords: Range<usize>,
    /// The source text at `coords`.
    pub text: String,
    pub date: DateValue,
    /// Classifier probability, at least the configured threshold.
    pub score: f64,
}

/// Extracts dates and keeps those the classifier believes in.
#[derive(Debug, Clone)]
pub struct DateAnnotator<L = DateFinder, C = &'static LogisticModel> {
    extractor: DateExtractor<L>,
    classifier: C,
}

impl DateAnnotator {
    /// Annotator with the default locator and the bundled model.
    pub fn new(config: ExtractConfig) -> DateResult<Self> {
        Self::with_parts(DateExtractor::new(config), default_model()?)
    }
}

impl<L: CandidateLocator, C: DateClassifier> DateAnnotator<L, C> {
    pub fn with_parts(extractor: DateExtractor<L>, classifier: C) -> DateResult<Self> {
        extractor.config().validate()?;
        Ok(Self {
            extractor,
            classifier,
        })
    }

    pub fn extractor(&self) -> &DateExtractor<L> {
        &self.extractor
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Lazily annotate `text`, in document order.
    pub fn annotations<'a>(&'a self, text: &'a str) -> Annotations<'a, L, C> {
        Annotations {
            raw: self.extractor.raw_dates(text),
            text,
            classifier: &self.classifier,
            threshold: self.extractor.config().threshold,
        }
    }

    /// Only the dates of [`DateAnnotator::annotations`].
    pub fn dates<'a>(&'a self, text: &'a str) -> impl Iterator<Item = DateResult<DateValue>> + 'a {
        self.annotations(text)
            .map(|annotation| annotation.map(|a| a.date))
    }

    /// Dates paired with their byte range in `text`.
    pub fn dates_with_source<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = DateResult<(DateValue, Range<usize>)>> + 'a {
        self.annotations(text)
            .map(|annotation| annotation.map(|a| (a.date, a.coords)))
    }

    pub fn date_list(&self, text: &str) -> DateResult<Vec<DateValue>> {
        self.dates(text).collect()
    }
}

/// Iterator returned by [`DateAnnotator::annotations`].
pub struct Annotations<'a, L, C> {
    raw: RawDates<'a, L>,
    text: &'a str,
    classifier: &'a C,
    threshold: f64,
}

impl<'a, L: CandidateLocator, C: DateClassifier> Iterator for Annotations<'a, L, C> {
    type Item = DateResult<DateAnnotation>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.raw.next()? {
                Ok(raw) => raw,
                Err(error) => return Some(Err(error)),
            };

            let features = extract_features(
                self.text,
                raw.span.clone(),
                self.classifier.feature_config(),
            );
            let score = self.classifier.score(&features);
            let text = &self.text[raw.span.clone()];
            debug!(text, date = %raw.value, score, "scored date");

            if score >= self.threshold {
                return Some(Ok(DateAnnotation {
                    coords: raw.span,
                    text: text.to_string(),
                    date: raw.value,
                    score,
                }));
            }
        }
    }
}

/// Annotate `text` with the default locator and the bundled model.
pub fn get_date_annotations(text: &str, config: &ExtractConfig) -> DateResult<Vec<DateAnnotation>> {
    let annotator = DateAnnotator::new(config.clone())?;
    let annotations = annotator.annotations(text).collect();
    annotations
}

/// Dates in `text` under the default configuration.
pub fn get_dates(text: &str) -> DateResult<Vec<DateValue>> {
    let annotations = get_date_annotations(text, &ExtractConfig::default())?;
    Ok(annotations.into_iter().map(|a| a.date).collect())
}

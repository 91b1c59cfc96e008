//! Feature vectors describing the text around a candidate date.
//!
//! Columns come in a fixed order: one `char_<c>` per tracked character, then
//! one `bigram_<c1><c2>` per ordered pair of distinct tracked characters,
//! then the four word-shape counts `nb31`, `na31`, `wr_l` and `wr_u`. A
//! classifier trained on one [`FeatureConfig`] only makes sense for vectors
//! built with the same configuration.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Tracked characters used by the bundled model.
pub const DEFAULT_CHARACTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-/.,: $%#";

/// Names of the word-shape columns, in order.
pub const WORD_SHAPE_COLUMNS: [&str; 4] = ["nb31", "na31", "wr_l", "wr_u"];

static WORD_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\-\.\[\]\{\}\(\),;:\+\\/]+").expect("word separator is a valid regex")
});

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+").expect("leading number is a valid regex"));

/// How feature vectors are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Every character counted in the context window, in column order.
    pub characters: String,
    /// Characters that start a word for word-shape counting. `None` accepts
    /// any alphabetic character.
    pub alphabet: Option<String>,
    /// Characters of context taken on each side of the candidate.
    pub window: usize,
    pub include_bigrams: bool,
    /// Turn counts into proportions, separately per column family.
    pub norm: bool,
    pub count_words: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            characters: DEFAULT_CHARACTERS.to_string(),
            alphabet: None,
            window: 5,
            include_bigrams: true,
            norm: true,
            count_words: false,
        }
    }
}

impl FeatureConfig {
    /// Reject configurations that cannot produce a consistent layout.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.characters.is_empty() {
            return Err(ModelError::InvalidFeatures {
                message: "no tracked characters".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for c in self.characters.chars() {
            if !seen.insert(c) {
                return Err(ModelError::InvalidFeatures {
                    message: format!("tracked character {:?} appears twice", c),
                });
            }
        }
        Ok(())
    }

    fn tracked(&self) -> Vec<char> {
        self.characters.chars().collect()
    }

    fn bigram_count(&self) -> usize {
        if self.include_bigrams {
            let n = self.characters.chars().count();
            n * n.saturating_sub(1)
        } else {
            0
        }
    }

    /// Number of columns in a vector built with this configuration.
    pub fn width(&self) -> usize {
        let words = if self.count_words {
            WORD_SHAPE_COLUMNS.len()
        } else {
            0
        };
        self.characters.chars().count() + self.bigram_count() + words
    }

    /// Column names in canonical order.
    pub fn columns(&self) -> Vec<String> {
        let tracked = self.tracked();
        let mut columns = Vec::with_capacity(self.width());
        columns.extend(tracked.iter().map(|c| format!("char_{}", c)));
        if self.include_bigrams {
            for first in &tracked {
                for second in tracked.iter().filter(|c| *c != first) {
                    columns.push(format!("bigram_{}{}", first, second));
                }
            }
        }
        if self.count_words {
            columns.extend(WORD_SHAPE_COLUMNS.iter().map(|c| c.to_string()));
        }
        columns
    }

    fn starts_word(&self, c: char) -> bool {
        match &self.alphabet {
            Some(alphabet) => alphabet.contains(c),
            None => c.is_alphabetic(),
        }
    }
}

/// Feature values in the canonical column order of their [`FeatureConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
    char_count: usize,
    bigram_count: usize,
}

impl FeatureVector {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `char_*` columns.
    pub fn chars(&self) -> &[f64] {
        &self.values[..self.char_count]
    }

    /// The `bigram_*` columns.
    pub fn bigrams(&self) -> &[f64] {
        &self.values[self.char_count..self.char_count + self.bigram_count]
    }

    /// The word-shape columns, empty unless word counting is enabled.
    pub fn word_shapes(&self) -> &[f64] {
        &self.values[self.char_count + self.bigram_count..]
    }
}

/// Byte range of `span` widened by `window` characters on each side.
fn context_window(text: &str, span: &Range<usize>, window: usize) -> Range<usize> {
    let start = if window == 0 {
        span.start
    } else {
        text[..span.start]
            .char_indices()
            .rev()
            .take(window)
            .last()
            .map_or(span.start, |(ix, _)| ix)
    };
    let end = text[span.end..]
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(ix, _)| span.end + ix);
    start..end
}

fn normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        for value in values.iter_mut() {
            *value /= sum;
        }
    }
}

fn is_lowercase_form(c: char) -> bool {
    c.to_lowercase().eq(std::iter::once(c))
}

/// Counts of small numbers, large numbers, lowercase words and capitalized
/// words in the candidate text.
fn word_shapes(date_text: &str, config: &FeatureConfig) -> [f64; 4] {
    let mut shapes = [0.0; 4];
    for word in WORD_SEPARATOR.split(date_text).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        let first = match chars.next() {
            Some(first) => first,
            None => continue,
        };

        if config.starts_word(first) {
            let capitalized = chars
                .next()
                .map_or(false, |second| !is_lowercase_form(first) && is_lowercase_form(second));
            if capitalized {
                shapes[3] += 1.0;
            } else {
                shapes[2] += 1.0;
            }
            continue;
        }

        if let Some(number) = LEADING_NUMBER.find(word) {
            let small = number.as_str().parse::<u64>().map_or(false, |n| n < 31);
            if small {
                shapes[0] += 1.0;
            } else {
                shapes[1] += 1.0;
            }
        }
    }
    shapes
}

/// Build the feature vector for the candidate at `span` in `text`.
///
/// `span` is a byte range on char boundaries. The context window extends
/// `config.window` characters past each end of it and is trimmed of
/// surrounding whitespace before counting.
pub fn extract_features(text: &str, span: Range<usize>, config: &FeatureConfig) -> FeatureVector {
    let tracked = config.tracked();
    let index: HashMap<char, usize> = tracked.iter().enumerate().map(|(i, c)| (*c, i)).collect();
    let n = tracked.len();
    let bigram_count = config.bigram_count();

    let mut values = vec![0.0; config.width()];
    let window: Vec<char> = text[context_window(text, &span, config.window)]
        .trim()
        .chars()
        .collect();

    for c in &window {
        if let Some(&i) = index.get(c) {
            values[i] += 1.0;
        }
    }

    if config.include_bigrams {
        for pair in window.windows(2) {
            if let (Some(&i), Some(&j)) = (index.get(&pair[0]), index.get(&pair[1])) {
                if i != j {
                    let inner = if j < i { j } else { j - 1 };
                    values[n + i * (n - 1) + inner] += 1.0;
                }
            }
        }
    }

    if config.norm {
        normalize(&mut values[..n]);
        normalize(&mut values[n..n + bigram_count]);
    }

    if config.count_words {
        let mut shapes = word_shapes(&text[span], config);
        if config.norm {
            normalize(&mut shapes);
        }
        values[n + bigram_count..].copy_from_slice(&shapes);
    }

    FeatureVector {
        values,
        char_count: n,
        bigram_count,
    }
}

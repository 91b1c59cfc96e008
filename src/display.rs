use std::fmt::{self, Write};

use unicode_width::UnicodeWidthChar;

use crate::DateAnnotation;

/// Renders annotations under the line of text they were found in.
///
/// ```text
/// Signed on 12/31/99 and amended on March 3, 2021.
///        ╰─────────╯1999-12-31
///                                ╰──────────────╯2021-03-03
/// ```
pub struct AnnotationDisplay<'a> {
    text: &'a str,
    annotations: Vec<&'a DateAnnotation>,
    show_scores: bool,
}

impl<'a> AnnotationDisplay<'a> {
    pub fn new(text: &'a str) -> Self {
        AnnotationDisplay {
            text,
            annotations: Vec::new(),
            show_scores: false,
        }
    }

    pub fn include(&mut self, annotation: &'a DateAnnotation) {
        self.annotations.push(annotation);
    }

    /// Takes self
    pub fn with(mut self, annotations: impl IntoIterator<Item = &'a DateAnnotation>) -> Self {
        for annotation in annotations {
            self.include(annotation);
        }
        self
    }

    /// Append each classifier score after its date.
    pub fn with_scores(mut self) -> Self {
        self.show_scores = true;
        self
    }
}

/// Display width of `text` with line breaks and tabs shown as single spaces.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if c.is_whitespace() { 1 } else { c.width().unwrap_or(0) })
        .sum()
}

impl<'a> fmt::Display for AnnotationDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.text.chars() {
            f.write_char(if c.is_whitespace() { ' ' } else { c })?;
        }

        for annotation in self.annotations.iter() {
            f.write_char('\n')?;

            let start = display_width(&self.text[..annotation.coords.start]);
            let end = display_width(&self.text[..annotation.coords.end]);
            for _ in 0..start {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (start + 1)..end.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end - start > 1 {
                f.write_char('╯')?;
            }

            write!(f, "{}", annotation.date)?;
            if self.show_scores {
                write!(f, " ({:.2})", annotation.score)?;
            }
        }

        Ok(())
    }
}

#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Candidate date location for layered-dates.
//!
//! This crate finds substrings of free text that *might* be dates and
//! resolves cleaned date strings into calendar values. It makes no attempt
//! to decide whether a candidate is a real date; that is the job of the
//! filter chain and classifier in `layered-dates`.
//!
//! ## Usage
//!
//! ```
//! use layered_date_finder::{CandidateLocator, DateFinder, Locale};
//!
//! let finder = DateFinder::default();
//! let candidates = finder.extract_candidates("Signed on 12/31/99.", false);
//! assert_eq!(candidates[0].raw, "on 12/31/99");
//!
//! let resolved = finder
//!     .resolve("12/31/99", &candidates[0].props, &Locale::en_us())
//!     .unwrap();
//! assert_eq!(resolved.to_value().unwrap().to_string(), "1999-12-31");
//! ```

mod candidate;
mod errors;
mod locale;
mod locator;
mod resolve;
mod tokens;

pub use candidate::{Candidate, DateProps};
pub use errors::ParseError;
pub use locale::{DateOrder, Locale, LocaleError};
pub use locator::{start_of_current_year, CandidateLocator, DateFinder};
pub use resolve::{expand_two_digit_year, resolve_date_string, DateValue, ResolvedDate};
pub use tokens::{month_by_name, EN_MONTHS};

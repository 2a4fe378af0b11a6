//! Shared parsing rules for the extraction backends.

pub mod numbers;
pub mod patterns;

pub use numbers::{format_locale_number, normalize, parse_locale_number};
pub use patterns::{collapse_whitespace, first_capture};

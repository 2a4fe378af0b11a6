//! Common regex patterns shared by the layout parser and the extractors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of whitespace, including non-breaking spaces.
    pub static ref WHITESPACE: Regex = Regex::new(r"[\s\u{00a0}\u{202f}]+").unwrap();
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Value of a pattern match: the first capture group, or the whole match
/// for patterns without groups. A group that did not take part in the match
/// yields `None`.
pub fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    let caps = re.captures(text)?;
    let group = if re.captures_len() == 1 { 0 } else { 1 };
    caps.get(group).map(|m| m.as_str())
}

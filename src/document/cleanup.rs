//! Post-processing and cleanup utilities
//!
//! Helpers for normalizing extracted text and for slicing raw document text
//! at arbitrary byte offsets.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static EBD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^E_(\d{1,4})_").unwrap());

static BASED_ON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)basiert\s+auf\s+strom\s+ebd\s*[,:]\s*E_(\d{1,4})_").unwrap());

/// Collapse whitespace runs to a single space and trim.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Parse the `E_dddd` key from the start of a title, zero-padded to four
/// digits.
pub(crate) fn parse_ebd_code(title: &str) -> Option<String> {
    let caps = EBD_CODE.captures(title)?;
    let digits = caps.get(1)?.as_str();
    Some(format!("E_{digits:0>4}"))
}

/// Parse a `Basiert auf Strom EBD: E_dddd_…` reference into the referenced
/// EBD code, zero-padded like [`parse_ebd_code`].
pub(crate) fn parse_based_on(text: &str) -> Option<String> {
    let caps = BASED_ON.captures(text)?;
    let digits = caps.get(1)?.as_str();
    Some(format!("E_{digits:0>4}"))
}

/// Largest char boundary not above `index`, clamped to the text length.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut index = index;
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

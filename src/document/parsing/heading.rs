//! Record assembly from located anchors
//!
//! Turns each [`Anchor`] into a [`Record`]: the heading paragraph is parsed
//! on its own to get the title, and the paragraph id closest to the role
//! announcement becomes the record's identifier. Paragraphs between the
//! heading and the table may name the EBD the record is based on.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::super::cleanup::{
    floor_char_boundary, normalize_whitespace, parse_based_on, parse_ebd_code,
};
use super::super::models::*;
use super::super::tree::{ParseOptions, parse_fragment};
use super::anchor::Anchor;
use super::text::collect_text;

pub(crate) const PARAGRAPH_ID_ATTRIBUTE: &str = "w14:paraId";

static PARAGRAPH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"w14:paraId="([^"]+)""#).unwrap());

/// Build one record per anchor, in anchor order.
pub(crate) fn assemble_records(text: &str, anchors: &[Anchor], identifier_slack: usize) -> Vec<Record> {
    anchors
        .iter()
        .map(|anchor| assemble_record(text, anchor, identifier_slack))
        .collect()
}

pub(crate) fn assemble_record(text: &str, anchor: &Anchor, identifier_slack: usize) -> Record {
    let title = heading_title(text, anchor);
    let id = closest_paragraph_id(text, anchor, identifier_slack)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let ebd_code = parse_ebd_code(&title);
    let based_on = based_on(text, anchor);

    debug!(%id, role = %anchor.role, %title, ?based_on, "assembled record");
    Record {
        id,
        title,
        role: anchor.role,
        ebd_code,
        based_on,
    }
}

/// Normalized text of the anchor's heading paragraph.
fn heading_title(text: &str, anchor: &Anchor) -> String {
    let Some(fragment) = text.get(anchor.heading.clone()) else {
        warn!(heading = ?anchor.heading, "heading bounds do not fall on character boundaries");
        return UNREADABLE_TITLE.to_string();
    };
    match parse_fragment(fragment, &ParseOptions::default()) {
        Ok(tree) => normalize_whitespace(&collect_text(&tree)),
        Err(e) => {
            warn!(heading = ?anchor.heading, error = %e, "could not parse heading paragraph");
            UNREADABLE_TITLE.to_string()
        }
    }
}

/// EBD code from a `Basiert auf Strom EBD` line between the heading
/// paragraph and the table.
fn based_on(text: &str, anchor: &Anchor) -> Option<String> {
    let gap = text.get(anchor.heading.end..anchor.table_open)?;
    if gap.trim().is_empty() {
        return None;
    }
    match parse_fragment(gap, &ParseOptions::default()) {
        Ok(tree) => parse_based_on(&normalize_whitespace(&collect_text(&tree))),
        // Unbalanced markup in the gap, scan the raw text instead
        Err(_) => parse_based_on(gap),
    }
}

/// Last paragraph id between the table open marker and a little past the
/// role announcement. Later ids are nearer the role line than the table's
/// first row.
fn closest_paragraph_id(text: &str, anchor: &Anchor, identifier_slack: usize) -> Option<String> {
    let end = floor_char_boundary(text, anchor.announcement.end.saturating_add(identifier_slack));
    let window = text.get(anchor.table_open..end)?;
    PARAGRAPH_ID
        .captures_iter(window)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

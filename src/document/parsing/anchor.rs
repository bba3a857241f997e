//! Anchor location in raw document text
//!
//! EBD tables carry no markup of their own. Each one announces its checking
//! role in a line such as `Prüfende Rolle: NB` inside the table, and the
//! table is preceded by a level 3 heading holding the EBD title. This module
//! finds those pieces by byte offset in the raw `word/document.xml` text,
//! before any tree is built.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::{debug, warn};

use super::super::models::Role;

pub(crate) const TABLE_OPEN: &[&str] = &["<w:tbl>", "<w:tbl "];
pub(crate) const TABLE_CLOSE: &str = "</w:tbl>";
pub(crate) const PARAGRAPH_OPEN: &[&str] = &["<w:p ", "<w:p>"];
pub(crate) const PARAGRAPH_CLOSE: &str = "</w:p>";

/// Role announcement followed by one of the known role codes.
static ROLE_ANNOUNCEMENT: Lazy<Regex> = Lazy::new(|| {
    let codes: Vec<String> = Role::ALL
        .iter()
        .map(|role| regex::escape(role.code()))
        .collect();
    Regex::new(&format!(
        r"(?i)pr(?:ü|ue|u)fende\s+rolle\s*[:,;.\-]?\s*({})\b",
        codes.join("|")
    ))
    .unwrap()
});

/// Paragraph style of a level 3 heading. Word writes the German style id
/// without its umlaut (`berschrift3`), hand-edited files keep it.
static HEADING_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<w:pStyle\s+w:val="(?:Ü?berschrift3|Heading3)""#).unwrap());

/// Sorted byte offsets of every occurrence of one marker kind.
#[derive(Debug, Clone, Default)]
pub(crate) struct MarkerIndex {
    offsets: Vec<usize>,
}

impl MarkerIndex {
    /// Index all spellings of a literal marker. Spellings are listed in
    /// priority order, which only matters for matches at the same offset.
    pub(crate) fn literal(text: &str, spellings: &[&str]) -> Self {
        let mut offsets: Vec<usize> = spellings
            .iter()
            .flat_map(|spelling| text.match_indices(spelling).map(|(offset, _)| offset))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();
        Self { offsets }
    }

    pub(crate) fn pattern(text: &str, pattern: &Regex) -> Self {
        Self {
            offsets: pattern.find_iter(text).map(|m| m.start()).collect(),
        }
    }

    /// Nearest occurrence strictly before `position`.
    pub(crate) fn nearest_before(&self, position: usize) -> Option<usize> {
        let idx = self.offsets.partition_point(|&offset| offset < position);
        idx.checked_sub(1).map(|i| self.offsets[i])
    }
}

/// A role announcement resolved to its table and heading paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub role: Role,
    /// Byte range of the role announcement
    pub announcement: Range<usize>,
    /// Offset of the owning table's open marker
    pub table_open: usize,
    /// Offset of the heading style marker
    pub heading_style: usize,
    /// Byte range of the heading paragraph, close marker included
    pub heading: Range<usize>,
}

/// Locate every resolvable anchor whose role is in `roles`, in document
/// order.
pub fn locate_anchors(text: &str, roles: &[Role]) -> Vec<Anchor> {
    let tables = MarkerIndex::literal(text, TABLE_OPEN);
    let headings = MarkerIndex::pattern(text, &HEADING_STYLE);
    let paragraphs = MarkerIndex::literal(text, PARAGRAPH_OPEN);

    let mut anchors = Vec::new();
    for caps in ROLE_ANNOUNCEMENT.captures_iter(text) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(role) = code.as_str().parse::<Role>() else {
            continue;
        };
        if !roles.contains(&role) {
            debug!(offset = whole.start(), %role, "role not in configured vocabulary");
            continue;
        }

        let Some(table_open) = tables.nearest_before(whole.start()) else {
            debug!(offset = whole.start(), "role announcement outside any table");
            continue;
        };
        let Some(heading_style) = headings.nearest_before(table_open) else {
            warn!(
                offset = whole.start(),
                table_open, "no level 3 heading before table, skipping role announcement"
            );
            continue;
        };
        let Some(heading) = paragraph_bounds(text, &paragraphs, heading_style) else {
            debug!(heading_style, "heading style outside a complete paragraph");
            continue;
        };

        anchors.push(Anchor {
            role,
            announcement: whole.range(),
            table_open,
            heading_style,
            heading,
        });
    }
    anchors
}

/// Enclosing paragraph of `position`: nearest open marker before it up to
/// the end of the first close marker after it.
fn paragraph_bounds(text: &str, paragraphs: &MarkerIndex, position: usize) -> Option<Range<usize>> {
    let start = paragraphs.nearest_before(position)?;
    let close = text.get(position..)?.find(PARAGRAPH_CLOSE)?;
    Some(start..position + close + PARAGRAPH_CLOSE.len())
}

//! EBD table segmentation
//!
//! An EBD table lists each check step on one row (number, question, first
//! outcome, first code) followed by rows for further outcomes that leave the
//! step columns empty, and sometimes by narrow three-cell rows that only
//! carry a result code. Nothing in the markup ties those rows together, so
//! the nesting is rebuilt from cell counts and which cells are filled.

use std::ops::Range;
use tracing::{debug, warn};

use super::super::models::*;
use super::super::tree::{Node, ParseOptions, parse_fragment};
use super::anchor::{MarkerIndex, TABLE_CLOSE, TABLE_OPEN};
use super::heading::PARAGRAPH_ID_ATTRIBUTE;
use super::text::{TEXT_LEAF, collect_text};

/// Tags forced into lists so rows and cells can be indexed by position.
const POSITIONAL_TAGS: [&str; 4] = ["w:tr", "w:tc", "w:r", TEXT_LEAF];

/// Extract the check steps of `record` from the raw document text.
///
/// Returns an empty list when the record's identifier does not occur in the
/// text or its table cannot be parsed.
pub(crate) fn segment_table(text: &str, record: &Record, header_rows: usize) -> Vec<Step> {
    let Some(range) = locate_table(text, &record.id) else {
        debug!(id = %record.id, "identifier not found in document, no steps");
        return Vec::new();
    };

    let options = ParseOptions::with_lists(POSITIONAL_TAGS);
    let tree = match parse_fragment(&text[range.clone()], &options) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(id = %record.id, table = ?range, error = %e, "could not parse EBD table");
            return Vec::new();
        }
    };

    let rows = table_rows(&tree);
    let steps = rows
        .iter()
        .skip(header_rows)
        .map(row_cells)
        .fold(StepAccumulator::default(), |acc, cells| acc.push_row(&cells))
        .finish();

    debug!(id = %record.id, rows = rows.len(), steps = steps.len(), "segmented table");
    steps
}

/// Byte range of the table holding the first occurrence of `id`, from its
/// open marker to the end of the first close marker after the id.
fn locate_table(text: &str, id: &str) -> Option<Range<usize>> {
    let needle = format!(r#"{PARAGRAPH_ID_ATTRIBUTE}="{id}""#);
    let position = text.find(&needle)?;
    let start = MarkerIndex::literal(&text[..position], TABLE_OPEN).nearest_before(position)?;
    let close = text[position..].find(TABLE_CLOSE)?;
    Some(start..position + close + TABLE_CLOSE.len())
}

fn table_rows(tree: &Node) -> &[Node] {
    tree.get("w:tbl")
        .and_then(|table| table.get("w:tr"))
        .map(Node::items)
        .unwrap_or_default()
}

fn row_cells(row: &Node) -> Vec<String> {
    row.get("w:tc")
        .map(Node::items)
        .unwrap_or_default()
        .iter()
        .map(|cell| collect_text(cell).trim().to_string())
        .collect()
}

/// Row-by-row state of the step/result reconstruction
#[derive(Debug, Default)]
pub(crate) struct StepAccumulator {
    steps: Vec<Step>,
    current: Option<Step>,
}

impl StepAccumulator {
    /// Classify one row by its trimmed cell texts.
    pub(crate) fn push_row(mut self, cells: &[String]) -> Self {
        match cells {
            [number, description, result, code, ..] => {
                if !number.is_empty() {
                    self.flush();
                    let mut step = Step::new(number.as_str(), description.as_str());
                    step.results.extend(CheckResult::new(result.as_str(), code.as_str()));
                    self.current = Some(step);
                } else if let Some(step) = self.current.as_mut() {
                    // A lone description in cell 1 is dropped
                    step.results.extend(CheckResult::new(result.as_str(), code.as_str()));
                }
            }
            [_, _, code] => {
                if let Some(step) = self.current.as_mut() {
                    backfill_code(step, code);
                }
            }
            _ => {}
        }
        self
    }

    pub(crate) fn finish(mut self) -> Vec<Step> {
        self.flush();
        self.steps
    }

    fn flush(&mut self) {
        if let Some(step) = self.current.take() {
            self.steps.push(step);
        }
    }
}

/// Put a code from a three-cell row on the step's last result, or on a new
/// result when the last one already has a code.
fn backfill_code(step: &mut Step, code: &str) {
    if code.is_empty() {
        return;
    }
    match step.results.last_mut() {
        Some(last) if last.code.is_empty() => last.code = code.to_string(),
        _ => step.results.extend(CheckResult::new("", code)),
    }
}

//! Extraction search and navigation operations
//!
//! This module provides read-only querying operations on extraction results,
//! including full-text search and outline generation.

use super::models::*;

pub fn search_extraction(extraction: &Extraction, query: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();
    if query.trim().is_empty() {
        return results;
    }
    let query_lower = query.to_lowercase();

    let mut push_match = |record_index: usize, location: MatchLocation, text: &str| {
        if let Some((start_pos, end_pos)) = find_ignore_case(text, &query_lower) {
            results.push(SearchResult {
                record_index,
                location,
                text: text.to_string(),
                start_pos,
                end_pos,
            });
        }
    };

    for (record_index, record) in extraction.records.iter().enumerate() {
        push_match(record_index, MatchLocation::Title, &record.title);

        for (step_index, step) in extraction.steps_for(record).iter().enumerate() {
            push_match(
                record_index,
                MatchLocation::StepDescription { step: step_index },
                &step.description,
            );
            for (result_index, result) in step.results.iter().enumerate() {
                push_match(
                    record_index,
                    MatchLocation::ResultDescription {
                        step: step_index,
                        result: result_index,
                    },
                    &result.description,
                );
                push_match(
                    record_index,
                    MatchLocation::ResultCode {
                        step: step_index,
                        result: result_index,
                    },
                    &result.code,
                );
            }
        }
    }

    results
}

/// Byte range in `text` of the first span whose lowercase form is
/// `query_lower`. Lowercasing can change byte lengths, so offsets are taken
/// from the original text.
fn find_ignore_case(text: &str, query_lower: &str) -> Option<(usize, usize)> {
    text.char_indices().find_map(|(start, _)| {
        let mut lowered = String::new();
        for (offset, c) in text[start..].char_indices() {
            lowered.extend(c.to_lowercase());
            if !query_lower.starts_with(lowered.as_str()) {
                return None;
            }
            if lowered.len() == query_lower.len() {
                return Some((start, start + offset + c.len_utf8()));
            }
        }
        None
    })
}

pub fn generate_outline(extraction: &Extraction) -> Vec<OutlineItem> {
    extraction
        .records
        .iter()
        .enumerate()
        .map(|(record_index, record)| {
            let title = match &record.ebd_code {
                Some(code) if !record.title.starts_with(code.as_str()) => {
                    format!("{code} {}", record.title)
                }
                _ => record.title.clone(),
            };
            OutlineItem {
                title,
                role: record.role,
                step_count: extraction.steps_for(record).len(),
                record_index,
            }
        })
        .collect()
}

pub fn records_for_role(extraction: &Extraction, role: Role) -> Vec<&Record> {
    extraction
        .records
        .iter()
        .filter(|record| record.role == role)
        .collect()
}

//! Rendering of extraction results
//!
//! Plain text, Markdown and JSON views of an [`Extraction`], as used by the
//! `--export` flag of the CLI.

use anyhow::Result;
use std::fmt::Write;

use crate::document::{CheckResult, Extraction, Record, Step};
use crate::ExportFormat;

pub fn export_extraction(extraction: &Extraction, format: &ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => export_to_json(extraction),
        ExportFormat::Text => Ok(export_to_text(extraction)),
        ExportFormat::Markdown => Ok(export_to_markdown(extraction)),
    }
}

pub fn export_to_json(extraction: &Extraction) -> Result<String> {
    Ok(serde_json::to_string_pretty(extraction)?)
}

pub fn export_to_text(extraction: &Extraction) -> String {
    let mut out = String::new();

    for record in &extraction.records {
        let _ = writeln!(out, "{} [{}] ({})", record.title, record.role, record.id);
        for step in extraction.steps_for(record) {
            let _ = writeln!(out, "  {} {}", step.step_nr, step.description);
            for result in &step.results {
                match (result.description.is_empty(), result.code.is_empty()) {
                    (false, false) => {
                        let _ = writeln!(out, "    - {} -> {}", result.description, result.code);
                    }
                    (false, true) => {
                        let _ = writeln!(out, "    - {}", result.description);
                    }
                    _ => {
                        let _ = writeln!(out, "    -> {}", result.code);
                    }
                }
            }
        }
        out.push('\n');
    }

    out
}

pub fn export_to_markdown(extraction: &Extraction) -> String {
    let mut out = String::new();

    for record in &extraction.records {
        let _ = writeln!(out, "## {}\n", escape_markdown(&record.title));
        let _ = writeln!(out, "Prüfende Rolle: **{}**\n", record.role);
        if let Some(based_on) = &record.based_on {
            let _ = writeln!(out, "Basiert auf: {}\n", escape_markdown(based_on));
        }
        write_step_table(&mut out, record, extraction.steps_for(record));
        out.push('\n');
    }

    out
}

fn write_step_table(out: &mut String, record: &Record, steps: &[Step]) {
    if steps.is_empty() {
        let _ = writeln!(out, "_No check steps found for {}._", record.id);
        return;
    }

    out.push_str("| Nr | Prüfschritt | Prüfergebnis | Code |\n");
    out.push_str("|----|-------------|--------------|------|\n");
    for step in steps {
        // Steps without results still get one row
        let rows: Vec<Option<&CheckResult>> = if step.results.is_empty() {
            vec![None]
        } else {
            step.results.iter().map(Some).collect()
        };
        for (row_index, result) in rows.into_iter().enumerate() {
            let (number, description) = if row_index == 0 {
                (escape_cell(&step.step_nr), escape_cell(&step.description))
            } else {
                (String::new(), String::new())
            };
            let (outcome, code) = result
                .map(|r| (escape_cell(&r.description), escape_cell(&r.code)))
                .unwrap_or_default();
            let _ = writeln!(out, "| {number} | {description} | {outcome} | {code} |");
        }
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn escape_markdown(text: &str) -> String {
    text.replace('_', "\\_")
}

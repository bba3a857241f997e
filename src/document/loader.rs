//! Extraction orchestration
//!
//! This module contains the entry points that run the parsing stages over
//! one document:
//! 1. Read `word/document.xml` out of the container and decode it
//! 2. Locate role announcements and resolve them to heading/table anchors
//! 3. Assemble one record per anchor
//! 4. Segment each record's table into steps and results

use anyhow::{Context, Result};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::error::ExtractError;

use super::io::{read_document_xml, validate_docx_file};
use super::models::*;
use super::parsing::anchor::locate_anchors;
use super::parsing::heading::assemble_records;
use super::parsing::table::segment_table;

/// Top-level entry point on raw container bytes.
///
/// Every failure, including a panic inside the extraction, is reported as a
/// plain description string.
pub fn handle_word_file(bytes: &[u8]) -> std::result::Result<Extraction, String> {
    let config = ExtractorConfig::default();
    match panic::catch_unwind(AssertUnwindSafe(|| extract_document(bytes, &config))) {
        Ok(Ok(extraction)) => Ok(extraction),
        Ok(Err(ExtractError::MissingDocumentBody)) => {
            Err(ExtractError::MissingDocumentBody.to_string())
        }
        Ok(Err(e)) => Err(format!("Error: {e}")),
        Err(payload) => Err(format!("Error: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "extraction panicked".to_string()
    }
}

/// Extract all records and their steps from `.docx` container bytes.
pub fn extract_document(
    bytes: &[u8],
    config: &ExtractorConfig,
) -> std::result::Result<Extraction, ExtractError> {
    let text = read_document_xml(bytes)?;
    Ok(extract_from_text(&text, config))
}

/// Extract all records and their steps from decoded document text.
pub fn extract_from_text(text: &str, config: &ExtractorConfig) -> Extraction {
    let records = extract_records_with_config(text, config);
    let mut steps = StepsById::new();
    for record in &records {
        steps.insert(
            record.id.clone(),
            extract_steps_with_config(text, record, config),
        );
    }
    debug!(records = records.len(), "extraction finished");
    Extraction { records, steps }
}

/// Records of a decoded document, in document order.
pub fn extract_records(text: &str) -> Vec<Record> {
    extract_records_with_config(text, &ExtractorConfig::default())
}

pub fn extract_records_with_config(text: &str, config: &ExtractorConfig) -> Vec<Record> {
    let anchors = locate_anchors(text, &config.roles);
    assemble_records(text, &anchors, config.identifier_slack)
}

/// Steps of one record, found again by its identifier.
pub fn extract_steps(text: &str, record: &Record) -> Vec<Step> {
    extract_steps_with_config(text, record, &ExtractorConfig::default())
}

pub fn extract_steps_with_config(text: &str, record: &Record, config: &ExtractorConfig) -> Vec<Step> {
    segment_table(text, record, config.header_rows)
}

/// Validate, read and extract a `.docx` file.
pub async fn load_extraction(file_path: &Path, config: &ExtractorConfig) -> Result<Extraction> {
    // Validate file type before attempting to read
    validate_docx_file(file_path)?;

    let file_data = tokio::fs::read(file_path)
        .await
        .with_context(|| format!("failed to read {}", file_path.display()))?;

    let extraction = extract_document(&file_data, config)
        .with_context(|| format!("failed to extract EBDs from {}", file_path.display()))?;

    info!(
        path = %file_path.display(),
        records = extraction.records.len(),
        "loaded document"
    );
    Ok(extraction)
}

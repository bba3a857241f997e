//! ebdx: EBD extraction from BDEW .docx documents
//!
//! This library locates Entscheidungsbaumdiagramme (EBDs) inside Word
//! documents that carry no semantic markup for them, and rebuilds each one
//! as a record with its numbered check steps and result codes.

pub mod config;
pub mod document;
pub mod error;
pub mod export;

/// Export format options
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
    Markdown,
}

// Re-export commonly used types
pub use config::ExtractorConfig;
pub use document::{
    CheckResult, Extraction, Record, Role, Step, extract_document, extract_records,
    extract_steps, handle_word_file, load_extraction,
};
pub use error::{ExtractError, ParseError};

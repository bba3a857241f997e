//! EBD extraction and data structures module
//!
//! This module provides functionality for reading BDEW Word (.docx) documents
//! and recovering their EBD decision tables as structured records.

pub(crate) mod cleanup;
pub mod io;
pub mod loader;
pub mod models;
pub(crate) mod parsing;
pub mod query;
pub mod tree;

// Re-export all models and query functions
pub use io::{decode_xml, list_archive_entries, read_archive_entry, read_document_xml};
pub use loader::*;
pub use models::*;
pub use parsing::anchor::{Anchor, locate_anchors};
pub use parsing::text::collect_text;
pub use query::*;
pub use tree::{Node, ParseOptions, parse_fragment};

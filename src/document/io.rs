//! Container access, text decoding and file validation
//!
//! This module reads the main document part out of a `.docx` archive and
//! decodes it to text.

use anyhow::{bail, Result};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use crate::error::{DOCUMENT_BODY_PATH, ExtractError};

/// Validates that the path names a plausible .docx file
pub(crate) fn validate_docx_file(file_path: &Path) -> Result<()> {
    // Check file extension
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    if !extension.eq_ignore_ascii_case("docx") {
        if extension.eq_ignore_ascii_case("xlsx") {
            bail!(
                "This appears to be an Excel file (.xlsx).\n\
                ebdx only reads Word documents (.docx)."
            );
        }
        bail!(
            "Invalid file format. Expected .docx file, got .{}\n\
            Note: ebdx only supports Word .docx files (not .doc, .pdf, .zip, etc.)",
            extension
        );
    }

    Ok(())
}

/// Names of all entries in the archive, in archive order
pub fn list_archive_entries(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let archive = ZipArchive::new(Cursor::new(bytes))?;
    Ok(archive.file_names().map(str::to_string).collect())
}

/// Raw bytes of one archive entry, `None` when the entry does not exist
pub fn read_archive_entry(bytes: &[u8], path: &str) -> Result<Option<Vec<u8>>, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = match archive.by_name(path) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::new();
    entry.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// Read and decode `word/document.xml`
pub fn read_document_xml(bytes: &[u8]) -> Result<String, ExtractError> {
    let data = read_archive_entry(bytes, DOCUMENT_BODY_PATH)?
        .ok_or(ExtractError::MissingDocumentBody)?;
    decode_xml(&data)
}

/// Decode XML bytes using the byte order mark or the declared encoding.
///
/// Bytes that are invalid in that encoding are an error, not replaced.
pub fn decode_xml(bytes: &[u8]) -> Result<String, ExtractError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (declared_encoding(bytes)?, bytes),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or(ExtractError::MalformedText {
            encoding: encoding.name(),
        })
}

/// Encoding named by a leading XML declaration, UTF-8 when there is none
fn declared_encoding(bytes: &[u8]) -> Result<&'static Encoding, ExtractError> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let label = match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => match decl.encoding() {
            Some(Ok(label)) => label.into_owned(),
            _ => return Ok(UTF_8),
        },
        _ => return Ok(UTF_8),
    };
    Encoding::for_label(&label).ok_or_else(|| ExtractError::UnsupportedEncoding {
        encoding: String::from_utf8_lossy(&label).into_owned(),
    })
}

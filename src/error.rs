//! Error types for ebdx
//!
//! Two error types for two failure scopes:
//!
//! * [`ExtractError`]: fatal for the whole document (container without a
//!   document body, broken archive, undecodable text).
//! * [`ParseError`]: local to one XML fragment (a heading paragraph or a
//!   single table). Callers contain it to the record being processed.

use thiserror::Error;

/// Internal path of the main document body inside a `.docx` container.
pub const DOCUMENT_BODY_PATH: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The container is a valid archive but has no main document part.
    #[error("File does not contain word/document.xml")]
    MissingDocumentBody,

    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The bytes are not valid in the detected encoding.
    #[error("document text is not valid {encoding}")]
    MalformedText { encoding: &'static str },

    /// The XML declaration names an encoding label nobody knows.
    #[error("unsupported document encoding '{encoding}'")]
    UnsupportedEncoding { encoding: String },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("fragment contains no element")]
    Empty,
}

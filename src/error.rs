//! Error types for docdeck library.

use std::io;
use thiserror::Error;

/// Result type alias for docdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading documents and building decks.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be recognized.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The format was recognized but no reader handles it.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document container (ZIP) is unreadable or incomplete.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Document markup could not be parsed.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Input data does not describe a usable item sequence.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An image reference could not be resolved to a readable picture.
    #[error("Image could not be resolved: {0}")]
    ImageResolve(String),

    /// Error during rendering (JSON, outline).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfParse(err.to_string())
    }
}

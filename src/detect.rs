//! Source format detection from magic bytes.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Recognized source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Office Open XML word-processing document (ZIP container)
    Docx,
    /// Legacy Word binary document (OLE compound file)
    Doc,
    /// Portable Document Format
    Pdf,
    /// JSON item dump
    Json,
}

impl SourceFormat {
    /// Usual file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Docx => "docx",
            SourceFormat::Doc => "doc",
            SourceFormat::Pdf => "pdf",
            SourceFormat::Json => "json",
        }
    }

    /// Check if the bundled readers handle this format.
    pub fn is_supported(&self) -> bool {
        !matches!(self, SourceFormat::Doc)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceFormat::Docx => "DOCX",
            SourceFormat::Doc => "DOC",
            SourceFormat::Pdf => "PDF",
            SourceFormat::Json => "JSON",
        };
        f.write_str(name)
    }
}

/// ZIP local file header.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE compound file header.
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
/// PDF header.
const PDF_MAGIC: &[u8] = b"%PDF-";
/// UTF-8 byte order mark.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

const HEADER_LEN: usize = 64;

/// Detect the source format of a file.
///
/// # Example
/// ```no_run
/// use docdeck::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("report.docx").unwrap();
/// println!("Format: {}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let file = File::open(path)?;
    let mut header = Vec::with_capacity(HEADER_LEN);
    file.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from the leading bytes of a file.
///
/// # Returns
/// * `Err(Error::UnknownFormat)` if no known signature matches
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(SourceFormat::Docx);
    }
    if data.starts_with(OLE_MAGIC) {
        return Ok(SourceFormat::Doc);
    }
    if data.starts_with(PDF_MAGIC) {
        return Ok(SourceFormat::Pdf);
    }

    let text = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match text.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'[') | Some(b'{') => Ok(SourceFormat::Json),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if a file looks like a document the bundled readers handle.
pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok_and(|f| f.is_supported())
}

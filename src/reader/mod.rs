//! Document readers producing raw items, with a plugin registry.
//!
//! Readers are registered for file extensions and dispatched by the
//! registry.
//!
//! # Example
//!
//! ```no_run
//! use docdeck::reader::ReaderRegistry;
//! use std::path::Path;
//!
//! fn main() -> docdeck::Result<()> {
//!     let registry = ReaderRegistry::with_defaults();
//!     let mut output = registry.read(Path::new("report.docx"))?;
//!     println!("{} items", output.items.len());
//!     output.cleanup()?;
//!     Ok(())
//! }
//! ```

mod docx;
mod json;
mod media;
pub mod pdf;

pub use docx::DocxReader;
pub use json::JsonItemsReader;
pub use media::MediaWorkspace;
pub use pdf::PdfReader;

use crate::detect::{detect_format_from_bytes, SourceFormat};
use crate::error::{Error, Result};
use crate::model::RawItem;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Items read from a document, plus any media extracted for them.
#[derive(Debug, Default)]
pub struct ReadOutput {
    /// Raw items in extraction order
    pub items: Vec<RawItem>,

    /// Workspace holding extracted pictures, if any were extracted
    pub media: Option<MediaWorkspace>,
}

impl ReadOutput {
    /// Create output holding items only.
    pub fn new(items: Vec<RawItem>) -> Self {
        Self { items, media: None }
    }

    /// Remove extracted media.
    pub fn cleanup(&mut self) -> Result<()> {
        match self.media.as_mut() {
            Some(media) => media.cleanup(),
            None => Ok(()),
        }
    }
}

/// Trait for document readers.
///
/// Implement this trait to add support for a new source format.
pub trait DocumentReader: Send + Sync {
    /// Get the supported file extensions for this reader.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this reader.
    fn name(&self) -> &str;

    /// Read items from bytes.
    fn read_bytes(&self, bytes: &[u8]) -> Result<ReadOutput>;

    /// Read items from a file.
    fn read(&self, path: &Path) -> Result<ReadOutput> {
        let bytes = fs::read(path)?;
        self.read_bytes(&bytes)
    }

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document readers.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
    by_name: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with default readers (DOCX, PDF and JSON item dumps).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxReader::new()));
        registry.register(Arc::new(PdfReader::new()));
        registry.register(Arc::new(JsonItemsReader::new()));
        registry
    }

    /// Register a reader for all its supported extensions.
    pub fn register(&mut self, reader: Arc<dyn DocumentReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
        self.by_name.insert(reader.name().to_lowercase(), reader);
    }

    /// Get a reader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Get a reader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentReader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.readers.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Read a file using the reader registered for its extension.
    pub fn read(&self, path: &Path) -> Result<ReadOutput> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::Other("File has no extension".into()))?;

        match self.get_by_extension(ext) {
            Some(reader) => {
                log::debug!("reading {} with {} reader", path.display(), reader.name());
                reader.read(path)
            }
            None => Err(self.unsupported(ext, fs::read(path).ok().as_deref())),
        }
    }

    /// Read bytes using the reader registered for `ext`.
    pub fn read_bytes(&self, bytes: &[u8], ext: &str) -> Result<ReadOutput> {
        let reader = self
            .get_by_extension(ext)
            .ok_or_else(|| self.unsupported(ext, Some(bytes)))?;
        reader.read_bytes(bytes)
    }

    fn unsupported(&self, ext: &str, bytes: Option<&[u8]>) -> Error {
        let detected = bytes.and_then(|b| detect_format_from_bytes(b).ok());
        match detected {
            Some(SourceFormat::Doc) => Error::UnsupportedFormat(
                "legacy .doc files are not supported; save the document as .docx".into(),
            ),
            _ => Error::UnsupportedFormat(format!("no reader for extension: {}", ext)),
        }
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = ReaderRegistry::with_defaults();
        assert!(registry.supports("docx"));
        assert!(registry.supports("DOCX"));
        assert!(registry.supports("json"));
        assert!(registry.supports("pdf"));
        assert!(!registry.supports("doc"));
        assert_eq!(registry.supported_extensions(), vec!["docx", "json", "pdf"]);
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ReaderRegistry::with_defaults();
        assert_eq!(registry.get_by_name("docx").unwrap().name(), "docx");
        assert_eq!(registry.get_by_name("PDF").unwrap().name(), "pdf");
        assert!(registry.get_by_name("doc").is_none());
    }

    #[test]
    fn test_truncated_pdf_bytes() {
        let registry = ReaderRegistry::with_defaults();
        let err = registry.read_bytes(b"%PDF-1.7\n", "pdf").unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }

    #[test]
    fn test_unsupported_doc_bytes() {
        let registry = ReaderRegistry::with_defaults();
        let ole = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        let err = registry.read_bytes(&ole, "doc").unwrap_err();
        assert!(err.to_string().contains(".docx"));
    }

    #[test]
    fn test_read_output_cleanup_without_media() {
        let mut output = ReadOutput::new(vec![RawItem::text("x")]);
        assert!(output.cleanup().is_ok());
    }
}

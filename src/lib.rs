//! # docdeck
//!
//! Turns extracted document content into an ordered list of slide
//! descriptors.
//!
//! Raw items (text with style hints, tables, picture references) are
//! classified into headings, paragraphs, formulas, tables and images,
//! organized into sections, and allocated to slides with layout geometry.
//! The resulting [`Deck`] is handed to a rendering backend, or serialized to
//! JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docdeck::{convert_file, render, ConvertOptions};
//!
//! fn main() -> docdeck::Result<()> {
//!     let mut conversion = convert_file("report.docx", &ConvertOptions::default())?;
//!
//!     // Picture paths in the deck stay valid until cleanup.
//!     let json = render::to_json(&conversion.deck, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     conversion.cleanup()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heading detection**: style tags, font size, numbering, title case
//! - **Formula detection**: LaTeX delimiters and math-symbol density
//! - **Section nesting**: content grouped under the preceding heading
//! - **Slide geometry**: table grids, aspect-preserving picture frames
//! - **Readers**: DOCX and PDF documents, JSON item dumps

pub mod allocate;
pub mod classify;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod organize;
pub mod reader;
pub mod render;

// Re-export commonly used types
pub use allocate::{Allocator, FsImageProbe, ImageInfo, ImageProbe, LayoutOptions};
pub use classify::{Classifier, HeadingConfig, NormalizeOptions};
pub use convert::{
    build_deck, convert_bytes, convert_file, Conversion, ConvertOptions, Pipeline,
    DEFAULT_MAX_SLIDES,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, SourceFormat};
pub use error::{Error, Result};
pub use model::{
    BlockContent, BlockKind, BodyElement, Deck, DeckStats, Layout, OutlineNode, RawItem, Rect,
    Section, SlideDescriptor, SlideSize, StyleHint, Truncation, TypedBlock,
};
pub use organize::organize;
pub use reader::{DocumentReader, PdfReader, ReaderRegistry};
pub use render::{JsonFormat, MarkdownOptions};

use std::path::Path;

/// Classify raw items into typed blocks with default heading thresholds.
///
/// # Example
///
/// ```
/// use docdeck::{classify_items, BlockKind, RawItem};
///
/// let blocks = classify_items(&[RawItem::text("Energy: $E = mc^2$")]);
/// assert_eq!(blocks[0].kind(), BlockKind::Formula);
/// ```
pub fn classify_items(items: &[RawItem]) -> Vec<TypedBlock> {
    Classifier::default().classify(items)
}

/// Convert a document file to deck JSON.
///
/// Extracted pictures are removed before returning, so image paths in the
/// JSON do not resolve. Use [`convert_file`] with a media directory to keep
/// them.
///
/// # Example
///
/// ```no_run
/// use docdeck::{to_json, JsonFormat};
///
/// let json = to_json("report.docx", JsonFormat::Compact).unwrap();
/// println!("{}", json);
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let mut conversion = convert_file(path, &ConvertOptions::default())?;
    let json = render::to_json(&conversion.deck, format);
    conversion.cleanup()?;
    json
}

/// Convert a document file to a plain-text slide outline.
pub fn to_outline<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(render::to_outline(
        &convert_file(path, &ConvertOptions::default())?.into_deck(),
    ))
}

/// Builder API for conversions.
///
/// # Example
///
/// ```no_run
/// use docdeck::Docdeck;
///
/// let conversion = Docdeck::new()
///     .with_max_slides(20)
///     .with_summary_budget(300)
///     .with_media_dir("report_media")
///     .convert("report.docx")?;
/// println!("{} slides", conversion.deck.slide_count());
/// # Ok::<(), docdeck::Error>(())
/// ```
pub struct Docdeck {
    options: ConvertOptions,
}

impl Docdeck {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
        }
    }

    /// Set the maximum slide count.
    pub fn with_max_slides(mut self, max: usize) -> Self {
        self.options = self.options.with_max_slides(max);
        self
    }

    /// Keep every slide.
    pub fn without_slide_limit(mut self) -> Self {
        self.options = self.options.without_slide_limit();
        self
    }

    /// Ask the renderer for decorative bars.
    pub fn with_decorations(mut self) -> Self {
        self.options = self.options.with_decorations(true);
        self
    }

    /// Set the paragraph summary budget in characters.
    pub fn with_summary_budget(mut self, budget: usize) -> Self {
        self.options = self.options.with_summary_budget(budget);
        self
    }

    /// Set the slide size.
    pub fn with_slide_size(mut self, size: SlideSize) -> Self {
        self.options = self.options.with_slide_size(size);
        self
    }

    /// Skip text normalization.
    pub fn without_normalization(mut self) -> Self {
        self.options = self.options.with_normalization(false);
        self
    }

    /// Keep extracted pictures in `dir`.
    pub fn with_media_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.options = self.options.with_media_dir(dir);
        self
    }

    /// Get the options built so far.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a document file.
    pub fn convert<P: AsRef<Path>>(self, path: P) -> Result<Conversion> {
        convert_file(path, &self.options)
    }

    /// Convert document bytes.
    pub fn convert_bytes(self, data: &[u8]) -> Result<Conversion> {
        convert_bytes(data, &self.options)
    }

    /// Build a deck from raw items.
    pub fn build(self, items: &[RawItem]) -> Deck {
        build_deck(items, &self.options)
    }
}

impl Default for Docdeck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docdeck_builder() {
        let builder = Docdeck::new()
            .with_max_slides(10)
            .with_decorations()
            .with_summary_budget(80)
            .without_normalization();

        assert_eq!(builder.options().max_slides, Some(10));
        assert!(builder.options().add_decorations);
        assert_eq!(builder.options().layout.paragraph_budget, 80);
        assert!(!builder.options().normalize_text);
    }

    #[test]
    fn test_docdeck_builder_default() {
        let builder = Docdeck::default();
        assert_eq!(builder.options().max_slides, Some(DEFAULT_MAX_SLIDES));
        assert!(!builder.options().add_decorations);
    }

    #[test]
    fn test_docdeck_without_limit() {
        let builder = Docdeck::new().with_max_slides(3).without_slide_limit();
        assert_eq!(builder.options().max_slides, None);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_convert_bytes_empty_data() {
        let result = Docdeck::new().convert_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_convert_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert!(Docdeck::new().convert_bytes(&data).is_err());
    }

    #[test]
    fn test_convert_bytes_legacy_doc() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        let err = Docdeck::new().convert_bytes(&data).unwrap_err();
        assert!(err.to_string().contains(".docx"));
    }

    #[test]
    fn test_build_empty_items() {
        let deck = Docdeck::new().build(&[]);
        assert_eq!(deck.slide_count(), 0);
        assert_eq!(deck.stats.block_count(), 0);
    }

    #[test]
    fn test_classify_items() {
        let blocks = classify_items(&[
            RawItem::styled_text("Overview", StyleHint::new().tagged()),
            RawItem::text("body"),
        ]);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_heading());
    }
}

//! The conversion pipeline: items to a finished deck.
//!
//! Stages run in a fixed order: optional text normalization, classification,
//! organization into sections, slide allocation, and truncation to the
//! maximum slide count.
//!
//! # Example
//!
//! ```no_run
//! use docdeck::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> docdeck::Result<()> {
//!     let options = ConvertOptions::new().with_max_slides(20);
//!     let mut conversion = convert_file("report.docx", &options)?;
//!     println!("{} slides", conversion.deck.slide_count());
//!     conversion.cleanup()?;
//!     Ok(())
//! }
//! ```

use crate::allocate::{Allocator, ImageProbe, LayoutOptions};
use crate::classify::{Classifier, HeadingConfig, NormalizeOptions, TextNormalizer};
use crate::detect::{detect_format_from_bytes, detect_format_from_path, SourceFormat};
use crate::error::{Error, Result};
use crate::model::{
    BodyElement, Deck, DeckStats, OutlineNode, RawItem, SlideDescriptor, SlideSize, Truncation,
    TypedBlock,
};
use crate::organize::organize;
use crate::reader::{DocumentReader, MediaWorkspace, ReadOutput, ReaderRegistry};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default maximum number of slides in a deck.
pub const DEFAULT_MAX_SLIDES: usize = 50;

/// Options for building a deck.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Heading detection thresholds
    pub heading: HeadingConfig,

    /// Slide geometry and paragraph summary budget
    pub layout: LayoutOptions,

    /// Maximum number of slides; `None` keeps all
    pub max_slides: Option<usize>,

    /// Passed through to the deck for the renderer
    pub add_decorations: bool,

    /// Normalize text (Unicode, ligatures, whitespace) before classifying
    pub normalize_text: bool,

    /// Directory that receives extracted pictures; without it they live in
    /// the conversion's media workspace until it is cleaned up
    pub media_dir: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            layout: LayoutOptions::default(),
            max_slides: Some(DEFAULT_MAX_SLIDES),
            add_decorations: false,
            normalize_text: true,
            media_dir: None,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set heading detection thresholds.
    pub fn with_heading_config(mut self, heading: HeadingConfig) -> Self {
        self.heading = heading;
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the slide size.
    pub fn with_slide_size(mut self, size: SlideSize) -> Self {
        self.layout = self.layout.with_slide_size(size);
        self
    }

    /// Set the paragraph summary budget in characters.
    pub fn with_summary_budget(mut self, budget: usize) -> Self {
        self.layout = self.layout.with_paragraph_budget(budget);
        self
    }

    /// Set the maximum slide count.
    pub fn with_max_slides(mut self, max: usize) -> Self {
        self.max_slides = Some(max);
        self
    }

    /// Keep every slide.
    pub fn without_slide_limit(mut self) -> Self {
        self.max_slides = None;
        self
    }

    /// Ask the renderer for decorative bars.
    pub fn with_decorations(mut self, enabled: bool) -> Self {
        self.add_decorations = enabled;
        self
    }

    /// Enable or disable text normalization.
    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize_text = enabled;
        self
    }

    /// Keep extracted pictures in `dir`.
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(dir.into());
        self
    }
}

/// A configured classify, organize and allocate pipeline.
pub struct Pipeline {
    options: ConvertOptions,
    normalizer: Option<TextNormalizer>,
    classifier: Classifier,
    allocator: Allocator,
}

impl Pipeline {
    /// Create a pipeline from options.
    pub fn new(options: ConvertOptions) -> Self {
        let normalizer = options
            .normalize_text
            .then(|| TextNormalizer::new(NormalizeOptions::default()));
        Self {
            normalizer,
            classifier: Classifier::new(options.heading.clone()),
            allocator: Allocator::new(options.layout.clone()),
            options,
        }
    }

    /// Replace the image probe used for picture slides.
    pub fn with_probe(mut self, probe: impl ImageProbe + 'static) -> Self {
        self.allocator = Allocator::new(self.options.layout.clone()).with_probe(probe);
        self
    }

    /// Get the options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn normalized<'a>(&self, items: &'a [RawItem]) -> Cow<'a, [RawItem]> {
        match &self.normalizer {
            Some(normalizer) => Cow::Owned(items.iter().map(|i| normalizer.process_item(i)).collect()),
            None => Cow::Borrowed(items),
        }
    }

    /// Classify items into typed blocks.
    pub fn classify(&self, items: &[RawItem]) -> Vec<TypedBlock> {
        let items = self.normalized(items);
        self.classifier.classify(&items)
    }

    /// Classify and organize items into an outline.
    pub fn outline(&self, items: &[RawItem]) -> Vec<OutlineNode> {
        organize(self.classify(items))
    }

    /// Build a deck from items.
    pub fn run(&self, items: &[RawItem]) -> Deck {
        let blocks = self.classify(items);
        let mut stats = DeckStats::from_blocks(&blocks);
        log::debug!("classified {} items into {} blocks", items.len(), blocks.len());

        let outline = organize(blocks);
        let mut slides = self.allocator.allocate(&outline);
        for slide in &slides {
            stats.add_slide(slide);
        }
        let truncation = truncate_slides(&mut slides, self.options.max_slides);

        let mut deck = Deck::new(self.options.layout.slide_size);
        deck.add_decorations = self.options.add_decorations;
        deck.slides = slides;
        deck.truncation = truncation;
        deck.stats = stats;
        deck
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

/// Build a deck from raw items.
///
/// # Example
/// ```
/// use docdeck::convert::{build_deck, ConvertOptions};
/// use docdeck::model::{RawItem, StyleHint};
///
/// let items = vec![
///     RawItem::styled_text("1. Intro", StyleHint::new().with_font_size(24.0)),
///     RawItem::styled_text("Hello world.", StyleHint::new().with_font_size(12.0)),
/// ];
/// let deck = build_deck(&items, &ConvertOptions::default());
/// assert_eq!(deck.titles(), vec!["1. Intro", "1. Intro"]);
/// ```
pub fn build_deck(items: &[RawItem], options: &ConvertOptions) -> Deck {
    Pipeline::new(options.clone()).run(items)
}

/// Keep at most `max` slides. Returns what was dropped, if anything.
pub fn truncate_slides(
    slides: &mut Vec<SlideDescriptor>,
    max: Option<usize>,
) -> Option<Truncation> {
    let max = max?;
    let produced = slides.len();
    if produced <= max {
        return None;
    }
    slides.truncate(max);
    log::warn!(
        "content produced {} slides, keeping the first {}",
        produced,
        max
    );
    Some(Truncation {
        produced,
        kept: max,
    })
}

/// A deck together with the workspace holding its extracted pictures.
///
/// Image paths on the deck point into the workspace until
/// [`cleanup`](Self::cleanup) is called or the conversion is dropped.
/// Use [`keep_media`](Self::keep_media) to move them somewhere lasting.
#[derive(Debug)]
pub struct Conversion {
    /// The finished deck
    pub deck: Deck,
    media: Option<MediaWorkspace>,
}

impl Conversion {
    /// Pair a deck with the workspace its pictures live in.
    pub fn new(deck: Deck, media: Option<MediaWorkspace>) -> Self {
        Self { deck, media }
    }

    /// The open media workspace, if the source had pictures.
    pub fn media(&self) -> Option<&MediaWorkspace> {
        self.media.as_ref().filter(|m| !m.is_cleaned_up())
    }

    /// Copy referenced pictures into `dir`, point the slides at the copies
    /// and release the workspace. Returns the number of files copied.
    pub fn keep_media(&mut self, dir: &Path) -> Result<usize> {
        let copied = match &self.media {
            Some(media) => persist_media(&mut self.deck, media, dir)?,
            None => 0,
        };
        self.cleanup()?;
        Ok(copied)
    }

    /// Remove the media workspace. Calling this twice is a no-op.
    pub fn cleanup(&mut self) -> Result<()> {
        match self.media.take() {
            Some(mut media) => media.cleanup(),
            None => Ok(()),
        }
    }

    /// Release the workspace and return the deck.
    ///
    /// Image paths that pointed into the workspace no longer resolve.
    pub fn into_deck(mut self) -> Deck {
        if let Err(e) = self.cleanup() {
            log::warn!("failed to remove media workspace: {}", e);
        }
        self.deck
    }
}

/// Convert a document file into a deck.
///
/// Extracted pictures stay in the returned conversion's workspace. When
/// `options.media_dir` is set they are copied there instead and the
/// workspace is released before returning. On failure the workspace is
/// always released.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<Conversion> {
    let path = path.as_ref();
    let format = detect_format_from_path(path)?;
    let registry = ReaderRegistry::with_defaults();
    let reader = reader_for(&registry, format)?;

    log::debug!("converting {} as {}", path.display(), format);
    let output = reader.read(path)?;
    finish(output, options, Some(path.display().to_string()))
}

/// Convert document bytes into a deck.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<Conversion> {
    let format = detect_format_from_bytes(bytes)?;
    let registry = ReaderRegistry::with_defaults();
    let reader = reader_for(&registry, format)?;

    let output = reader.read_bytes(bytes)?;
    finish(output, options, None)
}

fn reader_for(
    registry: &ReaderRegistry,
    format: SourceFormat,
) -> Result<Arc<dyn DocumentReader>> {
    if !format.is_supported() {
        return Err(Error::UnsupportedFormat(
            "legacy .doc files are not supported; save the document as .docx".to_string(),
        ));
    }
    registry
        .get_by_extension(format.extension())
        .ok_or_else(|| Error::UnsupportedFormat(format!("no reader for {}", format)))
}

fn finish(output: ReadOutput, options: &ConvertOptions, source: Option<String>) -> Result<Conversion> {
    let ReadOutput { items, media } = output;
    let mut deck = build_deck(&items, options);
    deck.metadata.source = source;

    let mut conversion = Conversion::new(deck, media);
    if let Some(dir) = options.media_dir.as_deref() {
        match conversion.keep_media(dir) {
            Ok(copied) => log::debug!("copied {} pictures to {}", copied, dir.display()),
            Err(e) => {
                if let Err(cleanup_err) = conversion.cleanup() {
                    log::warn!("failed to remove media workspace: {}", cleanup_err);
                }
                return Err(e);
            }
        }
    }
    Ok(conversion)
}

/// Copy pictures referenced by the deck out of `media` into `dir`,
/// rewriting slide paths to the copies. Returns the number of files copied.
pub fn persist_media(deck: &mut Deck, media: &MediaWorkspace, dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir)?;
    let mut copied: HashMap<PathBuf, PathBuf> = HashMap::new();

    for slide in &mut deck.slides {
        for element in &mut slide.body {
            let BodyElement::Image { path, .. } = element else {
                continue;
            };
            if !path.starts_with(media.path()) {
                continue;
            }
            if let Some(dest) = copied.get(path.as_path()) {
                *path = dest.clone();
                continue;
            }
            let file_name = path
                .file_name()
                .ok_or_else(|| Error::Other(format!("bad media path: {}", path.display())))?;
            let dest = dir.join(file_name);
            fs::copy(&*path, &dest)?;
            copied.insert(path.clone(), dest.clone());
            *path = dest;
        }
    }
    Ok(copied.len())
}

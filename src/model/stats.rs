//! Statistics collected while building a deck.

use super::{BlockContent, Layout, SlideDescriptor, TypedBlock};
use serde::{Deserialize, Serialize};

/// Counts of classified blocks and emitted slides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    /// Number of headings (and therefore sections)
    pub heading_count: u32,

    /// Number of paragraph blocks
    pub paragraph_count: u32,

    /// Number of tables kept after blank filtering
    pub table_count: u32,

    /// Number of formulas
    pub formula_count: u32,

    /// Number of formulas with LaTeX delimiters
    pub latex_formula_count: u32,

    /// Number of image blocks
    pub image_count: u32,

    /// Number of slides emitted before truncation
    pub slide_count: u32,

    /// Number of image slides that fell back to a placeholder
    pub placeholder_count: u32,

    /// Approximate word count of text blocks
    pub word_count: u32,

    /// Character count of text blocks (excluding whitespace)
    pub char_count: u32,
}

impl DeckStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics over classified blocks.
    pub fn from_blocks(blocks: &[TypedBlock]) -> Self {
        let mut stats = Self::new();
        for block in blocks {
            stats.add_block(block);
        }
        stats
    }

    /// Count one classified block.
    pub fn add_block(&mut self, block: &TypedBlock) {
        match &block.content {
            BlockContent::Heading { text, .. } => {
                self.heading_count += 1;
                self.count_text(text);
            }
            BlockContent::Paragraph { text } => {
                self.paragraph_count += 1;
                self.count_text(text);
            }
            BlockContent::Table { .. } => self.table_count += 1,
            BlockContent::Formula { is_latex, .. } => {
                self.formula_count += 1;
                if *is_latex {
                    self.latex_formula_count += 1;
                }
            }
            BlockContent::Image { .. } => self.image_count += 1,
        }
    }

    /// Count one emitted slide.
    pub fn add_slide(&mut self, slide: &SlideDescriptor) {
        self.slide_count += 1;
        if slide.layout == Layout::Image && slide.has_placeholder() {
            self.placeholder_count += 1;
        }
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another set of statistics into this one.
    pub fn merge(&mut self, other: &DeckStats) {
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.formula_count += other.formula_count;
        self.latex_formula_count += other.latex_formula_count;
        self.image_count += other.image_count;
        self.slide_count += other.slide_count;
        self.placeholder_count += other.placeholder_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }

    /// Total number of classified blocks.
    pub fn block_count(&self) -> u32 {
        self.heading_count
            + self.paragraph_count
            + self.table_count
            + self.formula_count
            + self.image_count
    }
}

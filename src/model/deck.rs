//! The deck: ordered slides plus the settings a renderer needs.

use super::{DeckStats, SlideDescriptor, SlideSize};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about where a deck came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckMetadata {
    /// Source document, when built from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Time the deck was built
    pub generated_at: DateTime<Utc>,
}

impl Default for DeckMetadata {
    fn default() -> Self {
        Self {
            source: None,
            generated_at: Utc::now(),
        }
    }
}

/// Record of slides dropped by the maximum slide count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truncation {
    /// Slides produced by the allocator
    pub produced: usize,

    /// Slides kept
    pub kept: usize,
}

impl Truncation {
    /// Number of slides dropped.
    pub fn dropped(&self) -> usize {
        self.produced.saturating_sub(self.kept)
    }
}

/// An ordered list of slide descriptors ready for a rendering backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Deck metadata
    pub metadata: DeckMetadata,

    /// Slide dimensions used for geometry
    pub slide_size: SlideSize,

    /// Renderer should draw decorative bars; not interpreted here
    pub add_decorations: bool,

    /// Slides in presentation order
    pub slides: Vec<SlideDescriptor>,

    /// Present when slides were dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,

    /// Block and slide statistics
    pub stats: DeckStats,
}

impl Deck {
    /// Create an empty deck.
    pub fn new(slide_size: SlideSize) -> Self {
        Self {
            metadata: DeckMetadata::default(),
            slide_size,
            add_decorations: false,
            slides: Vec::new(),
            truncation: None,
            stats: DeckStats::default(),
        }
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Check if slides were dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    /// Slide titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.title.as_str()).collect()
    }
}

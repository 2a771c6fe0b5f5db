//! Data model shared by the classification, organization and allocation stages.
//!
//! Content flows through these types in one direction: readers produce
//! [`RawItem`]s, the classifier turns them into [`TypedBlock`]s, the
//! organizer nests blocks into an outline of [`OutlineNode`]s, and the
//! allocator emits [`SlideDescriptor`]s collected into a [`Deck`].

mod block;
mod deck;
mod geometry;
mod item;
mod outline;
mod slide;
mod stats;

pub use block::{BlockContent, BlockKind, TypedBlock};
pub use deck::{Deck, DeckMetadata, Truncation};
pub use geometry::{
    inches, pixels_to_emu, points, Emu, Rect, SlideSize, EMU_PER_INCH, EMU_PER_POINT,
};
pub use item::{RawItem, StyleHint};
pub use outline::{OutlineNode, Section};
pub use slide::{Alignment, BodyElement, Layout, SlideDescriptor, TextStyle};
pub use stats::DeckStats;

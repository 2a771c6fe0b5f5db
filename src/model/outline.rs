//! Hierarchical outline produced by the organizer.

use super::TypedBlock;
use serde::{Deserialize, Serialize};

/// A heading together with the content nested beneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text
    pub title: String,

    /// Heading level (1-6)
    pub level: u8,

    /// Source position of the heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,

    /// Non-heading blocks up to the next heading of any level
    pub content: Vec<TypedBlock>,
}

impl Section {
    /// Create an empty section.
    pub fn new(title: impl Into<String>, level: u8) -> Self {
        Self {
            title: title.into(),
            level,
            position: None,
            content: Vec::new(),
        }
    }

    /// Number of content blocks.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the section has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A top-level entry of the outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum OutlineNode {
    /// A section started by a heading
    Section(Section),

    /// A block that appeared before any heading
    Block(TypedBlock),
}

impl OutlineNode {
    /// Get the section, if this node is one.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            OutlineNode::Section(section) => Some(section),
            OutlineNode::Block(_) => None,
        }
    }

    /// Number of blocks represented by this node, counting the heading.
    pub fn block_count(&self) -> usize {
        match self {
            OutlineNode::Section(section) => 1 + section.len(),
            OutlineNode::Block(_) => 1,
        }
    }
}

//! Typed blocks produced by the content classifier.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Kind of a classified block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Table,
    Formula,
    Image,
}

impl BlockKind {
    /// Lowercase name used in outlines and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Table => "table",
            BlockKind::Formula => "formula",
            BlockKind::Image => "image",
        }
    }
}

/// Kind-specific payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// A heading with its level (1-6)
    Heading { text: String, level: u8 },

    /// One or more consecutive text lines joined by newlines
    Paragraph { text: String },

    /// A table with at least one non-blank row
    Table { rows: Vec<Vec<String>> },

    /// A formula; `text` is the extracted markup when `is_latex`
    Formula {
        text: String,
        is_latex: bool,
        /// Full text of the item the formula was found in
        source_text: String,
    },

    /// A picture reference
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// A classified unit of document content ready for layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedBlock {
    /// Kind-specific content
    #[serde(flatten)]
    pub content: BlockContent,

    /// Title inherited from the nearest preceding heading, or a generated
    /// table title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Source position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
}

impl TypedBlock {
    /// Create a block from content.
    pub fn new(content: BlockContent) -> Self {
        Self {
            content,
            title: None,
            position: None,
        }
    }

    /// Create a heading block.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self::new(BlockContent::Heading {
            text: text.into(),
            level: level.clamp(1, 6),
        })
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockContent::Paragraph { text: text.into() })
    }

    /// Create a table block.
    pub fn table(rows: Vec<Vec<String>>) -> Self {
        Self::new(BlockContent::Table { rows })
    }

    /// Create a formula block.
    pub fn formula(text: impl Into<String>, is_latex: bool, source_text: impl Into<String>) -> Self {
        Self::new(BlockContent::Formula {
            text: text.into(),
            is_latex,
            source_text: source_text.into(),
        })
    }

    /// Create an image block.
    pub fn image(path: Option<PathBuf>) -> Self {
        Self::new(BlockContent::Image {
            path,
            caption: None,
            description: None,
        })
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title if one is given.
    pub fn with_title_opt(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Set the source position.
    pub fn with_position(mut self, position: Option<u64>) -> Self {
        self.position = position;
        self
    }

    /// Get the block kind.
    pub fn kind(&self) -> BlockKind {
        match self.content {
            BlockContent::Heading { .. } => BlockKind::Heading,
            BlockContent::Paragraph { .. } => BlockKind::Paragraph,
            BlockContent::Table { .. } => BlockKind::Table,
            BlockContent::Formula { .. } => BlockKind::Formula,
            BlockContent::Image { .. } => BlockKind::Image,
        }
    }

    /// Check if this is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self.content, BlockContent::Heading { .. })
    }

    /// Get the heading level (1-6) or None.
    pub fn heading_level(&self) -> Option<u8> {
        match self.content {
            BlockContent::Heading { level, .. } => Some(level),
            _ => None,
        }
    }

    /// Get the text of a heading, paragraph or formula block.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Heading { text, .. }
            | BlockContent::Paragraph { text }
            | BlockContent::Formula { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Check if this is a LaTeX-delimited formula.
    pub fn is_latex(&self) -> bool {
        matches!(self.content, BlockContent::Formula { is_latex: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_accessors() {
        let heading = TypedBlock::heading("Intro", 9);
        assert_eq!(heading.kind(), BlockKind::Heading);
        assert_eq!(heading.heading_level(), Some(6));
        assert_eq!(heading.text(), Some("Intro"));

        let formula = TypedBlock::formula("x^2", true, "$x^2$");
        assert!(formula.is_latex());
        assert_eq!(formula.kind().as_str(), "formula");

        let table = TypedBlock::table(vec![vec!["a".into()]]);
        assert_eq!(table.text(), None);
        assert!(!table.is_heading());
    }

    #[test]
    fn test_serialize_flattens_content() {
        let block = TypedBlock::paragraph("Hello").with_title("Intro");
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains("\"type\":\"paragraph\""));
        assert!(json.contains("\"title\":\"Intro\""));
        assert!(!json.contains("position"));
    }
}

//! Raw items as produced by document readers.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Formatting hints attached to a text item by its reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleHint {
    /// The source explicitly marked this text as a heading
    #[serde(default)]
    pub tagged_heading: bool,

    /// Font size in points, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Named paragraph style (e.g., "Heading 2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
}

impl StyleHint {
    /// Create an empty style hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the item as an explicitly tagged heading.
    pub fn tagged(mut self) -> Self {
        self.tagged_heading = true;
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set the named paragraph style.
    pub fn with_style_name(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }
}

/// One unit of extracted document content.
///
/// `position` is the item's index in the source document. Items without a
/// position are ordered after every positioned item, keeping their
/// extraction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawItem {
    /// A paragraph of text
    Text {
        /// Paragraph text
        text: String,
        /// Formatting hints
        #[serde(default)]
        style: StyleHint,
        /// Source position
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<u64>,
    },

    /// A table as a matrix of cell strings
    Table {
        /// Rows of cells
        rows: Vec<Vec<String>>,
        /// Source position
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<u64>,
    },

    /// A reference to an embedded or external picture
    Image {
        /// Location of the picture on disk
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        /// Caption shown below the picture
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        /// Alternative description
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Source position
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<u64>,
    },
}

impl RawItem {
    /// Create an unstyled text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self::styled_text(text, StyleHint::default())
    }

    /// Create a text item with style hints.
    pub fn styled_text(text: impl Into<String>, style: StyleHint) -> Self {
        RawItem::Text {
            text: text.into(),
            style,
            position: None,
        }
    }

    /// Create a table item.
    pub fn table(rows: Vec<Vec<String>>) -> Self {
        RawItem::Table {
            rows,
            position: None,
        }
    }

    /// Create an image item referencing a file.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        RawItem::Image {
            path: Some(path.into()),
            caption: None,
            description: None,
            position: None,
        }
    }

    /// Set the source position.
    pub fn with_position(mut self, pos: u64) -> Self {
        match &mut self {
            RawItem::Text { position, .. }
            | RawItem::Table { position, .. }
            | RawItem::Image { position, .. } => *position = Some(pos),
        }
        self
    }

    /// Set the caption of an image item. Other items are returned unchanged.
    pub fn with_caption(mut self, text: impl Into<String>) -> Self {
        if let RawItem::Image { caption, .. } = &mut self {
            *caption = Some(text.into());
        }
        self
    }

    /// Get the source position, if any.
    pub fn position(&self) -> Option<u64> {
        match self {
            RawItem::Text { position, .. }
            | RawItem::Table { position, .. }
            | RawItem::Image { position, .. } => *position,
        }
    }

    /// Get the image path of an image item.
    pub fn image_path(&self) -> Option<&Path> {
        match self {
            RawItem::Image { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Check if this is a text item.
    pub fn is_text(&self) -> bool {
        matches!(self, RawItem::Text { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let item = RawItem::styled_text("Intro", StyleHint::new().with_font_size(24.0))
            .with_position(3);
        assert!(item.is_text());
        assert_eq!(item.position(), Some(3));

        let image = RawItem::image("a.png").with_caption("Figure 1");
        match image {
            RawItem::Image { caption, path, .. } => {
                assert_eq!(caption.as_deref(), Some("Figure 1"));
                assert_eq!(path, Some(PathBuf::from("a.png")));
            }
            _ => panic!("Expected image item"),
        }
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"[
            {"type": "text", "text": "Hello"},
            {"type": "table", "rows": [["a", "b"]], "position": 2},
            {"type": "image"}
        ]"#;
        let items: Vec<RawItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].position(), None);
        assert_eq!(items[1].position(), Some(2));
        assert_eq!(items[2].image_path(), None);
    }

    #[test]
    fn test_style_hint_round_trip_fields() {
        let json = r#"{"type": "text", "text": "1. Intro",
            "style": {"font_size": 24.0, "style_name": "Heading 1", "tagged_heading": true}}"#;
        let item: RawItem = serde_json::from_str(json).unwrap();
        match item {
            RawItem::Text { style, .. } => {
                assert!(style.tagged_heading);
                assert_eq!(style.font_size, Some(24.0));
                assert_eq!(style.style_name.as_deref(), Some("Heading 1"));
            }
            _ => panic!("Expected text item"),
        }
    }
}

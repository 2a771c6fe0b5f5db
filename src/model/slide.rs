//! Slide descriptors handed to a rendering backend.

use super::Rect;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Slide layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Title with an empty subtitle
    Title,
    /// Title plus one body region
    TitleAndContent,
    /// Title plus a table grid
    Table,
    /// Title plus a picture
    Image,
}

impl Layout {
    /// Lowercase layout name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Title => "title",
            Layout::TitleAndContent => "title_and_content",
            Layout::Table => "table",
            Layout::Image => "image",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Styling of a slide title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points
    pub font_size_pt: f32,

    /// Horizontal alignment
    pub alignment: Alignment,
}

impl TextStyle {
    /// Create a centered style with the given size.
    pub fn centered(font_size_pt: f32) -> Self {
        Self {
            font_size_pt,
            alignment: Alignment::Center,
        }
    }
}

/// One element in a slide body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyElement {
    /// Plain text
    Text {
        text: String,
        font_size_pt: f32,
        alignment: Alignment,
    },

    /// A grid of cells; rows are padded to `columns`
    Table {
        rows: Vec<Vec<String>>,
        columns: usize,
        /// The first row is a header row
        header_row: bool,
        font_size_pt: f32,
        frame: Rect,
    },

    /// Formula text set in a monospace family
    Formula {
        text: String,
        font_family: String,
        font_size_pt: f32,
        alignment: Alignment,
    },

    /// A picture scaled into `frame`
    Image {
        path: PathBuf,
        frame: Rect,
        native_width_px: u32,
        native_height_px: u32,
    },

    /// Caption text below a picture
    Caption {
        text: String,
        frame: Rect,
        font_size_pt: f32,
    },

    /// Stands in for content that could not be resolved
    Placeholder { message: String },
}

impl BodyElement {
    /// Check if this is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, BodyElement::Placeholder { .. })
    }
}

/// A layout-agnostic description of one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    /// Slide layout
    pub layout: Layout,

    /// Title text
    pub title: String,

    /// Title styling
    pub title_style: TextStyle,

    /// Subtitle, only on title slides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Body elements in drawing order
    #[serde(default)]
    pub body: Vec<BodyElement>,
}

impl SlideDescriptor {
    /// Create a slide with an empty body.
    pub fn new(layout: Layout, title: impl Into<String>, title_style: TextStyle) -> Self {
        Self {
            layout,
            title: title.into(),
            title_style,
            subtitle: None,
            body: Vec::new(),
        }
    }

    /// Set the subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Append a body element.
    pub fn with_element(mut self, element: BodyElement) -> Self {
        self.body.push(element);
        self
    }

    /// Check if any body element is a placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.body.iter().any(BodyElement::is_placeholder)
    }

    /// Get the first picture element, if any.
    pub fn image(&self) -> Option<&BodyElement> {
        self.body
            .iter()
            .find(|e| matches!(e, BodyElement::Image { .. }))
    }
}

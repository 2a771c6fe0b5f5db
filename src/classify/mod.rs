//! Content classification: raw items to typed blocks.
//!
//! Text, tables and images are handled in three independent passes whose
//! outputs are concatenated in that order. Interleaving them back into
//! document order is the organizer's job, driven by `position`. When no
//! item carries a position, each item's index in the input stands in for
//! one.
//!
//! # Example
//!
//! ```
//! use docdeck::classify::Classifier;
//! use docdeck::model::{BlockKind, RawItem, StyleHint};
//!
//! let items = vec![
//!     RawItem::styled_text("1. Intro", StyleHint::new().with_font_size(24.0)),
//!     RawItem::styled_text("Hello world.", StyleHint::new().with_font_size(12.0)),
//! ];
//! let blocks = Classifier::default().classify(&items);
//! assert_eq!(blocks[0].kind(), BlockKind::Heading);
//! assert_eq!(blocks[1].title.as_deref(), Some("1. Intro"));
//! ```

mod formula;
mod heading;
mod normalize;

pub use formula::{strip_delimiters, symbol_count, FormulaDetector, FormulaMatch, MATH_SYMBOLS};
pub use heading::{is_title_word, HeadingConfig, HeadingDetector, HeadingRule, LevelRule};
pub use normalize::{NormalizeOptions, TextNormalizer};

use crate::model::{BlockContent, RawItem, StyleHint, TypedBlock};
use std::borrow::Cow;

/// Classifies raw items into typed blocks.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    headings: HeadingDetector,
    formulas: FormulaDetector,
}

impl Classifier {
    /// Create a classifier with the given heading configuration.
    pub fn new(config: HeadingConfig) -> Self {
        Self {
            headings: HeadingDetector::new(config),
            formulas: FormulaDetector::new(),
        }
    }

    /// Get the heading detector.
    pub fn headings(&self) -> &HeadingDetector {
        &self.headings
    }

    /// Get the formula detector.
    pub fn formulas(&self) -> &FormulaDetector {
        &self.formulas
    }

    /// Check if text is a heading.
    pub fn is_heading(&self, text: &str, style: &StyleHint) -> bool {
        self.headings.is_heading(text, style)
    }

    /// Check if text contains a formula.
    pub fn contains_formula(&self, text: &str) -> bool {
        self.formulas.contains_formula(text)
    }

    /// Classify a sequence of raw items.
    pub fn classify(&self, items: &[RawItem]) -> Vec<TypedBlock> {
        let items = with_source_positions(items);
        let mut blocks = self.classify_text(&items);
        blocks.extend(classify_tables(&items));
        append_images(&items, &mut blocks);

        log::debug!(
            "classified {} items into {} blocks",
            items.len(),
            blocks.len()
        );
        blocks
    }

    /// Run the text pass alone.
    pub fn classify_text(&self, items: &[RawItem]) -> Vec<TypedBlock> {
        let mut fold = TextFold::default();
        for item in items {
            let RawItem::Text {
                text,
                style,
                position,
            } = item
            else {
                continue;
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            if self.headings.is_heading(text, style) {
                let level = self.headings.heading_level(text, style);
                fold.push_heading(text, level, *position);
            } else if let Some(found) = self.formulas.extract(text) {
                fold.push_formula(found, text, *position);
            } else {
                fold.push_line(text, *position);
            }
        }
        fold.finish()
    }
}

/// Accumulator for the text pass.
#[derive(Debug, Default)]
struct TextFold {
    current_heading: Option<String>,
    lines: Vec<String>,
    lines_position: Option<u64>,
    blocks: Vec<TypedBlock>,
}

impl TextFold {
    fn push_heading(&mut self, text: &str, level: u8, position: Option<u64>) {
        self.flush();
        self.blocks
            .push(TypedBlock::heading(text, level).with_position(position));
        self.current_heading = Some(text.to_string());
    }

    fn push_formula(&mut self, found: FormulaMatch, source: &str, position: Option<u64>) {
        let block = TypedBlock::formula(found.text, found.is_latex, source)
            .with_title_opt(self.current_heading.clone())
            .with_position(position);
        self.blocks.push(block);
    }

    fn push_line(&mut self, text: &str, position: Option<u64>) {
        if self.lines.is_empty() {
            self.lines_position = position;
        }
        self.lines.push(text.to_string());
    }

    fn flush(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.lines).join("\n");
        let block = TypedBlock::paragraph(text)
            .with_title_opt(self.current_heading.clone())
            .with_position(self.lines_position.take());
        self.blocks.push(block);
    }

    fn finish(mut self) -> Vec<TypedBlock> {
        self.flush();
        self.blocks
    }
}

/// Number items by their index when none of them carries a position.
///
/// Input with at least one position is returned as is; its unpositioned
/// items keep arrival order after the positioned ones.
pub fn with_source_positions(items: &[RawItem]) -> Cow<'_, [RawItem]> {
    if items.iter().any(|item| item.position().is_some()) {
        return Cow::Borrowed(items);
    }
    Cow::Owned(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| item.clone().with_position(index as u64))
            .collect(),
    )
}

/// Run the table pass: drop blank rows and blank tables, title the rest
/// "Table N" in order.
pub fn classify_tables(items: &[RawItem]) -> Vec<TypedBlock> {
    let mut blocks = Vec::new();
    for item in items {
        let RawItem::Table { rows, position } = item else {
            continue;
        };
        let kept: Vec<Vec<String>> = rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .cloned()
            .collect();
        if kept.is_empty() {
            log::debug!("skipping blank table");
            continue;
        }
        let title = format!("Table {}", blocks.len() + 1);
        blocks.push(
            TypedBlock::table(kept)
                .with_title(title)
                .with_position(*position),
        );
    }
    blocks
}

/// Run the image pass, appending to `blocks`.
pub fn append_images(items: &[RawItem], blocks: &mut Vec<TypedBlock>) {
    for item in items {
        let RawItem::Image {
            path,
            caption,
            description,
            position,
        } = item
        else {
            continue;
        };
        blocks.push(
            TypedBlock::new(BlockContent::Image {
                path: path.clone(),
                caption: caption.clone(),
                description: description.clone(),
            })
            .with_position(*position),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;

    fn sized(text: &str, size: f32) -> RawItem {
        RawItem::styled_text(text, StyleHint::new().with_font_size(size))
    }

    #[test]
    fn test_heading_then_paragraph() {
        let items = vec![sized("1. Intro", 24.0), sized("Hello world.", 12.0)];
        let blocks = Classifier::default().classify(&items);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind(), BlockKind::Heading);
        assert_eq!(blocks[0].heading_level(), Some(1));
        assert_eq!(blocks[0].text(), Some("1. Intro"));
        assert_eq!(blocks[1].kind(), BlockKind::Paragraph);
        assert_eq!(blocks[1].text(), Some("Hello world."));
        assert_eq!(blocks[1].title.as_deref(), Some("1. Intro"));
    }

    #[test]
    fn test_consecutive_lines_join() {
        let items = vec![
            sized("Overview", 18.0),
            RawItem::text("first line here.").with_position(1),
            RawItem::text("second line here.").with_position(2),
            sized("Details", 18.0),
            RawItem::text("third line here."),
        ];
        let blocks = Classifier::default().classify(&items);

        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading,
                BlockKind::Paragraph,
                BlockKind::Heading,
                BlockKind::Paragraph
            ]
        );
        assert_eq!(blocks[1].text(), Some("first line here.\nsecond line here."));
        assert_eq!(blocks[1].title.as_deref(), Some("Overview"));
        assert_eq!(blocks[1].position, Some(1));
        assert_eq!(blocks[3].title.as_deref(), Some("Details"));
    }

    #[test]
    fn test_paragraph_before_any_heading_has_no_title() {
        let blocks = Classifier::default().classify(&[RawItem::text("just some text.")]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, None);
    }

    #[test]
    fn test_formula_does_not_flush_buffer() {
        let items = vec![
            sized("Math", 20.0),
            RawItem::text("we have the following."),
            RawItem::text("so $x^2$ holds"),
            RawItem::text("and more text."),
        ];
        let blocks = Classifier::default().classify(&items);

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind(), BlockKind::Formula);
        assert!(blocks[1].is_latex());
        assert_eq!(blocks[1].text(), Some("x^2"));
        assert_eq!(blocks[1].title.as_deref(), Some("Math"));
        assert_eq!(
            blocks[2].text(),
            Some("we have the following.\nand more text.")
        );
    }

    #[test]
    fn test_symbol_formula_keeps_full_text() {
        let blocks = Classifier::default().classify(&[RawItem::text("area = width × height")]);
        assert_eq!(blocks.len(), 1);
        match &blocks[0].content {
            BlockContent::Formula {
                text,
                is_latex,
                source_text,
            } => {
                assert_eq!(text, "area = width × height");
                assert!(!is_latex);
                assert_eq!(source_text, "area = width × height");
            }
            other => panic!("Expected formula, got {:?}", other),
        }
    }

    #[test]
    fn test_heading_wins_over_formula() {
        let blocks = Classifier::default().classify(&[sized("a + b = c", 28.0)]);
        assert_eq!(blocks[0].kind(), BlockKind::Heading);
    }

    #[test]
    fn test_blank_table_dropped() {
        let items = vec![RawItem::table(vec![
            vec!["".into(), "  ".into()],
            vec!["\t".into()],
        ])];
        assert!(Classifier::default().classify(&items).is_empty());
    }

    #[test]
    fn test_blank_rows_excluded_and_numbered() {
        let items = vec![
            RawItem::table(vec![vec!["".into()]]),
            RawItem::table(vec![
                vec!["".into(), "".into()],
                vec!["".into(), " x ".into()],
            ]),
            RawItem::table(vec![vec!["a".into()]]),
        ];
        let blocks = Classifier::default().classify(&items);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].title.as_deref(), Some("Table 1"));
        assert_eq!(blocks[1].title.as_deref(), Some("Table 2"));
        match &blocks[0].content {
            BlockContent::Table { rows } => {
                assert_eq!(rows, &vec![vec!["".to_string(), " x ".to_string()]]);
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_index_positions_without_any_position() {
        let items = vec![
            RawItem::text("some text."),
            RawItem::image("a.png").with_caption("Figure"),
            RawItem::table(vec![vec!["a".into()]]),
            RawItem::image("c.png"),
        ];
        let blocks = Classifier::default().classify(&items);

        let positions: Vec<Option<u64>> = blocks.iter().map(|b| b.position).collect();
        assert_eq!(positions, vec![Some(0), Some(2), Some(1), Some(3)]);
        match &blocks[2].content {
            BlockContent::Image { caption, .. } => assert_eq!(caption.as_deref(), Some("Figure")),
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_unpositioned_image_keeps_none_among_positioned() {
        let items = vec![
            RawItem::text("some text.").with_position(0),
            RawItem::image("b.png").with_position(1),
            RawItem::image("c.png"),
        ];
        let blocks = Classifier::default().classify(&items);

        assert_eq!(blocks[1].position, Some(1));
        assert_eq!(blocks[2].position, None);
    }

    #[test]
    fn test_empty_text_skipped() {
        let blocks = Classifier::default().classify(&[RawItem::text("   ")]);
        assert!(blocks.is_empty());
    }
}

//! Markdown handout rendering for decks.

use crate::model::{BodyElement, Deck, Layout, SlideDescriptor};

/// Options for Markdown output.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Escape characters that Markdown would interpret
    pub escape_special_chars: bool,

    /// Put a horizontal rule between slides
    pub slide_separators: bool,

    /// Emit formulas in `$$` blocks instead of code fences
    pub latex_math: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            escape_special_chars: true,
            slide_separators: true,
            latex_math: false,
        }
    }
}

impl MarkdownOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable escaping.
    pub fn with_escaping(mut self, enabled: bool) -> Self {
        self.escape_special_chars = enabled;
        self
    }

    /// Enable or disable separators between slides.
    pub fn with_separators(mut self, enabled: bool) -> Self {
        self.slide_separators = enabled;
        self
    }

    /// Emit formulas as display math.
    pub fn with_latex_math(mut self, enabled: bool) -> Self {
        self.latex_math = enabled;
        self
    }
}

/// Render a deck as a Markdown handout.
pub fn to_markdown(deck: &Deck, options: &MarkdownOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(deck)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Render a deck to Markdown.
    pub fn render(&self, deck: &Deck) -> String {
        let mut output = String::new();
        for (i, slide) in deck.slides.iter().enumerate() {
            if i > 0 && self.options.slide_separators {
                output.push_str("---\n\n");
            }
            self.render_slide(&mut output, slide);
        }
        output.trim().to_string()
    }

    fn render_slide(&self, output: &mut String, slide: &SlideDescriptor) {
        let prefix = if slide.layout == Layout::Title { "#" } else { "##" };
        output.push_str(prefix);
        output.push(' ');
        output.push_str(&self.text(&slide.title));
        output.push_str("\n\n");

        for element in &slide.body {
            self.render_element(output, element);
        }
    }

    fn render_element(&self, output: &mut String, element: &BodyElement) {
        match element {
            BodyElement::Text { text, .. } => {
                output.push_str(&self.text(text));
                output.push_str("\n\n");
            }
            BodyElement::Table {
                rows, header_row, ..
            } => self.render_table(output, rows, *header_row),
            BodyElement::Formula { text, .. } => {
                let fence = if self.options.latex_math { "$$" } else { "```" };
                output.push_str(&format!("{}\n{}\n{}\n\n", fence, text, fence));
            }
            BodyElement::Image { path, .. } => {
                output.push_str(&format!("![]({})\n\n", path.display()));
            }
            BodyElement::Caption { text, .. } => {
                output.push('*');
                output.push_str(&self.text(text));
                output.push_str("*\n\n");
            }
            BodyElement::Placeholder { message } => {
                output.push_str("> ");
                output.push_str(&self.text(message));
                output.push_str("\n\n");
            }
        }
    }

    fn render_table(&self, output: &mut String, rows: &[Vec<String>], header_row: bool) {
        let Some(columns) = rows.iter().map(Vec::len).max().filter(|c| *c > 0) else {
            return;
        };

        for (i, row) in rows.iter().enumerate() {
            output.push('|');
            for col in 0..columns {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                let content = self.text(&cell.replace('\n', " "));
                output.push_str(&format!(" {} |", content.trim()));
            }
            output.push('\n');

            // GFM needs a delimiter row after the first row either way
            if i == 0 {
                output.push('|');
                output.push_str(&" --- |".repeat(columns));
                output.push('\n');
                if !header_row {
                    log::debug!("table without header row rendered with first row as header");
                }
            }
        }
        output.push('\n');
    }

    fn text(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

/// Escape special Markdown characters.
/// Only characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Rect, SlideSize, TextStyle};

    fn deck_with(slides: Vec<SlideDescriptor>) -> Deck {
        let mut deck = Deck::new(SlideSize::default());
        deck.slides = slides;
        deck
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
    }

    #[test]
    fn test_render_title_and_text() {
        let deck = deck_with(vec![
            SlideDescriptor::new(Layout::Title, "Intro", TextStyle::centered(44.0)),
            SlideDescriptor::new(Layout::TitleAndContent, "Intro", TextStyle::centered(32.0))
                .with_element(BodyElement::Text {
                    text: "Hello, world!".into(),
                    font_size_pt: 24.0,
                    alignment: Alignment::Left,
                }),
        ]);
        let md = to_markdown(&deck, &MarkdownOptions::default());
        assert!(md.starts_with("# Intro"));
        assert!(md.contains("---\n\n## Intro"));
        assert!(md.contains("Hello, world!"));
    }

    #[test]
    fn test_render_table_pads_columns() {
        let deck = deck_with(vec![SlideDescriptor::new(
            Layout::Table,
            "Table 1",
            TextStyle::centered(32.0),
        )
        .with_element(BodyElement::Table {
            rows: vec![vec!["A".into(), "B".into()], vec!["1".into()]],
            columns: 2,
            header_row: true,
            font_size_pt: 18.0,
            frame: Rect::default(),
        })]);
        let md = to_markdown(&deck, &MarkdownOptions::default());
        assert!(md.contains("| A | B |\n| --- | --- |\n| 1 |  |"));
    }

    #[test]
    fn test_render_formula_fence() {
        let slide = SlideDescriptor::new(Layout::TitleAndContent, "Formula", TextStyle::centered(32.0))
            .with_element(BodyElement::Formula {
                text: "E = mc^2".into(),
                font_family: "Courier New".into(),
                font_size_pt: 32.0,
                alignment: Alignment::Center,
            });
        let deck = deck_with(vec![slide]);

        let md = to_markdown(&deck, &MarkdownOptions::default());
        assert!(md.contains("```\nE = mc^2\n```"));

        let md = to_markdown(&deck, &MarkdownOptions::new().with_latex_math(true));
        assert!(md.contains("$$\nE = mc^2\n$$"));
    }

    #[test]
    fn test_render_placeholder() {
        let deck = deck_with(vec![SlideDescriptor::new(
            Layout::Image,
            "Image",
            TextStyle::centered(32.0),
        )
        .with_element(BodyElement::Placeholder {
            message: "Image not found".into(),
        })]);
        let md = to_markdown(&deck, &MarkdownOptions::new().with_separators(false));
        assert!(md.contains("> Image not found"));
    }
}

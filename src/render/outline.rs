//! Plain-text slide outline.

use crate::model::{BodyElement, Deck, Layout, SlideDescriptor};

/// Longest body preview shown per element, in characters.
const PREVIEW_CHARS: usize = 60;

/// Render a numbered outline of the deck, one line per slide followed by
/// indented body previews.
pub fn to_outline(deck: &Deck) -> String {
    let mut output = String::new();
    for (index, slide) in deck.slides.iter().enumerate() {
        render_slide(&mut output, index + 1, slide);
    }

    if let Some(truncation) = deck.truncation {
        output.push_str(&format!(
            "... {} more slides dropped (kept {} of {})\n",
            truncation.dropped(),
            truncation.kept,
            truncation.produced
        ));
    }
    output
}

fn render_slide(output: &mut String, number: usize, slide: &SlideDescriptor) {
    let marker = if slide.layout == Layout::Title { "#" } else { "-" };
    output.push_str(&format!(
        "{:>3}. {} {} [{}]\n",
        number,
        marker,
        slide.title,
        slide.layout.as_str()
    ));

    for element in &slide.body {
        output.push_str("       ");
        output.push_str(&describe(element));
        output.push('\n');
    }
}

fn describe(element: &BodyElement) -> String {
    match element {
        BodyElement::Text { text, .. } => preview(text),
        BodyElement::Table { rows, columns, .. } => {
            format!("table {}x{}", rows.len(), columns)
        }
        BodyElement::Formula { text, .. } => format!("formula: {}", preview(text)),
        BodyElement::Image { path, .. } => format!("image: {}", path.display()),
        BodyElement::Caption { text, .. } => format!("caption: {}", preview(text)),
        BodyElement::Placeholder { message } => format!("placeholder: {}", message),
    }
}

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, SlideSize, TextStyle, Truncation};

    #[test]
    fn test_outline_lines() {
        let mut deck = Deck::new(SlideSize::default());
        deck.slides.push(SlideDescriptor::new(
            Layout::Title,
            "Intro",
            TextStyle::centered(44.0),
        ));
        deck.slides.push(
            SlideDescriptor::new(Layout::TitleAndContent, "Intro", TextStyle::centered(32.0))
                .with_element(BodyElement::Text {
                    text: "First line\nsecond line".into(),
                    font_size_pt: 24.0,
                    alignment: Alignment::Left,
                }),
        );
        deck.slides.push(
            SlideDescriptor::new(Layout::Image, "Image", TextStyle::centered(32.0)).with_element(
                BodyElement::Placeholder {
                    message: "Image not found".into(),
                },
            ),
        );

        let outline = to_outline(&deck);
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines[0], "  1. # Intro [title]");
        assert_eq!(lines[1], "  2. - Intro [title_and_content]");
        assert_eq!(lines[2].trim(), "First line...");
        assert_eq!(lines[4].trim(), "placeholder: Image not found");
    }

    #[test]
    fn test_outline_reports_truncation() {
        let mut deck = Deck::new(SlideSize::default());
        deck.truncation = Some(Truncation {
            produced: 5,
            kept: 1,
        });
        assert!(to_outline(&deck).contains("4 more slides dropped"));
    }

    #[test]
    fn test_preview_long_line() {
        let long = "x".repeat(100);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }
}

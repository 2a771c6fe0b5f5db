//! JSON serialization of decks.

use crate::error::{Error, Result};
use crate::model::Deck;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a deck to JSON.
pub fn to_json(deck: &Deck, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(deck),
        JsonFormat::Compact => serde_json::to_string(deck),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read a deck back from JSON.
pub fn from_json(json: &str) -> Result<Deck> {
    serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("invalid deck JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Layout, SlideDescriptor, SlideSize, TextStyle};

    fn sample_deck() -> Deck {
        let mut deck = Deck::new(SlideSize::default());
        deck.slides.push(
            SlideDescriptor::new(Layout::Title, "Intro", TextStyle::centered(44.0))
                .with_subtitle(""),
        );
        deck
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample_deck(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Intro"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample_deck(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(!json.contains("truncation"));
    }

    #[test]
    fn test_from_json() {
        let deck = sample_deck();
        let json = to_json(&deck, JsonFormat::Compact).unwrap();
        assert_eq!(from_json(&json).unwrap(), deck);
        assert!(from_json("{}").is_err());
    }
}

//! Heading detection and level assignment.
//!
//! Both decisions are ordered rule tables: the first rule that matches wins.

use crate::model::StyleHint;
use regex::Regex;

/// Configuration for heading detection.
#[derive(Debug, Clone)]
pub struct HeadingConfig {
    /// Font size (points) that text must exceed to be a heading
    pub min_font_size: f32,

    /// Title-case text must have fewer words than this
    pub max_title_words: usize,

    /// Fraction of title-cased words title-case text must exceed
    pub title_case_ratio: f32,

    /// Font size thresholds for levels 1-4; anything smaller is level 5
    pub level_font_steps: [f32; 4],

    /// Level used when no level rule matches
    pub default_level: u8,
}

impl HeadingConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the large-font threshold.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self
    }

    /// Set the title-case word limit.
    pub fn with_max_title_words(mut self, words: usize) -> Self {
        self.max_title_words = words;
        self
    }

    /// Set the title-case ratio.
    pub fn with_title_case_ratio(mut self, ratio: f32) -> Self {
        self.title_case_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the font size steps for levels 1-4.
    pub fn with_level_font_steps(mut self, steps: [f32; 4]) -> Self {
        self.level_font_steps = steps;
        self
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            min_font_size: 14.0,
            max_title_words: 10,
            title_case_ratio: 0.7,
            level_font_steps: [24.0, 20.0, 16.0, 14.0],
            default_level: 1,
        }
    }
}

/// Rules deciding whether text is a heading, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingRule {
    /// The reader tagged the item as a heading
    Tagged,
    /// Font size above the threshold
    LargeFont,
    /// Numbered ("1. ", "1.2 ") or all-uppercase text
    Pattern,
    /// Short text made mostly of title-cased words
    TitleCase,
}

impl HeadingRule {
    /// All rules in evaluation order.
    pub const ORDER: [HeadingRule; 4] = [
        HeadingRule::Tagged,
        HeadingRule::LargeFont,
        HeadingRule::Pattern,
        HeadingRule::TitleCase,
    ];
}

/// Rules assigning a heading level, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRule {
    /// "Heading N" style names and localized equivalents
    StyleName,
    /// Font size steps
    FontSize,
    /// Dotted numeric prefix depth ("1.2.3 " is level 3)
    NumericPrefix,
}

impl LevelRule {
    /// All rules in evaluation order.
    pub const ORDER: [LevelRule; 3] = [
        LevelRule::StyleName,
        LevelRule::FontSize,
        LevelRule::NumericPrefix,
    ];
}

/// Localized prefixes of "Heading N" style names, lowercase.
const STYLE_NAME_PREFIXES: [&str; 3] = ["heading ", "标题", "заголовок "];

/// Heading detector holding compiled patterns.
#[derive(Debug, Clone)]
pub struct HeadingDetector {
    config: HeadingConfig,
    numbered: Regex,
    sub_numbered: Regex,
    uppercase: Regex,
    numeric_prefix: Regex,
}

impl HeadingDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: HeadingConfig) -> Self {
        Self {
            config,
            numbered: Regex::new(r"^\d+\.\s+.*$").unwrap(),
            sub_numbered: Regex::new(r"^\d+\.\d+\s+.*$").unwrap(),
            uppercase: Regex::new(r"^[A-Z\s\W]+$").unwrap(),
            numeric_prefix: Regex::new(r"^(\d+)(\.\d+)*\s").unwrap(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    /// Check if text is a heading.
    pub fn is_heading(&self, text: &str, style: &StyleHint) -> bool {
        self.matched_rule(text, style).is_some()
    }

    /// Return the first heading rule that matches.
    pub fn matched_rule(&self, text: &str, style: &StyleHint) -> Option<HeadingRule> {
        HeadingRule::ORDER
            .into_iter()
            .find(|rule| self.rule_matches(*rule, text, style))
    }

    fn rule_matches(&self, rule: HeadingRule, text: &str, style: &StyleHint) -> bool {
        match rule {
            HeadingRule::Tagged => style.tagged_heading,
            HeadingRule::LargeFont => style
                .font_size
                .is_some_and(|size| size > self.config.min_font_size),
            HeadingRule::Pattern => {
                self.numbered.is_match(text)
                    || self.sub_numbered.is_match(text)
                    || self.uppercase.is_match(text)
            }
            HeadingRule::TitleCase => self.is_title_case_line(text),
        }
    }

    fn is_title_case_line(&self, text: &str) -> bool {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() || words.len() >= self.config.max_title_words {
            return false;
        }
        if !is_title_word(words[0]) {
            return false;
        }
        let titled = words.iter().filter(|w| is_title_word(w)).count();
        titled as f32 / words.len() as f32 > self.config.title_case_ratio
    }

    /// Assign a heading level (1-6).
    pub fn heading_level(&self, text: &str, style: &StyleHint) -> u8 {
        self.level_rule(text, style)
            .map(|(_, level)| level)
            .unwrap_or(self.config.default_level)
            .clamp(1, 6)
    }

    /// Return the first level rule that matches together with its level.
    pub fn level_rule(&self, text: &str, style: &StyleHint) -> Option<(LevelRule, u8)> {
        LevelRule::ORDER
            .into_iter()
            .find_map(|rule| self.level_for(rule, text, style).map(|level| (rule, level)))
    }

    fn level_for(&self, rule: LevelRule, text: &str, style: &StyleHint) -> Option<u8> {
        match rule {
            LevelRule::StyleName => style.style_name.as_deref().and_then(style_name_level),
            LevelRule::FontSize => {
                let size = style.font_size.filter(|s| *s > 0.0)?;
                let level = self
                    .config
                    .level_font_steps
                    .iter()
                    .position(|step| size >= *step)
                    .map(|i| i as u8 + 1)
                    .unwrap_or(5);
                Some(level)
            }
            LevelRule::NumericPrefix => {
                let prefix = self.numeric_prefix.find(text)?;
                let depth = prefix.as_str().trim_end().split('.').count();
                Some(depth.min(6) as u8)
            }
        }
    }
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new(HeadingConfig::default())
    }
}

fn style_name_level(name: &str) -> Option<u8> {
    let lower = name.to_lowercase();
    (1..=6u8).find(|level| {
        STYLE_NAME_PREFIXES
            .iter()
            .any(|prefix| lower.contains(&format!("{}{}", prefix, level)))
    })
}

/// Title-case test for a single word: uppercase only after uncased
/// characters, lowercase only after cased ones, at least one cased character.
pub fn is_title_word(word: &str) -> bool {
    let mut previous_cased = false;
    let mut any_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else {
            previous_cased = false;
        }
    }
    any_cased
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> HeadingDetector {
        HeadingDetector::default()
    }

    fn plain() -> StyleHint {
        StyleHint::default()
    }

    #[test]
    fn test_large_font_is_heading_regardless_of_text() {
        let d = detector();
        let style = StyleHint::new().with_font_size(14.5);
        assert_eq!(
            d.matched_rule("this is all lowercase and rather long text", &style),
            Some(HeadingRule::LargeFont)
        );
        let style = StyleHint::new().with_font_size(14.0);
        assert!(!d.is_heading("this is all lowercase and rather long text", &style));
    }

    #[test]
    fn test_tagged_wins_first() {
        let style = StyleHint::new().tagged().with_font_size(30.0);
        assert_eq!(detector().matched_rule("x", &style), Some(HeadingRule::Tagged));
    }

    #[test]
    fn test_numbered_patterns() {
        let d = detector();
        assert_eq!(
            d.matched_rule("1. introduction to things", &plain()),
            Some(HeadingRule::Pattern)
        );
        assert_eq!(
            d.matched_rule("2.3 methods and results", &plain()),
            Some(HeadingRule::Pattern)
        );
        assert!(!d.is_heading("1.a not numbered", &plain()));
    }

    #[test]
    fn test_uppercase_pattern() {
        let d = detector();
        assert!(d.is_heading("RESULTS AND DISCUSSION", &plain()));
        assert!(!d.is_heading("RESULTS 2024", &plain()));
    }

    #[test]
    fn test_title_case_rule() {
        let d = detector();
        assert_eq!(
            d.matched_rule("Background And Motivation", &plain()),
            Some(HeadingRule::TitleCase)
        );
        assert!(!d.is_heading("Hello world.", &plain()));
        assert!(!d.is_heading("the Quick Brown Fox", &plain()));
        // ten words is too many
        assert!(!d.is_heading("One Two Three Four Five Six Seven Eight Nine Ten", &plain()));
    }

    #[test]
    fn test_is_title_word() {
        assert!(is_title_word("Hello"));
        assert!(is_title_word("Intro,"));
        assert!(is_title_word("A"));
        assert!(is_title_word("O'Neil"));
        assert!(!is_title_word("HELLO"));
        assert!(!is_title_word("hello"));
        assert!(!is_title_word("1."));
    }

    #[test]
    fn test_level_from_style_name() {
        let d = detector();
        let style = StyleHint::new()
            .with_style_name("Heading 3")
            .with_font_size(30.0);
        assert_eq!(d.level_rule("Text", &style), Some((LevelRule::StyleName, 3)));
        let style = StyleHint::new().with_style_name("标题2");
        assert_eq!(d.heading_level("Text", &style), 2);
    }

    #[test]
    fn test_level_from_font_size() {
        let d = detector();
        let level = |size: f32| d.heading_level("Text", &StyleHint::new().with_font_size(size));
        assert_eq!(level(24.0), 1);
        assert_eq!(level(20.0), 2);
        assert_eq!(level(16.0), 3);
        assert_eq!(level(14.0), 4);
        assert_eq!(level(12.0), 5);
    }

    #[test]
    fn test_font_size_beats_numeric_prefix() {
        let d = detector();
        let style = StyleHint::new().with_font_size(24.0);
        assert_eq!(d.heading_level("1.2.3 Deep", &style), 1);
    }

    #[test]
    fn test_level_from_numeric_prefix() {
        let d = detector();
        assert_eq!(
            d.level_rule("1.2 Methods", &plain()),
            Some((LevelRule::NumericPrefix, 2))
        );
        assert_eq!(d.heading_level("1.2.3 Deep", &plain()), 3);
        // "1." has no digit after the dot, so the prefix rule does not apply
        assert_eq!(d.level_rule("1. Intro", &plain()), None);
        assert_eq!(d.heading_level("1. Intro", &plain()), 1);
    }

    #[test]
    fn test_config_builder() {
        let config = HeadingConfig::new()
            .with_min_font_size(18.0)
            .with_max_title_words(5)
            .with_title_case_ratio(2.0);
        assert_eq!(config.min_font_size, 18.0);
        assert_eq!(config.max_title_words, 5);
        assert_eq!(config.title_case_ratio, 1.0);
    }
}

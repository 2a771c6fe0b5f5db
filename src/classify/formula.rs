//! Formula detection: delimited math markup and math-symbol density.

use regex::Regex;

/// Symbols counted toward formula detection.
pub const MATH_SYMBOLS: [char; 12] = [
    '+', '-', '=', '×', '÷', 'π', '√', '∫', '∑', '∏', '^', '_',
];

/// Text with more than this many math symbols is a formula.
const SYMBOL_THRESHOLD: usize = 1;

/// A formula found in a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaMatch {
    /// Extracted markup with delimiters stripped, or the full text
    pub text: String,

    /// Text was found inside math delimiters
    pub is_latex: bool,
}

/// Formula detector holding compiled patterns.
#[derive(Debug, Clone)]
pub struct FormulaDetector {
    delimited: Regex,
}

impl FormulaDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self {
            // $$...$$ must be tried before $...$
            delimited: Regex::new(r"\$\$(.+?)\$\$|\\\[(.+?)\\\]|\\\((.+?)\\\)|\$([^$]*)\$")
                .unwrap(),
        }
    }

    /// Check if text contains a formula.
    ///
    /// Empty delimiters such as `$$` count as a delimited formula.
    pub fn contains_formula(&self, text: &str) -> bool {
        self.delimited.is_match(text) || symbol_count(text) > SYMBOL_THRESHOLD
    }

    /// Extract the formula from text, if there is one.
    ///
    /// All non-empty delimited parts are joined with a single space; when
    /// every delimited part is empty the whole text is kept. Text that
    /// qualifies only by symbol count is returned whole.
    pub fn extract(&self, text: &str) -> Option<FormulaMatch> {
        if self.delimited.is_match(text) {
            let parts = self.delimited_parts(text);
            let text = if parts.is_empty() {
                text.trim().to_string()
            } else {
                parts.join(" ")
            };
            return Some(FormulaMatch {
                text,
                is_latex: true,
            });
        }
        if symbol_count(text) > SYMBOL_THRESHOLD {
            return Some(FormulaMatch {
                text: text.to_string(),
                is_latex: false,
            });
        }
        None
    }

    fn delimited_parts<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.delimited
            .captures_iter(text)
            .filter_map(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .next()
                    .map(|m| m.as_str().trim())
            })
            .filter(|inner| !inner.is_empty())
            .collect()
    }
}

impl Default for FormulaDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Count math symbols in text.
pub fn symbol_count(text: &str) -> usize {
    text.chars().filter(|c| MATH_SYMBOLS.contains(c)).count()
}

/// Remove display delimiters left around formula text.
pub fn strip_delimiters(text: &str) -> &str {
    text.trim().trim_matches('$').trim()
}

//! Text normalization applied to raw items before classification.

use crate::model::RawItem;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Options for text normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Collapse runs of spaces and tabs into one space
    pub collapse_whitespace: bool,
}

impl NormalizeOptions {
    /// Unicode normalization only.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            remove_replacement_char: false,
            collapse_whitespace: false,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            collapse_whitespace: true,
        }
    }
}

/// Text normalizer.
pub struct TextNormalizer {
    options: NormalizeOptions,
    blank_run: Regex,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl TextNormalizer {
    /// Create a new normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            blank_run: Regex::new(r"[ \t\u{00A0}]{2,}|\t").unwrap(),
            ligature_map: vec![
                ("\u{FB00}", "ff"),
                ("\u{FB01}", "fi"),
                ("\u{FB02}", "fl"),
                ("\u{FB03}", "ffi"),
                ("\u{FB04}", "ffl"),
                ("\u{FB05}", "st"),
                ("\u{FB06}", "st"),
            ],
        }
    }

    /// Normalize one string.
    pub fn process(&self, text: &str) -> String {
        let mut result = if self.options.normalize_unicode {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.collapse_whitespace {
            result = self.blank_run.replace_all(&result, " ").into_owned();
        }

        result.trim().to_string()
    }

    /// Normalize the text carried by an item: paragraph text, table cells
    /// and captions.
    pub fn process_item(&self, item: &RawItem) -> RawItem {
        match item {
            RawItem::Text {
                text,
                style,
                position,
            } => RawItem::Text {
                text: self.process(text),
                style: style.clone(),
                position: *position,
            },
            RawItem::Table { rows, position } => RawItem::Table {
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|cell| self.process(cell)).collect())
                    .collect(),
                position: *position,
            },
            RawItem::Image {
                path,
                caption,
                description,
                position,
            } => RawItem::Image {
                path: path.clone(),
                caption: caption.as_deref().map(|c| self.process(c)),
                description: description.clone(),
                position: *position,
            },
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

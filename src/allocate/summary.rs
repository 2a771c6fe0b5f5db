//! Character-budget text summarization at sentence boundaries.

use regex::Regex;
use std::sync::OnceLock;

/// Default character budget.
pub const DEFAULT_BUDGET: usize = 200;

/// Marker appended to shortened text.
pub const ELLIPSIS: &str = "...";

/// Room reserved for the ellipsis and a separator when taking sentences.
const ELLIPSIS_ALLOWANCE: usize = 4;

fn sentence_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[。！？.!?]\s+").unwrap())
}

/// Split text after sentence-ending punctuation followed by whitespace.
/// The punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in sentence_break().find_iter(text) {
        let punct_len = text[m.start()..]
            .chars()
            .next()
            .map_or(0, char::len_utf8);
        sentences.push(&text[start..m.start() + punct_len]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Shorten text to at most `budget` characters.
///
/// Text within budget is returned unchanged. Longer text keeps as many
/// leading whole sentences as fit and ends with `...`; when not even one
/// sentence fits, it is cut to `budget - 3` characters plus `...`.
pub fn summarize(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }

    let mut taken = Vec::new();
    let mut used = 0;
    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if used + len + ELLIPSIS_ALLOWANCE > budget {
            break;
        }
        taken.push(sentence);
        used += len;
    }

    if !taken.is_empty() {
        let summary = format!("{}{}", taken.join(" "), ELLIPSIS);
        if summary.chars().count() <= budget {
            return summary;
        }
    }
    truncate(text, budget)
}

/// Hard-cut text to `budget` characters including the ellipsis.
pub fn truncate(text: &str, budget: usize) -> String {
    if budget < ELLIPSIS.len() {
        return ELLIPSIS[..budget].to_string();
    }
    let mut out: String = text.chars().take(budget - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

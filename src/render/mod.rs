//! Output for finished decks: JSON, a plain-text outline and a Markdown
//! handout.

mod json;
mod markdown;
mod outline;

pub use json::{from_json, to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownOptions, MarkdownRenderer};
pub use outline::to_outline;

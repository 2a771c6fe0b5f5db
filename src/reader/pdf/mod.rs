//! PDF reader: text lines and alignment-detected tables per page.
//!
//! Each page's content stream is interpreted for text placement, spans are
//! grouped into lines top to bottom, and runs of column-aligned lines
//! become tables. Every line is one text item carrying its font size, so
//! heading detection works on PDF input too. Pictures are not extracted.

mod layout;
mod text;

pub use layout::{LayoutConfig, PageBlock, PageLayout, TextLine};
pub use text::{decode_string, page_spans, TextSpan};

use super::{DocumentReader, ReadOutput};
use crate::error::Result;
use crate::model::{RawItem, StyleHint};
use lopdf::content::Content;
use lopdf::Document;

/// Positions reserved per page; items are numbered `page * PAGE_STRIDE + n`.
pub const PAGE_STRIDE: u64 = 1_000_000;

/// Reader for PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PdfReader {
    layout: PageLayout,
}

impl PdfReader {
    /// Create a reader with default layout analysis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader with custom layout analysis.
    pub fn with_layout(config: LayoutConfig) -> Self {
        Self {
            layout: PageLayout::with_config(config),
        }
    }

    /// Parse a PDF into raw items.
    ///
    /// Pages whose content cannot be decoded are skipped with a warning.
    pub fn parse(&self, bytes: &[u8]) -> Result<Vec<RawItem>> {
        let doc = Document::load_mem(bytes)?;
        let mut items = Vec::new();

        for (page_number, page_id) in doc.get_pages() {
            let content = match doc
                .get_page_content(page_id)
                .and_then(|data| Content::decode(&data))
            {
                Ok(content) => content,
                Err(e) => {
                    log::warn!("skipping page {}: {}", page_number, e);
                    continue;
                }
            };

            let spans = page_spans(&content.operations);
            let blocks = self.layout.blocks(spans);
            log::debug!("page {}: {} blocks", page_number, blocks.len());

            for (index, block) in blocks.into_iter().enumerate() {
                let position = page_position(page_number, index);
                let item = match block {
                    PageBlock::Line(line) => RawItem::styled_text(
                        line.text(),
                        StyleHint::new().with_font_size(line.font_size),
                    ),
                    PageBlock::Table(rows) => RawItem::table(rows),
                };
                items.push(item.with_position(position));
            }
        }

        Ok(items)
    }
}

/// Position of the `index`-th block on a page.
pub fn page_position(page_number: u32, index: usize) -> u64 {
    u64::from(page_number) * PAGE_STRIDE + index as u64
}

impl DocumentReader for PdfReader {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<ReadOutput> {
        Ok(ReadOutput::new(self.parse(bytes)?))
    }
}

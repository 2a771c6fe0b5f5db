//! Layout options for slide allocation.

use crate::model::{inches, Emu, Rect, SlideSize};

/// Character budget for paragraph slides.
pub const PARAGRAPH_BUDGET: usize = 500;

/// Options controlling slide geometry and text budgets.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Slide dimensions
    pub slide_size: SlideSize,

    /// Resolution assumed for pixel-sized pictures
    pub dpi: f64,

    /// Left and right margin of the picture region
    pub side_margin: Emu,

    /// Top of the picture region
    pub image_top: Emu,

    /// Bottom margin of the picture region
    pub bottom_margin: Emu,

    /// Gap between a picture and its caption
    pub caption_gap: Emu,

    /// Caption box height
    pub caption_height: Emu,

    /// Frame of table grids
    pub table_frame: Rect,

    /// Character budget for paragraph bodies
    pub paragraph_budget: usize,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slide size.
    pub fn with_slide_size(mut self, size: SlideSize) -> Self {
        self.slide_size = size;
        self
    }

    /// Set the assumed picture resolution.
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the paragraph character budget.
    pub fn with_paragraph_budget(mut self, budget: usize) -> Self {
        self.paragraph_budget = budget;
        self
    }

    /// Region pictures are fitted into.
    pub fn image_region(&self) -> Rect {
        let width = self.slide_size.width - 2 * self.side_margin;
        let height = self.slide_size.height - self.image_top - self.bottom_margin;
        Rect::new(self.side_margin, self.image_top, width.max(0), height.max(0))
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            slide_size: SlideSize::default(),
            dpi: 96.0,
            side_margin: inches(1.0),
            image_top: inches(2.5),
            bottom_margin: inches(1.0),
            caption_gap: inches(0.2),
            caption_height: inches(0.5),
            table_frame: Rect::from_inches(1.0, 2.0, 11.0, 4.0),
            paragraph_budget: PARAGRAPH_BUDGET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_image_region() {
        let region = LayoutOptions::default().image_region();
        assert_eq!(region.left, inches(1.0));
        assert_eq!(region.top, inches(2.5));
        assert_eq!(region.width, inches(13.33) - inches(2.0));
        assert_eq!(region.height, inches(4.0));
    }

    #[test]
    fn test_builder() {
        let options = LayoutOptions::new()
            .with_dpi(72.0)
            .with_paragraph_budget(120)
            .with_slide_size(SlideSize::standard());
        assert_eq!(options.dpi, 72.0);
        assert_eq!(options.paragraph_budget, 120);
        assert_eq!(options.image_region().width, inches(8.0));
    }
}

//! Slide allocation: outline nodes to slide descriptors.
//!
//! Every section yields a title slide followed by one slide per content
//! block. Loose blocks yield one slide each. Picture slides are always
//! emitted; an unresolvable reference produces a placeholder body instead
//! of an error.

mod geometry;
mod options;
mod probe;
mod summary;

pub use geometry::{caption_frame, fit_image};
pub use options::{LayoutOptions, PARAGRAPH_BUDGET};
pub use probe::{FsImageProbe, ImageInfo, ImageProbe};
pub use summary::{split_sentences, summarize, truncate, DEFAULT_BUDGET, ELLIPSIS};

use crate::classify::strip_delimiters;
use crate::model::{
    Alignment, BlockContent, BodyElement, Layout, OutlineNode, Section, SlideDescriptor,
    TextStyle, TypedBlock,
};
use std::path::Path;

/// Section title size in points.
pub const SECTION_TITLE_PT: f32 = 44.0;
/// Content slide title size in points.
pub const TITLE_PT: f32 = 32.0;
/// Paragraph body size in points.
pub const BODY_PT: f32 = 24.0;
/// Table cell size in points.
pub const TABLE_PT: f32 = 18.0;
/// Formula size in points.
pub const FORMULA_PT: f32 = 32.0;
/// Caption size in points.
pub const CAPTION_PT: f32 = 14.0;
/// Font family for formulas.
pub const MONOSPACE_FAMILY: &str = "Courier New";
/// Suffix appended to titles of LaTeX formula slides.
pub const LATEX_SUFFIX: &str = " (LaTeX)";

/// Maps an organized outline to slide descriptors.
pub struct Allocator {
    options: LayoutOptions,
    probe: Box<dyn ImageProbe>,
}

impl Allocator {
    /// Create an allocator that resolves pictures from the filesystem.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            probe: Box::new(FsImageProbe::new()),
        }
    }

    /// Replace the image probe.
    pub fn with_probe(mut self, probe: impl ImageProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Get the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Allocate slides for an outline.
    pub fn allocate(&self, nodes: &[OutlineNode]) -> Vec<SlideDescriptor> {
        let mut slides = Vec::new();
        for node in nodes {
            match node {
                OutlineNode::Section(section) => self.push_section(section, &mut slides),
                OutlineNode::Block(block) => slides.push(self.block_slide(block, None)),
            }
        }
        log::debug!("allocated {} slides", slides.len());
        slides
    }

    fn push_section(&self, section: &Section, slides: &mut Vec<SlideDescriptor>) {
        slides.push(title_slide(&section.title));
        for block in &section.content {
            slides.push(self.block_slide(block, Some(&section.title)));
        }
    }

    /// Build the slide for one block. `section_title` stands in for a
    /// missing block title.
    pub fn block_slide(&self, block: &TypedBlock, section_title: Option<&str>) -> SlideDescriptor {
        let title = block.title.as_deref().or(section_title);
        match &block.content {
            BlockContent::Heading { text, .. } => title_slide(text),
            BlockContent::Paragraph { text } => self.paragraph_slide(text, title),
            BlockContent::Table { rows } => self.table_slide(rows, title),
            BlockContent::Formula { text, is_latex, .. } => formula_slide(text, *is_latex, title),
            BlockContent::Image { path, caption, .. } => {
                self.image_slide(path.as_deref(), caption.as_deref(), title)
            }
        }
    }

    fn paragraph_slide(&self, text: &str, title: Option<&str>) -> SlideDescriptor {
        content_slide(Layout::TitleAndContent, title.unwrap_or("Content")).with_element(
            BodyElement::Text {
                text: summarize(text, self.options.paragraph_budget),
                font_size_pt: BODY_PT,
                alignment: Alignment::Left,
            },
        )
    }

    fn table_slide(&self, rows: &[Vec<String>], title: Option<&str>) -> SlideDescriptor {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let grid = rows
            .iter()
            .map(|row| {
                let mut cells = row.clone();
                cells.resize(columns, String::new());
                cells
            })
            .collect();

        content_slide(Layout::Table, title.unwrap_or("Table")).with_element(BodyElement::Table {
            rows: grid,
            columns,
            header_row: true,
            font_size_pt: TABLE_PT,
            frame: self.options.table_frame,
        })
    }

    fn image_slide(
        &self,
        path: Option<&Path>,
        caption: Option<&str>,
        title: Option<&str>,
    ) -> SlideDescriptor {
        let title = match (title, path.and_then(Path::file_name)) {
            (Some(title), _) => title.to_string(),
            (None, Some(name)) => format!("Image: {}", name.to_string_lossy()),
            (None, None) => "Image".to_string(),
        };
        let slide = content_slide(Layout::Image, title);

        let Some(path) = path else {
            log::warn!("image block without a path; emitting placeholder");
            return slide.with_element(BodyElement::Placeholder {
                message: "Image unavailable: no image reference".into(),
            });
        };

        let info = match self.probe.probe(path) {
            Ok(info) => info,
            Err(e) => {
                log::warn!("{}; emitting placeholder", e);
                return slide.with_element(BodyElement::Placeholder {
                    message: format!("Image unavailable: {}", path.display()),
                });
            }
        };

        let frame = fit_image(info, self.options.image_region(), self.options.dpi);
        let mut slide = slide.with_element(BodyElement::Image {
            path: path.to_path_buf(),
            frame,
            native_width_px: info.width_px,
            native_height_px: info.height_px,
        });
        if let Some(text) = caption.filter(|c| !c.trim().is_empty()) {
            slide = slide.with_element(BodyElement::Caption {
                text: text.to_string(),
                frame: caption_frame(
                    frame,
                    self.options.caption_gap,
                    self.options.caption_height,
                ),
                font_size_pt: CAPTION_PT,
            });
        }
        slide
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

fn title_slide(title: &str) -> SlideDescriptor {
    SlideDescriptor::new(Layout::Title, title, TextStyle::centered(SECTION_TITLE_PT))
        .with_subtitle("")
}

fn content_slide(layout: Layout, title: impl Into<String>) -> SlideDescriptor {
    SlideDescriptor::new(layout, title, TextStyle::centered(TITLE_PT))
}

fn formula_slide(text: &str, is_latex: bool, title: Option<&str>) -> SlideDescriptor {
    let base = title.unwrap_or("Formula");
    let (title, text) = if is_latex {
        (format!("{}{}", base, LATEX_SUFFIX), strip_delimiters(text))
    } else {
        (base.to_string(), text)
    };
    content_slide(Layout::TitleAndContent, title).with_element(BodyElement::Formula {
        text: text.to_string(),
        font_family: MONOSPACE_FAMILY.to_string(),
        font_size_pt: FORMULA_PT,
        alignment: Alignment::Center,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::model::{inches, Rect};

    /// Probe that knows a fixed set of pictures.
    struct FixedProbe;

    impl ImageProbe for FixedProbe {
        fn probe(&self, path: &Path) -> Result<ImageInfo> {
            match path.to_str() {
                Some("wide.png") => Ok(ImageInfo::new(1920, 1080)),
                Some("small.png") => Ok(ImageInfo::new(96, 96)),
                _ => Err(Error::ImageResolve(path.display().to_string())),
            }
        }
    }

    fn allocator() -> Allocator {
        Allocator::default().with_probe(FixedProbe)
    }

    fn section(title: &str, content: Vec<TypedBlock>) -> OutlineNode {
        let mut s = Section::new(title, 1);
        s.content = content;
        OutlineNode::Section(s)
    }

    #[test]
    fn test_section_title_slide_then_content() {
        let nodes = vec![section(
            "Intro",
            vec![TypedBlock::paragraph("Hello world.")],
        )];
        let slides = allocator().allocate(&nodes);

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].layout, Layout::Title);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].title_style.font_size_pt, SECTION_TITLE_PT);
        assert_eq!(slides[0].subtitle.as_deref(), Some(""));
        assert_eq!(slides[1].layout, Layout::TitleAndContent);
        assert_eq!(slides[1].title, "Intro");
        assert_eq!(
            slides[1].body[0],
            BodyElement::Text {
                text: "Hello world.".into(),
                font_size_pt: BODY_PT,
                alignment: Alignment::Left,
            }
        );
    }

    #[test]
    fn test_block_title_beats_section_title() {
        let nodes = vec![section(
            "Outer",
            vec![TypedBlock::paragraph("x").with_title("Own")],
        )];
        let slides = allocator().allocate(&nodes);
        assert_eq!(slides[1].title, "Own");
    }

    #[test]
    fn test_fallback_titles() {
        let a = allocator();
        assert_eq!(a.block_slide(&TypedBlock::paragraph("p"), None).title, "Content");
        assert_eq!(
            a.block_slide(&TypedBlock::table(vec![vec!["x".into()]]), None).title,
            "Table"
        );
        assert_eq!(
            a.block_slide(&TypedBlock::formula("a+b=c", false, "a+b=c"), None).title,
            "Formula"
        );
        assert_eq!(a.block_slide(&TypedBlock::image(None), None).title, "Image");
        assert_eq!(
            a.block_slide(&TypedBlock::image(Some("dir/small.png".into())), None)
                .title,
            "Image: small.png"
        );
    }

    #[test]
    fn test_paragraph_summarized_to_budget() {
        let long = "Sentence number one is here. ".repeat(40);
        let a = Allocator::new(LayoutOptions::new().with_paragraph_budget(100));
        let slide = a.block_slide(&TypedBlock::paragraph(long.trim()), None);
        match &slide.body[0] {
            BodyElement::Text { text, .. } => {
                assert!(text.chars().count() <= 100);
                assert!(text.ends_with(ELLIPSIS));
            }
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_table_grid_padded() {
        let rows = vec![
            vec!["h1".into(), "h2".into(), "h3".into()],
            vec!["a".into()],
        ];
        let slide = allocator().block_slide(&TypedBlock::table(rows).with_title("Table 1"), None);
        assert_eq!(slide.layout, Layout::Table);
        assert_eq!(slide.title, "Table 1");
        match &slide.body[0] {
            BodyElement::Table {
                rows,
                columns,
                header_row,
                font_size_pt,
                frame,
            } => {
                assert_eq!(*columns, 3);
                assert_eq!(rows[1], vec!["a", "", ""]);
                assert!(*header_row);
                assert_eq!(*font_size_pt, TABLE_PT);
                assert_eq!(*frame, Rect::from_inches(1.0, 2.0, 11.0, 4.0));
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_latex_formula_slide() {
        let block = TypedBlock::formula("E=mc^2", true, "so $E=mc^2$").with_title("Physics");
        let slide = allocator().block_slide(&block, None);
        assert_eq!(slide.title, "Physics (LaTeX)");
        match &slide.body[0] {
            BodyElement::Formula {
                text,
                font_family,
                font_size_pt,
                alignment,
            } => {
                assert_eq!(text, "E=mc^2");
                assert_eq!(font_family, MONOSPACE_FAMILY);
                assert_eq!(*font_size_pt, FORMULA_PT);
                assert_eq!(*alignment, Alignment::Center);
            }
            other => panic!("Expected formula, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_formula_has_no_suffix() {
        let block = TypedBlock::formula("a + b = c", false, "a + b = c");
        let slide = allocator().block_slide(&block, Some("Algebra"));
        assert_eq!(slide.title, "Algebra");
    }

    #[test]
    fn test_image_fitted_with_caption() {
        let block = TypedBlock::new(BlockContent::Image {
            path: Some("wide.png".into()),
            caption: Some("A wide picture".into()),
            description: None,
        });
        let a = allocator();
        let slide = a.block_slide(&block, None);
        assert_eq!(slide.layout, Layout::Image);
        assert_eq!(slide.body.len(), 2);

        let region = a.options().image_region();
        let image_frame = match &slide.body[0] {
            BodyElement::Image { frame, .. } => *frame,
            other => panic!("Expected image, got {:?}", other),
        };
        assert!(region.contains(&image_frame));
        match &slide.body[1] {
            BodyElement::Caption { text, frame, .. } => {
                assert_eq!(text, "A wide picture");
                assert_eq!(frame.top, image_frame.bottom() + inches(0.2));
            }
            other => panic!("Expected caption, got {:?}", other),
        }
    }

    #[test]
    fn test_small_image_keeps_native_size() {
        let slide = allocator().block_slide(&TypedBlock::image(Some("small.png".into())), None);
        match slide.image() {
            Some(BodyElement::Image { frame, .. }) => {
                assert_eq!(frame.width, inches(1.0));
                assert_eq!(frame.height, inches(1.0));
            }
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_image_placeholder() {
        let slide = allocator().block_slide(&TypedBlock::image(Some("missing.png".into())), None);
        assert_eq!(slide.layout, Layout::Image);
        assert_eq!(slide.body.len(), 1);
        assert!(slide.has_placeholder());

        let slide = allocator().block_slide(&TypedBlock::image(None), None);
        assert!(slide.has_placeholder());
    }

    #[test]
    fn test_loose_blocks_one_slide_each() {
        let nodes = vec![
            OutlineNode::Block(TypedBlock::paragraph("a")),
            OutlineNode::Block(TypedBlock::paragraph("b")),
        ];
        assert_eq!(allocator().allocate(&nodes).len(), 2);
    }
}

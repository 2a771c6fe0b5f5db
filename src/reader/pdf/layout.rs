//! Page layout: spans to lines, and aligned lines to tables.
//!
//! Tables are found from text alignment alone, without ruling lines: a run
//! of consecutive lines whose segments start at the same column edges
//! becomes a table.

use super::text::TextSpan;

/// A line of text on one baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Baseline Y position
    pub y: f32,
    /// Largest font size on the line
    pub font_size: f32,
    /// Runs separated by column-sized gaps, sorted by X
    pub segments: Vec<TextSpan>,
}

impl TextLine {
    /// Line text with segments joined by a space.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Content found on a page, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBlock {
    /// A line of running text
    Line(TextLine),
    /// Cell text by row
    Table(Vec<Vec<String>>),
}

/// Layout analysis configuration.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Y tolerance for grouping spans into lines (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Gap between runs that reads as a word space (fraction of font size)
    pub word_gap_factor: f32,
    /// Minimum gap between segments of one line (points)
    pub min_column_gap: f32,
    /// X tolerance when matching segments to column edges (points)
    pub column_tolerance: f32,
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            y_tolerance_factor: 0.4,
            word_gap_factor: 0.2,
            min_column_gap: 15.0,
            column_tolerance: 5.0,
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
        }
    }
}

/// Groups spans into lines and detects tables.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    config: LayoutConfig,
}

impl PageLayout {
    /// Create a layout analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout analyzer with custom configuration.
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Turn a page's spans into lines and tables, top to bottom.
    pub fn blocks(&self, spans: Vec<TextSpan>) -> Vec<PageBlock> {
        let lines = self.group_lines(spans);
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if let Some(end) = self.table_end(&lines, i) {
                let columns: Vec<f32> = lines[i].segments.iter().map(|s| s.x).collect();
                let rows = lines[i..end]
                    .iter()
                    .map(|line| self.cells(line, &columns))
                    .collect();
                log::debug!(
                    "PageLayout: table of {} rows x {} columns",
                    end - i,
                    columns.len()
                );
                blocks.push(PageBlock::Table(rows));
                i = end;
            } else {
                blocks.push(PageBlock::Line(lines[i].clone()));
                i += 1;
            }
        }
        blocks
    }

    /// Group spans into lines by Y position, top of the page first.
    pub fn group_lines(&self, mut spans: Vec<TextSpan>) -> Vec<TextLine> {
        spans.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut rows: Vec<Vec<TextSpan>> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in spans {
            let tolerance = span.font_size * self.config.y_tolerance_factor;
            let same_line = current_y.is_some_and(|y| (span.y - y).abs() <= tolerance);
            match rows.last_mut() {
                Some(row) if same_line => row.push(span),
                _ => {
                    current_y = Some(span.y);
                    rows.push(vec![span]);
                }
            }
        }

        rows.into_iter().map(|row| self.merge_row(row)).collect()
    }

    fn merge_row(&self, mut row: Vec<TextSpan>) -> TextLine {
        row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = row.iter().map(|s| s.y).sum::<f32>() / row.len() as f32;
        let font_size = row.iter().map(|s| s.font_size).fold(0.0, f32::max);

        let mut segments: Vec<TextSpan> = Vec::new();
        for span in row {
            match segments.last_mut() {
                Some(last) if span.x - last.right() < self.config.min_column_gap => {
                    let gap = span.x - last.right();
                    if gap > span.font_size * self.config.word_gap_factor
                        && !last.text.ends_with(' ')
                        && !span.text.starts_with(' ')
                    {
                        last.text.push(' ');
                    }
                    last.text.push_str(&span.text);
                    last.width = span.right().max(last.right()) - last.x;
                }
                _ => segments.push(span),
            }
        }

        TextLine {
            y,
            font_size,
            segments,
        }
    }

    /// End (exclusive) of the table starting at `start`, if one does.
    fn table_end(&self, lines: &[TextLine], start: usize) -> Option<usize> {
        let head = &lines[start];
        let count = head.segments.len();
        if count < self.config.min_columns || count > self.config.max_columns {
            return None;
        }
        let columns: Vec<f32> = head.segments.iter().map(|s| s.x).collect();

        let end = lines[start + 1..]
            .iter()
            .position(|line| !self.aligns(line, &columns))
            .map_or(lines.len(), |offset| start + 1 + offset);

        (end - start >= self.config.min_rows).then_some(end)
    }

    fn aligns(&self, line: &TextLine, columns: &[f32]) -> bool {
        line.segments.len() >= self.config.min_columns
            && line.segments.len() <= columns.len()
            && line
                .segments
                .iter()
                .all(|s| self.column_of(s.x, columns).is_some())
    }

    fn column_of(&self, x: f32, columns: &[f32]) -> Option<usize> {
        columns
            .iter()
            .position(|edge| (x - edge).abs() <= self.config.column_tolerance)
    }

    fn cells(&self, line: &TextLine, columns: &[f32]) -> Vec<String> {
        let mut cells = vec![String::new(); columns.len()];
        for segment in &line.segments {
            if let Some(col) = self.column_of(segment.x, columns) {
                if !cells[col].is_empty() {
                    cells[col].push(' ');
                }
                cells[col].push_str(segment.text.trim());
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text, x, y, text.chars().count() as f32 * size * 0.5, size)
    }

    #[test]
    fn test_group_lines_top_down() {
        let spans = vec![
            span("second", 72.0, 680.0, 12.0),
            span("first", 72.0, 700.0, 12.0),
            span("line", 110.0, 701.0, 12.0),
        ];
        let lines = PageLayout::new().group_lines(spans);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "first line");
        assert_eq!(lines[0].segments.len(), 1);
        assert_eq!(lines[1].text(), "second");
    }

    #[test]
    fn test_adjacent_runs_concatenate() {
        let spans = vec![span("Hel", 72.0, 700.0, 10.0), span("lo", 87.0, 700.0, 10.0)];
        let lines = PageLayout::new().group_lines(spans);
        assert_eq!(lines[0].text(), "Hello");
    }

    #[test]
    fn test_font_size_is_largest_on_line() {
        let spans = vec![span("Big", 72.0, 700.0, 20.0), span("small", 104.0, 700.0, 10.0)];
        let lines = PageLayout::new().group_lines(spans);
        assert_eq!(lines[0].font_size, 20.0);
    }

    // ==================== Tables ====================

    #[test]
    fn test_aligned_rows_become_table() {
        let spans = vec![
            span("Intro text", 72.0, 720.0, 12.0),
            span("Region", 72.0, 650.0, 12.0),
            span("Sales", 272.0, 650.0, 12.0),
            span("North", 72.0, 635.0, 12.0),
            span("120", 272.0, 635.0, 12.0),
            span("South", 72.0, 620.0, 12.0),
            span("95", 272.0, 620.0, 12.0),
            span("After the table", 72.0, 590.0, 12.0),
        ];
        let blocks = PageLayout::new().blocks(spans);

        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], PageBlock::Line(l) if l.text() == "Intro text"));
        match &blocks[1] {
            PageBlock::Table(rows) => {
                assert_eq!(rows.len(), 3);
                assert_eq!(rows[0], vec!["Region", "Sales"]);
                assert_eq!(rows[2], vec!["South", "95"]);
            }
            other => panic!("Expected table, got {:?}", other),
        }
        assert!(matches!(&blocks[2], PageBlock::Line(l) if l.text() == "After the table"));
    }

    #[test]
    fn test_single_multi_column_line_is_not_table() {
        let spans = vec![
            span("Name", 72.0, 700.0, 12.0),
            span("Date", 300.0, 700.0, 12.0),
            span("Body paragraph follows here.", 72.0, 680.0, 12.0),
        ];
        let blocks = PageLayout::new().blocks(spans);
        assert!(blocks.iter().all(|b| matches!(b, PageBlock::Line(_))));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_missing_cell_stays_empty() {
        let spans = vec![
            span("A", 72.0, 700.0, 12.0),
            span("B", 200.0, 700.0, 12.0),
            span("C", 320.0, 700.0, 12.0),
            span("1", 72.0, 685.0, 12.0),
            span("3", 320.0, 685.0, 12.0),
        ];
        let blocks = PageLayout::new().blocks(spans);
        match &blocks[0] {
            PageBlock::Table(rows) => assert_eq!(rows[1], vec!["1", "", "3"]),
            other => panic!("Expected table, got {:?}", other),
        }
    }
}

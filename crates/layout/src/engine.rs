use crate::document::{Block, BulletList, Document, Figure, Paragraph, Table};
use crate::error::LayoutError;
use crate::markup::{parse_markup, plain_text};
use crate::output::{Bookmark, LaidOutDocument, Page, PageItem, PlacedText};
use crate::text::{Line, break_lines, position_line};
use ods_style::{ComputedStyle, Margins, Stylesheet, TextAlign};
use ods_types::{Point, Rect, Size, Stroke};

/// Tolerance for floating point comparisons against page edges.
const EPSILON: f32 = 0.01;

/// Flows document blocks onto pages of the stylesheet's page layout.
pub struct LayoutEngine<'a> {
    stylesheet: &'a Stylesheet,
    page_size: Size,
    margins: Margins,
    pages: Vec<Page>,
    bookmarks: Vec<Bookmark>,
    current_y: f32,
}

/// Wrapped lines of every cell of a table row plus the row height.
struct MeasuredRow {
    cells: Vec<Vec<Line>>,
    height: f32,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(stylesheet: &'a Stylesheet) -> Self {
        let margins = stylesheet.page.margins;
        LayoutEngine {
            stylesheet,
            page_size: stylesheet.page.page_size(),
            margins,
            pages: vec![Page::new(1)],
            bookmarks: Vec::new(),
            current_y: margins.top,
        }
    }

    pub fn layout(mut self, document: &Document) -> Result<LaidOutDocument, LayoutError> {
        for (index, block) in document.blocks.iter().enumerate() {
            match block {
                Block::Paragraph(paragraph) => {
                    let following = &document.blocks[index + 1..];
                    self.layout_paragraph(paragraph, following)?;
                }
                Block::Spacer(height) => self.layout_spacer(*height),
                Block::Figure(figure) => self.layout_figure(figure)?,
                Block::Table(table) => self.layout_table(table)?,
                Block::List(list) => self.layout_list(list),
                Block::PageBreak => self.force_new_page(),
            }
        }

        if self.pages.len() > 1 && self.pages.last().is_some_and(Page::is_empty) {
            self.pages.pop();
        }
        log::debug!("Laid out '{}' on {} pages", document.title, self.pages.len());

        Ok(LaidOutDocument {
            title: document.title.clone(),
            page_size: self.page_size,
            pages: self.pages,
            bookmarks: self.bookmarks,
        })
    }

    fn content_width(&self) -> f32 {
        self.page_size.width - self.margins.left - self.margins.right
    }

    fn content_height(&self) -> f32 {
        self.page_size.height - self.margins.top - self.margins.bottom
    }

    fn content_bottom(&self) -> f32 {
        self.page_size.height - self.margins.bottom
    }

    fn at_page_top(&self) -> bool {
        self.current_y <= self.margins.top + EPSILON
    }

    fn needs_page_break(&self, required_height: f32) -> bool {
        self.current_y + required_height > self.content_bottom() + EPSILON
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));
        self.current_y = self.margins.top;
    }

    /// Starts a new page unless the current one is still pristine.
    fn force_new_page(&mut self) {
        let pristine = self.pages.last().is_some_and(Page::is_empty) && self.at_page_top();
        if !pristine {
            self.new_page();
        }
    }

    fn add_item(&mut self, item: PageItem) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    fn push_line(&mut self, line: &Line, style: &ComputedStyle, x: f32, width: f32, top: f32) {
        let baseline = top + (style.line_height - style.font_size) / 2.0 + style.font_size * 0.8;
        for run in position_line(line, style, style.text_align, width) {
            self.add_item(PageItem::Text(PlacedText {
                x: x + run.x,
                baseline,
                text: run.text,
                font: run.font,
                size: style.font_size,
                color: style.color,
                word_spacing: run.word_spacing,
            }));
        }
    }

    /// Height that must fit below a `keep_with_next` block so that it is not stranded.
    fn leading_height(&self, following: &[Block]) -> f32 {
        let mut spacers = 0.0;
        for block in following {
            let first = match block {
                Block::Spacer(height) => {
                    spacers += height;
                    continue;
                }
                Block::Paragraph(p) => {
                    let style = self.stylesheet.compute_style(&p.style);
                    style.margin.top + style.line_height
                }
                Block::List(list) => {
                    let style = self.stylesheet.compute_style(&list.style);
                    style.margin.top + style.line_height
                }
                Block::Figure(figure) => figure.drawing.size.height,
                Block::Table(table) => self.table_lead_height(table),
                Block::PageBreak => 0.0,
            };
            return spacers + first;
        }
        0.0
    }

    fn layout_paragraph(&mut self, paragraph: &Paragraph, following: &[Block]) -> Result<(), LayoutError> {
        let style = self.stylesheet.compute_style(&paragraph.style);
        let width = self.content_width() - style.margin.left - style.margin.right;
        let lines = break_lines(&paragraph.runs, &style, width);
        if lines.is_empty() {
            return Ok(());
        }

        let mut space_before = if self.at_page_top() { 0.0 } else { style.margin.top };
        if style.keep_with_next && !self.at_page_top() {
            let required = space_before
                + lines.len() as f32 * style.line_height
                + style.margin.bottom
                + self.leading_height(following);
            if self.needs_page_break(required) && required <= self.content_height() {
                self.new_page();
                space_before = 0.0;
            }
        }
        self.current_y += space_before;

        let x = self.margins.left + style.margin.left;
        for (index, line) in lines.iter().enumerate() {
            if self.needs_page_break(style.line_height) && !self.at_page_top() {
                self.new_page();
            }
            if index == 0 {
                if let Some(level) = paragraph.outline {
                    self.bookmarks.push(Bookmark {
                        title: plain_text(&paragraph.runs),
                        level,
                        page_index: self.pages.len() - 1,
                        y: self.current_y,
                    });
                }
            }
            self.push_line(line, &style, x, width, self.current_y);
            self.current_y += style.line_height;
        }
        self.current_y += style.margin.bottom;
        Ok(())
    }

    fn layout_spacer(&mut self, height: f32) {
        // Vertical space never carries over to the next page.
        if self.at_page_top() {
            return;
        }
        self.current_y = (self.current_y + height).min(self.content_bottom());
    }

    fn layout_figure(&mut self, figure: &Figure) -> Result<(), LayoutError> {
        let size = figure.drawing.size;
        if size.height > self.content_height() + EPSILON {
            return Err(LayoutError::ElementTooTall {
                element: "figure".to_string(),
                height: size.height,
                available: self.content_height(),
            });
        }
        if size.width > self.content_width() + EPSILON {
            return Err(LayoutError::ElementTooWide {
                element: "figure".to_string(),
                width: size.width,
                available: self.content_width(),
            });
        }
        if self.needs_page_break(size.height) && !self.at_page_top() {
            self.new_page();
        }

        let slack = self.content_width() - size.width;
        let x = match figure.align {
            TextAlign::Center => self.margins.left + slack / 2.0,
            TextAlign::Right => self.margins.left + slack,
            TextAlign::Left | TextAlign::Justify => self.margins.left,
        };
        self.add_item(PageItem::Drawing {
            origin: Point::new(x, self.current_y),
            drawing: figure.drawing.clone(),
        });
        self.current_y += size.height;
        Ok(())
    }

    fn measure_row(&self, cells: &[String], style: &ComputedStyle, widths: &[f32]) -> MeasuredRow {
        let cells: Vec<Vec<Line>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| break_lines(&parse_markup(cell), style, width - style.padding.horizontal()))
            .collect();
        let height = cells
            .iter()
            .map(|lines| {
                lines.len().max(1) as f32 * style.line_height + style.padding.top + style.padding.bottom
            })
            .fold(0.0f32, f32::max);
        MeasuredRow { cells, height }
    }

    fn column_widths(&self, table: &Table) -> Vec<f32> {
        let content_width = self.content_width();
        table.columns.iter().map(|c| c.resolve(content_width)).collect()
    }

    fn table_lead_height(&self, table: &Table) -> f32 {
        let widths = self.column_widths(table);
        let header = table.header.as_ref().map_or(0.0, |cells| {
            let style = self.stylesheet.compute_style(&table.header_style);
            self.measure_row(cells, &style, &widths).height
        });
        let first = table.rows.first().map_or(0.0, |cells| {
            let style = self.stylesheet.compute_style(&table.cell_style);
            self.measure_row(cells, &style, &widths).height
        });
        header + first
    }

    fn draw_row(&mut self, row: &MeasuredRow, style: &ComputedStyle, widths: &[f32], x0: f32, grid: Option<Stroke>) {
        let top = self.current_y;
        let cell_rects: Vec<Rect> = widths
            .iter()
            .scan(x0, |x, &width| {
                let rect = Rect::new(*x, top, width, row.height);
                *x += width;
                Some(rect)
            })
            .collect();

        if let Some(background) = style.background_color {
            for rect in &cell_rects {
                self.add_item(PageItem::Rect { rect: *rect, fill: Some(background), stroke: None });
            }
        }
        for (lines, rect) in row.cells.iter().zip(&cell_rects) {
            let text_height = lines.len() as f32 * style.line_height;
            let text_top = rect.y + (rect.height - text_height) / 2.0;
            let inner_width = rect.width - style.padding.horizontal();
            for (index, line) in lines.iter().enumerate() {
                let line_top = text_top + index as f32 * style.line_height;
                self.push_line(line, style, rect.x + style.padding.left, inner_width, line_top);
            }
        }
        if let Some(stroke) = grid {
            for rect in cell_rects {
                self.add_item(PageItem::Rect { rect, fill: None, stroke: Some(stroke) });
            }
        }
        self.current_y += row.height;
    }

    fn layout_table(&mut self, table: &Table) -> Result<(), LayoutError> {
        let expected = table.columns.len();
        let header_offset = usize::from(table.header.is_some());
        if let Some(header) = &table.header {
            if header.len() != expected {
                return Err(LayoutError::ColumnMismatch { row: 0, expected, found: header.len() });
            }
        }
        if let Some((index, row)) = table.rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(LayoutError::ColumnMismatch {
                row: index + header_offset,
                expected,
                found: row.len(),
            });
        }

        let widths = self.column_widths(table);
        let table_width: f32 = widths.iter().sum();
        if table_width > self.content_width() + EPSILON {
            return Err(LayoutError::ElementTooWide {
                element: "table".to_string(),
                width: table_width,
                available: self.content_width(),
            });
        }

        let header_style = self.stylesheet.compute_style(&table.header_style);
        let cell_style = self.stylesheet.compute_style(&table.cell_style);
        let header = table
            .header
            .as_ref()
            .map(|cells| self.measure_row(cells, &header_style, &widths));
        let header_height = header.as_ref().map_or(0.0, |h| h.height);
        let rows: Vec<MeasuredRow> = table
            .rows
            .iter()
            .map(|cells| self.measure_row(cells, &cell_style, &widths))
            .collect();

        if let Some(tallest) = rows.iter().map(|r| r.height).reduce(f32::max) {
            if header_height + tallest > self.content_height() {
                return Err(LayoutError::ElementTooTall {
                    element: "table row".to_string(),
                    height: header_height + tallest,
                    available: self.content_height(),
                });
            }
        }

        let x0 = self.margins.left + (self.content_width() - table_width) / 2.0;
        let first_height = header_height + rows.first().map_or(0.0, |r| r.height);
        if self.needs_page_break(first_height) && !self.at_page_top() {
            self.new_page();
        }
        if let Some(header) = &header {
            self.draw_row(header, &header_style, &widths, x0, table.grid);
        }

        for row in &rows {
            if self.needs_page_break(row.height) {
                log::debug!("Table continues on page {}", self.pages.len() + 1);
                self.new_page();
                if let Some(header) = &header {
                    self.draw_row(header, &header_style, &widths, x0, table.grid);
                }
            }
            self.draw_row(row, &cell_style, &widths, x0, table.grid);
        }
        Ok(())
    }

    fn layout_list(&mut self, list: &BulletList) {
        let style = self.stylesheet.compute_style(&list.style);
        let left = self.margins.left + style.margin.left;
        let width = self.content_width() - style.margin.left - style.margin.right - list.indent;
        if !self.at_page_top() {
            self.current_y += style.margin.top;
        }

        for item in &list.items {
            let lines = break_lines(item, &style, width);
            for (index, line) in lines.iter().enumerate() {
                if self.needs_page_break(style.line_height) && !self.at_page_top() {
                    self.new_page();
                }
                if index == 0 {
                    let baseline = self.current_y
                        + (style.line_height - style.font_size) / 2.0
                        + style.font_size * 0.8;
                    self.add_item(PageItem::Text(PlacedText {
                        x: left + list.indent * 0.3,
                        baseline,
                        text: list.bullet.clone(),
                        font: style.font,
                        size: style.font_size,
                        color: style.color,
                        word_spacing: 0.0,
                    }));
                }
                self.push_line(line, &style, left + list.indent, width, self.current_y);
                self.current_y += style.line_height;
            }
            self.current_y += style.margin.bottom;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ColumnWidth;
    use ods_style::ElementStyle;
    use ods_types::{Color, Drawing, FontWeight};

    fn stylesheet() -> Stylesheet {
        Stylesheet::default()
            .with_style(
                "body",
                ElementStyle {
                    font_size: Some(12.0),
                    line_height: Some(14.0),
                    text_align: Some(TextAlign::Justify),
                    margin: Some(Margins::vertical(0.0, 6.0)),
                    ..Default::default()
                },
            )
            .with_style(
                "heading",
                ElementStyle {
                    font_size: Some(16.0),
                    line_height: Some(18.0),
                    font_weight: Some(FontWeight::Bold),
                    margin: Some(Margins::vertical(12.0, 6.0)),
                    keep_with_next: Some(true),
                    ..Default::default()
                },
            )
            .with_style(
                "table_header",
                ElementStyle {
                    font_weight: Some(FontWeight::Bold),
                    text_align: Some(TextAlign::Center),
                    background_color: Some(Color::rgb(0xBF, 0x8B, 0x2E)),
                    padding: Some(Margins::all(4.0)),
                    ..Default::default()
                },
            )
            .with_style(
                "table_cell",
                ElementStyle {
                    text_align: Some(TextAlign::Center),
                    padding: Some(Margins::all(4.0)),
                    ..Default::default()
                },
            )
    }

    fn long_text(words: usize) -> String {
        (0..words).map(|i| format!("palavra{}", i)).collect::<Vec<_>>().join(" ")
    }

    fn layout(doc: &Document) -> Result<LaidOutDocument, LayoutError> {
        let sheet = stylesheet();
        LayoutEngine::new(&sheet).layout(doc)
    }

    #[test]
    fn long_paragraph_continues_on_next_page() {
        let mut doc = Document::new("t");
        doc.paragraph("body", &long_text(1500));
        let out = layout(&doc).unwrap();
        assert!(out.page_count() >= 2);

        let bottom = out.page_size.height - 72.0;
        for page in &out.pages {
            for text in page.texts() {
                assert!(text.baseline > 72.0 && text.baseline < bottom);
            }
        }
        assert!(out.pages[1].text().contains("palavra"));
    }

    #[test]
    fn first_heading_ignores_space_before_and_records_bookmark() {
        let mut doc = Document::new("t");
        doc.heading("heading", "1. INTRODUÇÃO", 1);
        doc.heading("heading", "1.1 Contexto", 2);
        let out = layout(&doc).unwrap();
        assert_eq!(out.bookmarks.len(), 2);
        assert_eq!(out.bookmarks[0].title, "1. INTRODUÇÃO");
        assert_eq!(out.bookmarks[0].y, 72.0);
        assert_eq!(out.bookmarks[1].level, 2);
        assert_eq!(out.bookmarks[1].y, 72.0 + 18.0 + 6.0 + 12.0);
    }

    #[test]
    fn heading_is_not_stranded_at_page_bottom() {
        let mut doc = Document::new("t");
        doc.paragraph("body", &long_text(10));
        // Leaves about 30pt, less than the heading plus one body line.
        doc.spacer(648.0);
        doc.heading("heading", "3. RESULTADOS", 1);
        doc.paragraph("body", "Texto da seção.");
        let out = layout(&doc).unwrap();
        assert_eq!(out.find_page("3. RESULTADOS"), Some(1));
        assert_eq!(out.find_page("Texto da seção."), Some(1));
        assert_eq!(out.bookmarks[0].page_index, 1);
    }

    #[test]
    fn figures_move_to_next_page_when_they_do_not_fit() {
        let mut doc = Document::new("t");
        doc.paragraph("body", &long_text(10));
        doc.spacer(500.0);
        doc.figure(Drawing::new(Size::new(400.0, 250.0)));
        let out = layout(&doc).unwrap();
        assert_eq!(out.page_count(), 2);
        let (origin, _) = out.pages[1].drawings().next().unwrap();
        assert_eq!(origin.y, 72.0);
        assert!((origin.x - (72.0 + (451.28 - 400.0) / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn oversized_figure_is_an_error() {
        let mut doc = Document::new("t");
        doc.figure(Drawing::new(Size::new(400.0, 800.0)));
        assert!(matches!(layout(&doc), Err(LayoutError::ElementTooTall { .. })));
    }

    #[test]
    fn table_splits_between_rows_and_repeats_header() {
        let mut table = Table::new(vec![ColumnWidth::Points(250.0), ColumnWidth::Points(100.0)])
            .header(["Programa", "Municípios"])
            .grid(Stroke::solid(Color::BLACK, 1.0));
        for i in 0..80 {
            table = table.row([format!("Programa {}", i), i.to_string()]);
        }
        let mut doc = Document::new("t");
        doc.table(table);
        let out = layout(&doc).unwrap();
        assert!(out.page_count() >= 2);
        for page in &out.pages {
            let first_text = page.texts().next().unwrap();
            assert_eq!(first_text.text, "Programa");
            assert!(first_text.font.is_bold());
        }
        assert!(out.find_page("Programa 79").unwrap() >= 1);
    }

    #[test]
    fn table_is_centered_with_header_background() {
        let table = Table::new(vec![ColumnWidth::Fraction(0.4), ColumnWidth::Fraction(0.3), ColumnWidth::Fraction(0.2)])
            .header(["Ação", "Horizonte", "Impacto Esperado"])
            .row(["Ampliar a coleta seletiva", "Curto prazo", "Alto"]);
        let mut doc = Document::new("t");
        doc.table(table);
        let out = layout(&doc).unwrap();
        let rects: Vec<Rect> = out.pages[0]
            .items
            .iter()
            .filter_map(|item| match item {
                PageItem::Rect { rect, fill: Some(_), .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 3);
        let table_width = 451.28 * 0.9;
        assert!((rects[0].x - (72.0 + (451.28 - table_width) / 2.0)).abs() < 1e-2);
    }

    #[test]
    fn column_mismatch_is_reported() {
        let table = Table::new(vec![ColumnWidth::Points(100.0), ColumnWidth::Points(100.0)])
            .header(["a", "b"])
            .row(["1", "2"])
            .row(["only one"]);
        let mut doc = Document::new("t");
        doc.table(table);
        assert_eq!(
            layout(&doc).unwrap_err(),
            LayoutError::ColumnMismatch { row: 2, expected: 2, found: 1 }
        );
    }

    #[test]
    fn page_breaks_skip_pristine_pages() {
        let mut doc = Document::new("t");
        doc.page_break();
        doc.paragraph("body", "um");
        doc.page_break();
        doc.page_break();
        doc.paragraph("body", "dois");
        doc.page_break();
        let out = layout(&doc).unwrap();
        assert_eq!(out.page_count(), 2);
        assert_eq!(out.find_page("dois"), Some(1));
    }

    #[test]
    fn bullets_hang_in_the_indent() {
        let mut doc = Document::new("t");
        doc.bullets("body", ["Primeiro item", "Segundo item"]);
        let out = layout(&doc).unwrap();
        let texts: Vec<&PlacedText> = out.pages[0].texts().collect();
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0].text, "•");
        assert!(texts[0].x < texts[1].x);
        assert_eq!(texts[1].x, 72.0 + 18.0);
        assert_eq!(texts[1].text, "Primeiro item");
    }
}

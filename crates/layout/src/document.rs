use crate::markup::parse_markup;
use ods_style::TextAlign;
use ods_types::{Drawing, Stroke};

/// A piece of text with uniform weight and style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), bold: false, italic: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Name of the stylesheet style.
    pub style: String,
    pub runs: Vec<TextRun>,
    /// Outline level when the paragraph is a heading that gets a bookmark.
    pub outline: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub drawing: Drawing,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    Points(f32),
    /// Share of the content width.
    Fraction(f32),
}

impl ColumnWidth {
    pub fn resolve(&self, content_width: f32) -> f32 {
        match *self {
            ColumnWidth::Points(pt) => pt,
            ColumnWidth::Fraction(f) => f * content_width,
        }
    }
}

/// A grid of marked-up cells, centered in the content area.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<ColumnWidth>,
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    pub header_style: String,
    pub cell_style: String,
    pub grid: Option<Stroke>,
}

impl Table {
    pub fn new(columns: Vec<ColumnWidth>) -> Self {
        Self {
            columns,
            header: None,
            rows: Vec::new(),
            header_style: "table_header".to_string(),
            cell_style: "table_cell".to_string(),
            grid: None,
        }
    }

    pub fn header<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.header = Some(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn row<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn styles(mut self, header: &str, cell: &str) -> Self {
        self.header_style = header.to_string();
        self.cell_style = cell.to_string();
        self
    }

    pub fn grid(mut self, stroke: Stroke) -> Self {
        self.grid = Some(stroke);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletList {
    pub style: String,
    pub items: Vec<Vec<TextRun>>,
    pub bullet: String,
    /// Distance from the content edge to the item text.
    pub indent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Spacer(f32),
    Figure(Figure),
    Table(Table),
    List(BulletList),
    PageBreak,
}

/// An ordered sequence of blocks with document metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), blocks: Vec::new() }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn paragraph(&mut self, style: &str, markup: &str) -> &mut Self {
        self.push(Block::Paragraph(Paragraph {
            style: style.to_string(),
            runs: parse_markup(markup),
            outline: None,
        }))
    }

    /// A paragraph that also becomes an entry of the document outline.
    pub fn heading(&mut self, style: &str, markup: &str, level: u8) -> &mut Self {
        self.push(Block::Paragraph(Paragraph {
            style: style.to_string(),
            runs: parse_markup(markup),
            outline: Some(level),
        }))
    }

    pub fn spacer(&mut self, height: f32) -> &mut Self {
        self.push(Block::Spacer(height))
    }

    pub fn figure(&mut self, drawing: Drawing) -> &mut Self {
        self.push(Block::Figure(Figure { drawing, align: TextAlign::Center }))
    }

    pub fn table(&mut self, table: Table) -> &mut Self {
        self.push(Block::Table(table))
    }

    pub fn bullets<S: AsRef<str>>(&mut self, style: &str, items: impl IntoIterator<Item = S>) -> &mut Self {
        self.push(Block::List(BulletList {
            style: style.to_string(),
            items: items.into_iter().map(|i| parse_markup(i.as_ref())).collect(),
            bullet: "•".to_string(),
            indent: 18.0,
        }))
    }

    pub fn page_break(&mut self) -> &mut Self {
        self.push(Block::PageBreak)
    }
}

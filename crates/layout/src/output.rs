use ods_types::{Color, Drawing, FontVariant, Point, Rect, Size, Stroke};

/// A run of text in a single font placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    /// Baseline position, measured from the top of the page.
    pub baseline: f32,
    pub text: String,
    pub font: FontVariant,
    pub size: f32,
    pub color: Color,
    /// Extra space added to every space character, used for justification.
    pub word_spacing: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text(PlacedText),
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Drawing {
        origin: Point,
        drawing: Drawing,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub items: Vec<PageItem>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Page { number, items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &PlacedText> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text(t) => Some(t),
            _ => None,
        })
    }

    /// All text on the page, one placed run per line of output.
    pub fn text(&self) -> String {
        self.texts().map(|t| t.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    pub fn drawings(&self) -> impl Iterator<Item = (&Point, &Drawing)> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Drawing { origin, drawing } => Some((origin, drawing)),
            _ => None,
        })
    }
}

/// Destination of a document outline entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub title: String,
    pub level: u8,
    /// Zero-based index into [`LaidOutDocument::pages`].
    pub page_index: usize,
    /// Top of the heading, measured from the top of the page.
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub title: String,
    pub page_size: Size,
    pub pages: Vec<Page>,
    pub bookmarks: Vec<Bookmark>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the first page whose text contains `needle`.
    pub fn find_page(&self, needle: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.text().contains(needle))
    }
}

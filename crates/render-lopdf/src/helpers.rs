//! Page content drawing and outline construction on top of `lopdf`.

use crate::error::RenderError;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, StringFormat, dictionary};
use ods_layout::{Bookmark, PageItem, PlacedText};
use ods_style::{ComputedStyle, PageLayout, TextAlign};
use ods_types::{Color, Drawing, Label, Point, Rect, Shape, Stroke, to_win_ansi};

/// Control point distance for approximating a quarter circle with a Bezier curve.
const KAPPA: f32 = 0.552_284_8;

#[derive(Default, Clone, PartialEq)]
struct PageState {
    font: Option<(&'static str, f32)>,
    fill_color: Option<Color>,
    word_spacing: f32,
}

/// Accumulates the content stream of a single page.
///
/// Layout coordinates grow downwards from the top of the page; every
/// operation flips them into PDF user space.
pub(crate) struct PageContext {
    page_width: f32,
    page_height: f32,
    content: Content,
    state: PageState,
}

fn rgb(color: Color) -> Vec<Object> {
    color.to_unit_rgb().iter().map(|c| (*c).into()).collect()
}

fn pdf_string(text: &str) -> Object {
    Object::String(to_win_ansi(text), StringFormat::Literal)
}

impl PageContext {
    pub(crate) fn new(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            content: Content { operations: vec![] },
            state: PageState::default(),
        }
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.content.encode()?)
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            self.op("rg", rgb(color));
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        self.op("RG", rgb(stroke.color));
        self.op("w", vec![stroke.width.into()]);
        let dashes: Vec<Object> = stroke.dash.pattern(stroke.width).into_iter().map(Object::from).collect();
        self.op("d", vec![dashes.into(), 0.into()]);
    }

    fn set_font(&mut self, resource_name: &'static str, size: f32) {
        if self.state.font != Some((resource_name, size)) {
            self.op("Tf", vec![Object::Name(resource_name.as_bytes().to_vec()), size.into()]);
            self.state.font = Some((resource_name, size));
        }
    }

    fn set_word_spacing(&mut self, spacing: f32) {
        if self.state.word_spacing != spacing {
            self.op("Tw", vec![spacing.into()]);
            self.state.word_spacing = spacing;
        }
    }

    /// Paints the current path according to which of fill and stroke are present.
    fn paint(&mut self, fill: Option<Color>, stroke: Option<&Stroke>, close: bool) {
        if let Some(color) = fill {
            self.set_fill_color(color);
        }
        if let Some(stroke) = stroke {
            self.set_stroke(stroke);
        }
        let operator = match (fill.is_some(), stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) if close => "s",
            (false, true) => "S",
            (false, false) => "n",
        };
        self.op(operator, vec![]);
    }

    fn move_to(&mut self, p: Point) {
        let y = self.page_height - p.y;
        self.op("m", vec![p.x.into(), y.into()]);
    }

    fn line_to(&mut self, p: Point) {
        let y = self.page_height - p.y;
        self.op("l", vec![p.x.into(), y.into()]);
    }

    pub(crate) fn draw_item(&mut self, item: &PageItem) {
        match item {
            PageItem::Text(text) => self.draw_text(text),
            PageItem::Rect { rect, fill, stroke } => self.draw_rect(rect, *fill, stroke.as_ref()),
            PageItem::Drawing { origin, drawing } => self.draw_drawing(*origin, drawing),
        }
    }

    fn draw_text(&mut self, text: &PlacedText) {
        if text.text.trim().is_empty() {
            return;
        }
        self.op("BT", vec![]);
        self.set_font(text.font.resource_name(), text.size);
        self.set_fill_color(text.color);
        self.set_word_spacing(text.word_spacing);
        let pdf_y = self.page_height - text.baseline;
        self.op("Td", vec![text.x.into(), pdf_y.into()]);
        self.op("Tj", vec![pdf_string(&text.text)]);
        self.op("ET", vec![]);
    }

    fn draw_rect(&mut self, rect: &Rect, fill: Option<Color>, stroke: Option<&Stroke>) {
        let y = self.page_height - rect.bottom();
        self.op("re", vec![rect.x.into(), y.into(), rect.width.into(), rect.height.into()]);
        self.paint(fill, stroke, false);
    }

    fn draw_drawing(&mut self, origin: Point, drawing: &Drawing) {
        let at = |p: Point| Point::new(origin.x + p.x, origin.y + p.y);
        for shape in &drawing.shapes {
            match shape {
                Shape::Polyline { points, stroke } => {
                    if points.len() < 2 {
                        continue;
                    }
                    self.trace(points.iter().copied().map(at));
                    self.paint(None, Some(stroke), false);
                }
                Shape::Polygon { points, fill, stroke } => {
                    if points.len() < 3 {
                        continue;
                    }
                    self.trace(points.iter().copied().map(at));
                    self.op("h", vec![]);
                    self.paint(*fill, stroke.as_ref(), true);
                }
                Shape::Rect { rect, fill, stroke } => {
                    let placed = Rect::new(origin.x + rect.x, origin.y + rect.y, rect.width, rect.height);
                    self.draw_rect(&placed, *fill, stroke.as_ref());
                }
                Shape::Circle { center, radius, fill, stroke } => {
                    self.circle(at(*center), *radius);
                    self.paint(*fill, stroke.as_ref(), true);
                }
                Shape::Text(label) => self.draw_label(origin, label),
            }
        }
    }

    fn trace(&mut self, mut points: impl Iterator<Item = Point>) {
        if let Some(first) = points.next() {
            self.move_to(first);
            for p in points {
                self.line_to(p);
            }
        }
    }

    fn circle(&mut self, center: Point, r: f32) {
        let (cx, cy) = (center.x, self.page_height - center.y);
        let k = r * KAPPA;
        self.op("m", vec![(cx + r).into(), cy.into()]);
        let quarters = [
            [cx + r, cy + k, cx + k, cy + r, cx, cy + r],
            [cx - k, cy + r, cx - r, cy + k, cx - r, cy],
            [cx - r, cy - k, cx - k, cy - r, cx, cy - r],
            [cx + k, cy - r, cx + r, cy - k, cx + r, cy],
        ];
        for quarter in quarters {
            self.op("c", quarter.iter().map(|v| (*v).into()).collect());
        }
        self.op("h", vec![]);
    }

    fn draw_label(&mut self, origin: Point, label: &Label) {
        if label.text.trim().is_empty() {
            return;
        }
        let x = origin.x + label.position.x;
        let y = self.page_height - (origin.y + label.position.y);
        let offset = label.start_offset();

        self.op("BT", vec![]);
        self.set_font(label.font.resource_name(), label.size);
        self.set_fill_color(label.color);
        self.set_word_spacing(0.0);
        if label.rotation == 0.0 {
            self.op("Td", vec![(x + offset).into(), y.into()]);
        } else {
            let (sin, cos) = label.rotation.to_radians().sin_cos();
            let matrix = [cos, sin, -sin, cos, x + offset * cos, y + offset * sin];
            self.op("Tm", matrix.iter().map(|v| (*v).into()).collect());
        }
        self.op("Tj", vec![pdf_string(&label.text)]);
        self.op("ET", vec![]);
    }

    /// Draws a single line of footer text inside the bottom margin.
    pub(crate) fn draw_footer(&mut self, text: &str, style: &ComputedStyle, page_layout: &PageLayout) {
        let margins = page_layout.margins;
        let line_width = style.text_width(text);
        let x = match style.text_align {
            TextAlign::Left | TextAlign::Justify => margins.left,
            TextAlign::Right => self.page_width - margins.right - line_width,
            TextAlign::Center => margins.left + (self.page_width - margins.horizontal() - line_width) / 2.0,
        };
        let y = margins.bottom - style.font_size;

        self.op("BT", vec![]);
        self.set_font(style.font.resource_name(), style.font_size);
        self.set_fill_color(style.color);
        self.set_word_spacing(0.0);
        self.op("Td", vec![x.into(), y.into()]);
        self.op("Tj", vec![pdf_string(text)]);
        self.op("ET", vec![]);
    }
}

/// Creates the document outline from the bookmarks recorded during layout.
///
/// # Returns
/// The `ObjectId` of the root `Outlines` dictionary if any entries were created, otherwise `None`.
pub(crate) fn build_outlines(
    doc: &mut Document,
    bookmarks: &[Bookmark],
    page_ids: &[ObjectId],
    page_height: f32,
) -> Option<ObjectId> {
    struct FlatOutlineItem {
        id: ObjectId,
        title: String,
        dest: Vec<Object>,
        parent_idx: Option<usize>,
    }
    struct NodeOutlineItem {
        id: ObjectId,
        title: String,
        dest: Vec<Object>,
        children: Vec<NodeOutlineItem>,
    }

    let mut flat_list: Vec<FlatOutlineItem> = Vec::new();
    // (level, index into flat_list) of the open ancestors
    let mut level_stack: Vec<(u8, usize)> = Vec::new();

    for bookmark in bookmarks {
        let Some(&page_id) = page_ids.get(bookmark.page_index) else {
            log::warn!("Bookmark '{}' points past the last page, skipping", bookmark.title);
            continue;
        };
        let dest = vec![Object::Reference(page_id), "FitH".into(), (page_height - bookmark.y).into()];

        while level_stack.last().is_some_and(|(level, _)| *level >= bookmark.level) {
            level_stack.pop();
        }
        let parent_idx = level_stack.last().map(|(_, idx)| *idx);
        let new_idx = flat_list.len();
        flat_list.push(FlatOutlineItem {
            id: doc.new_object_id(),
            title: bookmark.title.clone(),
            dest,
            parent_idx,
        });
        level_stack.push((bookmark.level, new_idx));
    }

    let mut children_map: std::collections::HashMap<usize, Vec<NodeOutlineItem>> = Default::default();
    let mut root_items = Vec::new();
    for (i, flat_node) in flat_list.into_iter().enumerate().rev() {
        let mut children = children_map.remove(&i).unwrap_or_default();
        children.reverse();
        let node = NodeOutlineItem { id: flat_node.id, title: flat_node.title, dest: flat_node.dest, children };
        match flat_node.parent_idx {
            Some(parent_idx) => children_map.entry(parent_idx).or_default().push(node),
            None => root_items.push(node),
        }
    }
    root_items.reverse();

    let (first, last) = (root_items.first()?.id, root_items.last()?.id);
    let outline_root_id = doc.new_object_id();
    doc.objects.insert(
        outline_root_id,
        dictionary! {
            "Type" => "Outlines", "First" => first, "Last" => last, "Count" => root_items.len() as i64,
        }
        .into(),
    );

    fn insert_outline_level(items: &[NodeOutlineItem], parent_id: ObjectId, doc: &mut Document) {
        for (i, item) in items.iter().enumerate() {
            let mut dict = dictionary! {
                "Title" => pdf_string(&item.title),
                "Parent" => parent_id,
                "Dest" => item.dest.clone(),
            };
            if i > 0 {
                dict.set("Prev", items[i - 1].id);
            }
            if let Some(next) = items.get(i + 1) {
                dict.set("Next", next.id);
            }
            if let (Some(first), Some(last)) = (item.children.first(), item.children.last()) {
                dict.set("First", first.id);
                dict.set("Last", last.id);
                dict.set("Count", -(item.children.len() as i64));
                insert_outline_level(&item.children, item.id, doc);
            }
            doc.objects.insert(item.id, dict.into());
        }
    }
    insert_outline_level(&root_items, outline_root_id, doc);
    Some(outline_root_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ods_types::FontVariant;

    fn operators(ctx: PageContext) -> Vec<String> {
        ctx.content.operations.iter().map(|op| op.operator.clone()).collect()
    }

    #[test]
    fn text_state_is_only_emitted_on_change() {
        let mut ctx = PageContext::new(595.0, 842.0);
        let text = PlacedText {
            x: 72.0,
            baseline: 100.0,
            text: "Sergipe".into(),
            font: FontVariant::BOLD,
            size: 12.0,
            color: Color::BLACK,
            word_spacing: 0.0,
        };
        ctx.draw_item(&PageItem::Text(text.clone()));
        ctx.draw_item(&PageItem::Text(PlacedText { baseline: 114.0, ..text }));
        let ops = operators(ctx);
        assert_eq!(ops.iter().filter(|o| *o == "Tf").count(), 1);
        assert_eq!(ops.iter().filter(|o| *o == "rg").count(), 1);
        assert_eq!(ops.iter().filter(|o| *o == "Tj").count(), 2);
        assert!(!ops.contains(&"Tw".to_string()));
    }

    #[test]
    fn y_axis_is_flipped() {
        let mut ctx = PageContext::new(595.0, 842.0);
        ctx.draw_item(&PageItem::Rect {
            rect: Rect::new(10.0, 20.0, 30.0, 40.0),
            fill: Some(Color::WHITE),
            stroke: None,
        });
        let re = &ctx.content.operations[1];
        assert_eq!(re.operator, "re");
        assert_eq!(re.operands[1].as_float().unwrap(), 842.0 - 60.0);
    }

    #[test]
    fn rotated_labels_use_a_text_matrix() {
        let mut drawing = Drawing::new(ods_types::Size::new(100.0, 100.0));
        drawing.push(Shape::Text(Label::new(Point::new(50.0, 50.0), "Ecopontos", 9.0).rotate(45.0)));
        let mut ctx = PageContext::new(595.0, 842.0);
        ctx.draw_item(&PageItem::Drawing { origin: Point::new(0.0, 0.0), drawing });
        let ops = operators(ctx);
        assert!(ops.contains(&"Tm".to_string()));
        assert!(!ops.contains(&"Td".to_string()));
    }

    #[test]
    fn outline_nests_by_level() {
        let mut doc = Document::with_version("1.7");
        let pages: Vec<ObjectId> = (0..2).map(|_| doc.new_object_id()).collect();
        let bookmark = |title: &str, level: u8, page_index: usize| Bookmark {
            title: title.to_string(),
            level,
            page_index,
            y: 72.0,
        };
        let bookmarks = [
            bookmark("1. INTRODUÇÃO", 1, 0),
            bookmark("1.1 Contexto", 2, 0),
            bookmark("2. METODOLOGIA", 1, 1),
            bookmark("fora", 1, 7),
        ];
        let root = build_outlines(&mut doc, &bookmarks, &pages, 842.0).unwrap();
        let root_dict = doc.get_dictionary(root).unwrap();
        assert_eq!(root_dict.get(b"Count").unwrap().as_i64().unwrap(), 2);

        let first = root_dict.get(b"First").unwrap().as_reference().unwrap();
        let first_dict = doc.get_dictionary(first).unwrap();
        assert_eq!(first_dict.get(b"Count").unwrap().as_i64().unwrap(), -1);
        assert!(first_dict.get(b"Next").is_ok());
    }

    #[test]
    fn no_bookmarks_no_outline() {
        let mut doc = Document::with_version("1.7");
        assert!(build_outlines(&mut doc, &[], &[], 842.0).is_none());
    }
}

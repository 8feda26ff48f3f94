//! Resolution independent vector drawings.
//!
//! A [`Drawing`] is a list of shapes in a local coordinate space whose origin
//! is the top-left corner and whose y axis grows downwards. Charts produce
//! drawings, the layout engine places them, and the renderer translates them
//! into PDF path operators.

use crate::color::Color;
use crate::font::FontVariant;
use crate::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineDash {
    /// Dash array in points, scaled by the line width.
    pub fn pattern(&self, width: f32) -> Vec<f32> {
        let unit = width.max(1.0);
        match self {
            LineDash::Solid => vec![],
            LineDash::Dashed => vec![4.0 * unit, 2.0 * unit],
            LineDash::DashDot => vec![4.0 * unit, 1.5 * unit, 1.0 * unit, 1.5 * unit],
            LineDash::Dotted => vec![1.0 * unit, 1.5 * unit],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub dash: LineDash,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self { color, width, dash: LineDash::Solid }
    }

    pub fn dashed(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A single line of text positioned by its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Point,
    pub text: String,
    pub size: f32,
    pub font: FontVariant,
    pub color: Color,
    pub anchor: TextAnchor,
    /// Counter-clockwise rotation in degrees around `position`.
    pub rotation: f32,
}

impl Label {
    pub fn new(position: Point, text: impl Into<String>, size: f32) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            font: FontVariant::REGULAR,
            color: Color::BLACK,
            anchor: TextAnchor::Start,
            rotation: 0.0,
        }
    }

    pub fn font(mut self, font: FontVariant) -> Self {
        self.font = font;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn width(&self) -> f32 {
        self.font.text_width(&self.text, self.size)
    }

    /// Distance along the text direction from `position` to where the text starts.
    pub fn start_offset(&self) -> f32 {
        match self.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -self.width() / 2.0,
            TextAnchor::End => -self.width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Text(Label),
}

impl Shape {
    pub fn line(from: Point, to: Point, stroke: Stroke) -> Self {
        Shape::Polyline { points: vec![from, to], stroke }
    }

    pub fn filled_rect(rect: Rect, fill: Color) -> Self {
        Shape::Rect { rect, fill: Some(fill), stroke: None }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Drawing {
    pub size: Size,
    pub shapes: Vec<Shape>,
}

impl Drawing {
    pub fn new(size: Size) -> Self {
        Self { size, shapes: Vec::new() }
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text(label) => Some(label),
            _ => None,
        })
    }

    pub fn has_label(&self, text: &str) -> bool {
        self.labels().any(|l| l.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_anchor_offsets() {
        let label = Label::new(Point::new(100.0, 50.0), "2024", 10.0);
        let width = label.width();
        assert_eq!(label.start_offset(), 0.0);
        assert_eq!(label.clone().anchor(TextAnchor::Middle).start_offset(), -width / 2.0);
        assert_eq!(label.anchor(TextAnchor::End).start_offset(), -width);
    }

    #[test]
    fn dash_patterns_scale_with_width() {
        assert!(LineDash::Solid.pattern(2.0).is_empty());
        assert_eq!(LineDash::Dashed.pattern(2.0), vec![8.0, 4.0]);
        assert_eq!(LineDash::Dotted.pattern(0.5), vec![1.0, 1.5]);
    }

    #[test]
    fn drawing_finds_labels() {
        let mut drawing = Drawing::new(Size::new(10.0, 10.0));
        drawing.push(Shape::filled_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK));
        drawing.push(Shape::Text(Label::new(Point::default(), "Meta 2030", 8.0)));
        assert_eq!(drawing.labels().count(), 1);
        assert!(drawing.has_label("Meta 2030"));
    }
}

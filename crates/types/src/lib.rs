pub mod color;
pub mod drawing;
pub mod font;
pub mod geometry;

pub use color::Color;
pub use drawing::{Drawing, Label, LineDash, Shape, Stroke, TextAnchor};
pub use font::{FontStyle, FontVariant, FontWeight, to_win_ansi};
pub use geometry::{Point, Rect, Size};

//! Flow layout for report documents.
//!
//! A [`Document`] is an ordered list of [`Block`]s. The [`LayoutEngine`]
//! breaks paragraphs into lines, splits tables between rows, moves figures
//! that do not fit and produces positioned [`Page`]s ready for rendering.

mod document;
mod engine;
mod error;
mod markup;
mod output;
mod text;

pub use document::{Block, BulletList, ColumnWidth, Document, Figure, Paragraph, Table, TextRun};
pub use engine::LayoutEngine;
pub use error::LayoutError;
pub use markup::parse_markup;
pub use output::{Bookmark, LaidOutDocument, Page, PageItem, PlacedText};
pub use text::{Line, break_lines};

//! Renders a [`ods_layout::LaidOutDocument`] into a PDF file with `lopdf`.
//!
//! Text uses the standard Helvetica fonts with `WinAnsiEncoding`, so no font
//! data is embedded. Headings recorded by the layout engine become the
//! document outline.

mod error;
mod helpers;
mod renderer;

pub use error::RenderError;
pub use renderer::{PdfRenderer, RenderOptions};

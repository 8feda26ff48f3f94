use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("table row {row} has {found} cells but the table defines {expected} columns")]
    ColumnMismatch { row: usize, expected: usize, found: usize },

    #[error("{element} is {height:.1}pt tall but a page only holds {available:.1}pt")]
    ElementTooTall { element: String, height: f32, available: f32 },

    #[error("{element} is {width:.1}pt wide but the content area is {available:.1}pt")]
    ElementTooWide { element: String, width: f32, available: f32 },
}

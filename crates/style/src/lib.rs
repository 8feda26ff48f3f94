pub mod stylesheet;

pub use stylesheet::{
    ComputedStyle, ElementStyle, Margins, PageLayout, PageSize, StyleError, Stylesheet, TextAlign,
};

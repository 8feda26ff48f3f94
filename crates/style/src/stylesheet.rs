use ods_types::{Color, FontStyle, FontVariant, FontWeight, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Stylesheet JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Style '{style}' has an invalid value: {reason}")]
    InvalidValue { style: String, reason: String },
}

/// Page setup plus a set of named element styles.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stylesheet {
    #[serde(default)]
    pub page: PageLayout,
    #[serde(default)]
    pub styles: HashMap<String, ElementStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default = "default_page_margins")]
    pub margins: Margins,
    /// Handlebars template rendered at the bottom of every page.
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default)]
    pub footer_style: Option<String>,
}

fn default_page_margins() -> Margins {
    Margins::all(72.0)
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            size: PageSize::A4,
            margins: default_page_margins(),
            footer_text: None,
            footer_style: None,
        }
    }
}

impl PageLayout {
    pub fn page_size(&self) -> Size {
        let (width, height) = self.size.dimensions_pt();
        Size::new(width, height)
    }

    pub fn content_width(&self) -> f32 {
        self.page_size().width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f32 {
        self.page_size().height - self.margins.top - self.margins.bottom
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Margins {
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    pub fn vertical(top: f32, bottom: f32) -> Self {
        Self { top, bottom, ..Default::default() }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match *self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (width, height),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

/// A named style as written in a stylesheet. Unset fields inherit the defaults
/// of [`ComputedStyle`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ElementStyle {
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub line_height: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub color: Option<Color>,
    pub margin: Option<Margins>,
    pub padding: Option<Margins>,
    pub background_color: Option<Color>,
    /// Keep the element on the same page as the one that follows it.
    pub keep_with_next: Option<bool>,
}

/// A fully resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub font_size: f32,
    pub font: FontVariant,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub color: Color,
    pub margin: Margins,
    pub padding: Margins,
    pub background_color: Option<Color>,
    pub keep_with_next: bool,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            font_size: 12.0,
            font: FontVariant::REGULAR,
            line_height: 14.4,
            text_align: TextAlign::Left,
            color: Color::BLACK,
            margin: Margins::default(),
            padding: Margins::default(),
            background_color: None,
            keep_with_next: false,
        }
    }
}

impl ComputedStyle {
    /// Applies the fields set in `style` on top of `self`.
    pub fn apply(mut self, style: &ElementStyle) -> Self {
        if let Some(fs) = style.font_size {
            self.font_size = fs;
            // Auto-update line height if not specified
            if style.line_height.is_none() {
                self.line_height = fs * 1.2;
            }
        }
        if let Some(fw) = style.font_weight {
            self.font.weight = fw;
        }
        if let Some(fs) = style.font_style {
            self.font.style = fs;
        }
        if let Some(lh) = style.line_height {
            self.line_height = lh;
        }
        if let Some(ta) = style.text_align {
            self.text_align = ta;
        }
        if let Some(c) = style.color {
            self.color = c;
        }
        if let Some(m) = style.margin {
            self.margin = m;
        }
        if let Some(p) = style.padding {
            self.padding = p;
        }
        if let Some(bg) = style.background_color {
            self.background_color = Some(bg);
        }
        if let Some(keep) = style.keep_with_next {
            self.keep_with_next = keep;
        }
        self
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.font.text_width(text, self.font_size)
    }
}

impl Stylesheet {
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        let stylesheet: Stylesheet = serde_json::from_str(json)?;
        stylesheet.validate()?;
        Ok(stylesheet)
    }

    /// Adds or replaces named styles, keeping the page setup.
    pub fn merge(&mut self, other: Stylesheet) {
        self.styles.extend(other.styles);
    }

    pub fn with_style(mut self, name: impl Into<String>, style: ElementStyle) -> Self {
        self.styles.insert(name.into(), style);
        self
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        for (name, style) in &self.styles {
            let invalid = |reason: &str| StyleError::InvalidValue {
                style: name.clone(),
                reason: reason.to_string(),
            };
            if style.font_size.is_some_and(|v| !(v > 0.0)) {
                return Err(invalid("font_size must be positive"));
            }
            if style.line_height.is_some_and(|v| !(v > 0.0)) {
                return Err(invalid("line_height must be positive"));
            }
        }
        Ok(())
    }

    /// Resolves a named style. Unknown names fall back to the defaults.
    pub fn compute_style(&self, name: &str) -> ComputedStyle {
        match self.styles.get(name) {
            Some(style) => ComputedStyle::default().apply(style),
            None => {
                log::warn!("Style '{}' not found in stylesheet, using defaults", name);
                ComputedStyle::default()
            }
        }
    }
}

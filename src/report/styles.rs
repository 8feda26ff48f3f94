//! Named styles shared by both reports.

use ods_style::{ElementStyle, Margins, PageLayout, Stylesheet, TextAlign};
use ods_types::{Color, FontStyle, FontWeight};

pub const ODS12_COLOR: Color = Color::rgb(0xBF, 0x8B, 0x2E);
pub const DARK_GREEN: Color = Color::rgb(0x00, 0x64, 0x00);
pub const GREEN: Color = Color::rgb(0x00, 0x80, 0x00);
pub const BEIGE: Color = Color::rgb(0xF5, 0xF5, 0xDC);
pub const WHITE_SMOKE: Color = Color::rgb(0xF5, 0xF5, 0xF5);

pub const TITLE: &str = "title";
pub const SUBTITLE: &str = "subtitle";
pub const CENTER: &str = "center";
pub const DATE_LINE: &str = "date_line";
pub const SECTION: &str = "section";
pub const SUBSECTION: &str = "subsection";
pub const BODY: &str = "body";
pub const BULLET: &str = "bullet";
pub const TABLE_HEADER: &str = "table_header";
pub const TABLE_CELL: &str = "table_cell";

pub const ENHANCED_TITLE: &str = "enhanced_title";
pub const ENHANCED_SECTION: &str = "enhanced_section";
pub const ENHANCED_BODY: &str = "enhanced_body";
pub const ENHANCED_LIST: &str = "enhanced_list";
pub const CAPTION: &str = "caption";
pub const ENHANCED_TABLE_HEADER: &str = "enhanced_table_header";

pub const PAGE_FOOTER: &str = "page_footer";

fn bold(size: f32, line_height: f32) -> ElementStyle {
    ElementStyle {
        font_size: Some(size),
        line_height: Some(line_height),
        font_weight: Some(FontWeight::Bold),
        ..Default::default()
    }
}

fn centered(style: ElementStyle) -> ElementStyle {
    ElementStyle { text_align: Some(TextAlign::Center), ..style }
}

fn heading(style: ElementStyle, space_before: f32, space_after: f32) -> ElementStyle {
    ElementStyle {
        margin: Some(Margins::vertical(space_before, space_after)),
        keep_with_next: Some(true),
        ..style
    }
}

fn justified(size: f32, line_height: f32, space_after: f32) -> ElementStyle {
    ElementStyle {
        font_size: Some(size),
        line_height: Some(line_height),
        text_align: Some(TextAlign::Justify),
        margin: Some(Margins::vertical(0.0, space_after)),
        ..Default::default()
    }
}

fn table_header(background: Color, size: f32) -> ElementStyle {
    ElementStyle {
        color: Some(Color::WHITE),
        background_color: Some(background),
        padding: Some(Margins { top: 4.0, right: 6.0, bottom: 12.0, left: 6.0 }),
        ..centered(bold(size, size * 1.2))
    }
}

/// The stylesheet both reports are laid out with: A4, 72pt margins and a
/// numbered page footer.
pub fn default_stylesheet() -> Stylesheet {
    let page = PageLayout {
        footer_text: Some("Página {{page_num}} de {{total_pages}}".to_string()),
        footer_style: Some(PAGE_FOOTER.to_string()),
        ..Default::default()
    };

    Stylesheet { page, ..Default::default() }
        .with_style(TITLE, ElementStyle { color: Some(ODS12_COLOR), ..centered(bold(18.0, 22.0)) })
        .with_style(SUBTITLE, centered(bold(16.0, 20.0)))
        .with_style(CENTER, centered(bold(14.0, 16.0)))
        .with_style(DATE_LINE, centered(bold(12.0, 16.0)))
        .with_style(SECTION, heading(bold(16.0, 18.0), 0.0, 6.0))
        .with_style(SUBSECTION, heading(bold(14.0, 16.0), 0.0, 6.0))
        .with_style(BODY, justified(12.0, 14.0, 0.0))
        .with_style(BULLET, justified(12.0, 14.0, 6.0))
        .with_style(TABLE_HEADER, table_header(ODS12_COLOR, 12.0))
        .with_style(
            TABLE_CELL,
            ElementStyle {
                background_color: Some(BEIGE),
                padding: Some(Margins { top: 3.0, right: 6.0, bottom: 3.0, left: 6.0 }),
                ..centered(ElementStyle { font_size: Some(10.0), ..Default::default() })
            },
        )
        .with_style(
            ENHANCED_TITLE,
            ElementStyle {
                color: Some(DARK_GREEN),
                margin: Some(Margins::vertical(0.0, 16.0)),
                ..centered(bold(18.0, 22.0))
            },
        )
        .with_style(
            ENHANCED_SECTION,
            ElementStyle { color: Some(DARK_GREEN), ..heading(bold(14.0, 17.0), 6.0, 10.0) },
        )
        .with_style(ENHANCED_BODY, justified(11.0, 14.0, 8.0))
        .with_style(ENHANCED_LIST, justified(11.0, 14.0, 4.0))
        .with_style(
            CAPTION,
            centered(ElementStyle {
                font_size: Some(10.0),
                line_height: Some(12.0),
                font_style: Some(FontStyle::Italic),
                ..Default::default()
            }),
        )
        .with_style(ENHANCED_TABLE_HEADER, table_header(GREEN, 12.0))
        .with_style(
            PAGE_FOOTER,
            centered(ElementStyle {
                font_size: Some(9.0),
                color: Some(Color::gray(0x66)),
                ..Default::default()
            }),
        )
}

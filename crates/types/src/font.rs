//! The four Helvetica variants of the PDF standard 14 fonts.
//!
//! Reports only use built-in fonts, so text is measured with the published
//! AFM advance widths instead of parsing font files. Widths are expressed in
//! thousandths of the font size.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontVariant {
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl FontVariant {
    pub const REGULAR: FontVariant = FontVariant::new(FontWeight::Regular, FontStyle::Normal);
    pub const BOLD: FontVariant = FontVariant::new(FontWeight::Bold, FontStyle::Normal);
    pub const ITALIC: FontVariant = FontVariant::new(FontWeight::Regular, FontStyle::Italic);
    pub const BOLD_ITALIC: FontVariant = FontVariant::new(FontWeight::Bold, FontStyle::Italic);

    pub const ALL: [FontVariant; 4] = [Self::REGULAR, Self::BOLD, Self::ITALIC, Self::BOLD_ITALIC];

    pub const fn new(weight: FontWeight, style: FontStyle) -> Self {
        Self { weight, style }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.style == FontStyle::Italic
    }

    pub fn with_bold(self, bold: bool) -> Self {
        let weight = if bold { FontWeight::Bold } else { self.weight };
        Self { weight, ..self }
    }

    pub fn with_italic(self, italic: bool) -> Self {
        let style = if italic { FontStyle::Italic } else { self.style };
        Self { style, ..self }
    }

    /// PostScript name of the standard font.
    pub fn base_font(&self) -> &'static str {
        match (self.weight, self.style) {
            (FontWeight::Regular, FontStyle::Normal) => "Helvetica",
            (FontWeight::Bold, FontStyle::Normal) => "Helvetica-Bold",
            (FontWeight::Regular, FontStyle::Italic) => "Helvetica-Oblique",
            (FontWeight::Bold, FontStyle::Italic) => "Helvetica-BoldOblique",
        }
    }

    /// Name under which the font is registered in page resources.
    pub fn resource_name(&self) -> &'static str {
        match (self.weight, self.style) {
            (FontWeight::Regular, FontStyle::Normal) => "F1",
            (FontWeight::Bold, FontStyle::Normal) => "F2",
            (FontWeight::Regular, FontStyle::Italic) => "F3",
            (FontWeight::Bold, FontStyle::Italic) => "F4",
        }
    }

    /// Advance width of a single character in thousandths of the font size.
    pub fn char_width(&self, c: char) -> u16 {
        // Oblique faces share the upright metrics.
        let table = if self.is_bold() { &HELVETICA_BOLD } else { &HELVETICA };
        let c = fold_accent(c);
        match c {
            ' '..='~' => table[(c as usize) - 32],
            '\u{a0}' => table[0],
            '•' => 350,
            '–' | '€' | '«' | '»' | '§' => 556,
            '—' | '…' => 1000,
            '‘' | '’' => if self.is_bold() { 278 } else { 222 },
            '“' | '”' => if self.is_bold() { 500 } else { 333 },
            'ª' => 370,
            'º' => 365,
            '°' => 400,
            '×' => 584,
            '¹' | '²' | '³' => 333,
            _ => 556,
        }
    }

    /// Width of `text` in points when set at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

/// Accented Latin letters share the advance width of their base letter.
fn fold_accent(c: char) -> char {
    match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Encodes text for a font using `WinAnsiEncoding`.
///
/// Latin-1 passes through unchanged, the typographic characters of the
/// 0x80..0x9F block are remapped, anything else becomes `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

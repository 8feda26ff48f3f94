use ods_types::{Color, LineDash, Stroke};

/// Sizes and colors shared by all chart types.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTheme {
    pub title_size: f32,
    pub label_size: f32,
    pub tick_size: f32,
    pub text_color: Color,
    pub axis: Stroke,
    pub grid: Option<Stroke>,
    pub background: Option<Color>,
    /// Colors assigned in order to series, bars or slices without an explicit color.
    pub palette: Vec<Color>,
    pub padding: f32,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            title_size: 11.0,
            label_size: 9.0,
            tick_size: 8.0,
            text_color: Color::gray(34),
            axis: Stroke::solid(Color::gray(80), 0.8),
            grid: Some(Stroke::solid(Color::gray(200), 0.5).dashed(LineDash::Dashed)),
            background: None,
            palette: vec![
                Color::rgb(0x1F, 0x77, 0xB4),
                Color::rgb(0xFF, 0x7F, 0x0E),
                Color::rgb(0x2C, 0xA0, 0x2C),
                Color::rgb(0xD6, 0x27, 0x28),
                Color::rgb(0x94, 0x67, 0xBD),
                Color::rgb(0x8C, 0x56, 0x4B),
            ],
            padding: 6.0,
        }
    }
}

impl ChartTheme {
    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn color_at(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::gray(100);
        }
        self.palette[index % self.palette.len()]
    }
}

use crate::Chart;
use crate::axes::{AxesFrame, draw_axes};
use crate::error::ChartError;
use crate::format::NumberFormat;
use crate::scale::nice_ticks;
use crate::text::wrap_text;
use crate::theme::ChartTheme;
use ods_types::{Color, Drawing, FontVariant, Label, Point, Rect, Shape, Size, TextAnchor};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: Option<Color>,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value, color: None }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Vertical bars with a y axis starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub bars: Vec<Bar>,
    /// Format of the value printed above each bar, or `None` for no value labels.
    pub value_labels: Option<NumberFormat>,
    pub bold_values: bool,
    /// Draw category labels at 45 degrees instead of wrapping them.
    pub rotate_labels: bool,
    /// Fraction of each category slot covered by its bar.
    pub bar_width: f32,
    pub y_format: NumberFormat,
    pub theme: ChartTheme,
}

impl Default for BarChart {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            bars: Vec::new(),
            value_labels: None,
            bold_values: false,
            rotate_labels: false,
            bar_width: 0.6,
            y_format: NumberFormat::default(),
            theme: ChartTheme::default(),
        }
    }
}

impl BarChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn axis_labels(mut self, x: Option<&str>, y: Option<&str>) -> Self {
        self.x_label = x.map(str::to_string);
        self.y_label = y.map(str::to_string);
        self
    }

    pub fn bar(mut self, bar: Bar) -> Self {
        self.bars.push(bar);
        self
    }

    pub fn bars(mut self, bars: impl IntoIterator<Item = Bar>) -> Self {
        self.bars.extend(bars);
        self
    }

    pub fn value_labels(mut self, format: NumberFormat, bold: bool) -> Self {
        self.value_labels = Some(format);
        self.bold_values = bold;
        self
    }

    pub fn rotate_labels(mut self, rotate: bool) -> Self {
        self.rotate_labels = rotate;
        self
    }

    pub fn y_format(mut self, format: NumberFormat) -> Self {
        self.y_format = format;
        self
    }

    pub fn theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    fn name(&self) -> &str {
        self.title.as_deref().unwrap_or("bar chart")
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.bars.is_empty() {
            return Err(ChartError::EmptyData(self.name().to_string()));
        }
        if let Some(bar) = self.bars.iter().find(|b| !b.value.is_finite() || b.value < 0.0) {
            return Err(ChartError::InvalidValue {
                chart: self.name().to_string(),
                label: bar.label.clone(),
                value: bar.value,
            });
        }
        Ok(())
    }

    /// Height needed below the plot for the category labels.
    fn label_band(&self, slot_width: f32) -> (f32, Vec<Vec<String>>) {
        let size = self.theme.tick_size;
        if self.rotate_labels {
            let widest = self
                .bars
                .iter()
                .map(|b| FontVariant::REGULAR.text_width(&b.label, size))
                .fold(0.0f32, f32::max);
            let lines = self.bars.iter().map(|b| vec![b.label.clone()]).collect();
            (widest * std::f32::consts::FRAC_1_SQRT_2 + size + 8.0, lines)
        } else {
            let lines: Vec<Vec<String>> = self
                .bars
                .iter()
                .map(|b| wrap_text(&b.label, FontVariant::REGULAR, size, slot_width * 0.95))
                .collect();
            let max_lines = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);
            (max_lines as f32 * size * 1.2 + 6.0, lines)
        }
    }
}

impl Chart for BarChart {
    fn draw(&self, size: Size) -> Result<Drawing, ChartError> {
        self.validate()?;
        let theme = &self.theme;
        let mut drawing = Drawing::new(size);

        let max_value = self.bars.iter().map(|b| b.value).fold(0.0f64, f64::max);
        // Headroom for the value labels printed above the bars.
        let headroom = if self.value_labels.is_some() { 1.12 } else { 1.05 };
        let y_ticks = nice_ticks(0.0, (max_value * headroom).max(f64::EPSILON), 5);

        // The exact plot width depends on the tick labels; an estimate is enough for wrapping.
        let estimated_slot = (size.width - 2.0 * theme.padding - 40.0) / self.bars.len() as f32;
        let (label_band, label_lines) = self.label_band(estimated_slot);

        let axes = draw_axes(
            &AxesFrame {
                chart: self.name(),
                title: self.title.as_deref(),
                x_label: self.x_label.as_deref(),
                y_label: self.y_label.as_deref(),
                y_ticks: &y_ticks,
                y_format: &self.y_format,
                x_tick_band: label_band,
                theme,
            },
            size,
            &mut drawing,
        )?;
        let plot = axes.plot;
        let slot = plot.width / self.bars.len() as f32;
        let bar_width = slot * self.bar_width.clamp(0.05, 1.0);

        for (i, (bar, lines)) in self.bars.iter().zip(label_lines).enumerate() {
            let center_x = plot.x + slot * (i as f32 + 0.5);
            let top = axes.y_scale.map(bar.value);
            let color = bar.color.unwrap_or_else(|| theme.color_at(i));
            drawing.push(Shape::filled_rect(
                Rect::new(center_x - bar_width / 2.0, top, bar_width, plot.bottom() - top),
                color,
            ));

            if let Some(format) = &self.value_labels {
                let font = if self.bold_values { FontVariant::BOLD } else { FontVariant::REGULAR };
                drawing.push(Shape::Text(
                    Label::new(Point::new(center_x, top - 3.0), format.format(bar.value), theme.tick_size)
                        .font(font)
                        .color(theme.text_color)
                        .anchor(TextAnchor::Middle),
                ));
            }

            if self.rotate_labels {
                drawing.push(Shape::Text(
                    Label::new(Point::new(center_x + 3.0, plot.bottom() + theme.tick_size + 2.0), bar.label.clone(), theme.tick_size)
                        .color(theme.text_color)
                        .anchor(TextAnchor::End)
                        .rotate(45.0),
                ));
            } else {
                for (line_index, line) in lines.into_iter().enumerate() {
                    let baseline = plot.bottom() + theme.tick_size + 3.0 + line_index as f32 * theme.tick_size * 1.2;
                    drawing.push(Shape::Text(
                        Label::new(Point::new(center_x, baseline), line, theme.tick_size)
                            .color(theme.text_color)
                            .anchor(TextAnchor::Middle),
                    ));
                }
            }
        }

        log::debug!("Drew bar chart '{}' with {} bars", self.name(), self.bars.len());
        Ok(drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_rects(drawing: &Drawing) -> Vec<Rect> {
        drawing
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { rect, fill: Some(_), .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn one_bar_per_category_with_proportional_heights() {
        let chart = BarChart::new()
            .bar(Bar::new("Sergipe (2024)", 6.2))
            .bar(Bar::new("Média Brasil", 4.0))
            .bar(Bar::new("Melhor Estado", 12.5))
            .bar(Bar::new("Meta 2030", 15.0));
        let drawing = chart.draw(Size::new(400.0, 250.0)).unwrap();
        let rects = bar_rects(&drawing);
        assert_eq!(rects.len(), 4);
        let ratio = rects[3].height / rects[2].height;
        assert!((ratio - 15.0 / 12.5).abs() < 1e-3);
        // All bars share the same baseline.
        assert!(rects.iter().all(|r| (r.bottom() - rects[0].bottom()).abs() < 1e-3));
    }

    #[test]
    fn value_labels_use_the_given_format() {
        let chart = BarChart::new()
            .bar(Bar::new("Coleta Seletiva", 20.0))
            .bar(Bar::new("Compostagem", 6.7))
            .value_labels(NumberFormat::new(1).decimal_comma().suffix("%"), true);
        let drawing = chart.draw(Size::new(400.0, 250.0)).unwrap();
        assert!(drawing.has_label("20,0%"));
        let label = drawing.labels().find(|l| l.text == "6,7%").unwrap();
        assert!(label.font.is_bold());
    }

    #[test]
    fn explicit_colors_win_over_palette() {
        let red = Color::rgb(255, 0, 0);
        let chart = BarChart::new().bar(Bar::new("a", 1.0).color(red)).bar(Bar::new("b", 2.0));
        let drawing = chart.draw(Size::new(300.0, 200.0)).unwrap();
        let fills: Vec<Color> = drawing
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { fill: Some(c), .. } => Some(*c),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![red, ChartTheme::default().color_at(1)]);
    }

    #[test]
    fn rotated_labels_are_anchored_at_their_end() {
        let chart = BarChart::new()
            .bar(Bar::new("Cooperativas de Reciclagem", 10.7))
            .rotate_labels(true);
        let drawing = chart.draw(Size::new(300.0, 250.0)).unwrap();
        let label = drawing.labels().find(|l| l.text == "Cooperativas de Reciclagem").unwrap();
        assert_eq!(label.rotation, 45.0);
        assert_eq!(label.anchor, TextAnchor::End);
    }

    #[test]
    fn long_labels_wrap_under_their_bar() {
        let chart = BarChart::new().bars(
            ["Aracaju", "Nossa Senhora do Socorro", "São Cristóvão", "Lagarto", "Itabaiana", "Outros"]
                .into_iter()
                .zip([42.0, 18.0, 15.0, 12.0, 10.0, 38.0])
                .map(|(l, v)| Bar::new(l, v)),
        );
        let drawing = chart.draw(Size::new(320.0, 240.0)).unwrap();
        assert!(!drawing.has_label("Nossa Senhora do Socorro"));
        assert!(drawing.labels().any(|l| l.text.starts_with("Nossa")));
    }

    #[test]
    fn negative_values_are_rejected() {
        let chart = BarChart::new().bar(Bar::new("x", -1.0));
        assert!(matches!(chart.draw(Size::new(300.0, 200.0)), Err(ChartError::InvalidValue { .. })));
        assert!(matches!(BarChart::new().draw(Size::new(300.0, 200.0)), Err(ChartError::EmptyData(_))));
    }
}

use crate::Chart;
use crate::axes::draw_title;
use crate::error::ChartError;
use crate::format::NumberFormat;
use crate::theme::ChartTheme;
use ods_types::{Color, Drawing, Label, Point, Rect, Shape, Size, Stroke, TextAnchor};

/// Maximum angle, in degrees, between two consecutive points of an arc.
const ARC_STEP_DEG: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: Option<Color>,
}

impl Slice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value, color: None }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Slices laid out counter-clockwise from `start_angle` with their share printed inside.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: Option<String>,
    pub slices: Vec<Slice>,
    /// Angle of the first slice edge in degrees, 0 pointing right and 90 up.
    pub start_angle: f32,
    /// Format of the share printed inside each slice, or `None` to omit it.
    pub percent_format: Option<NumberFormat>,
    pub theme: ChartTheme,
}

impl Default for PieChart {
    fn default() -> Self {
        Self {
            title: None,
            slices: Vec::new(),
            start_angle: 90.0,
            percent_format: Some(NumberFormat::new(1).suffix("%")),
            theme: ChartTheme::default(),
        }
    }
}

impl PieChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn slice(mut self, slice: Slice) -> Self {
        self.slices.push(slice);
        self
    }

    pub fn slices(mut self, slices: impl IntoIterator<Item = Slice>) -> Self {
        self.slices.extend(slices);
        self
    }

    pub fn percent_format(mut self, format: Option<NumberFormat>) -> Self {
        self.percent_format = format;
        self
    }

    pub fn theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    fn name(&self) -> &str {
        self.title.as_deref().unwrap_or("pie chart")
    }

    fn total(&self) -> Result<f64, ChartError> {
        if let Some(slice) = self.slices.iter().find(|s| !s.value.is_finite() || s.value < 0.0) {
            return Err(ChartError::InvalidValue {
                chart: self.name().to_string(),
                label: slice.label.clone(),
                value: slice.value,
            });
        }
        let total: f64 = self.slices.iter().map(|s| s.value).sum();
        if total <= 0.0 {
            return Err(ChartError::EmptyData(self.name().to_string()));
        }
        Ok(total)
    }

    /// Start and end angle of every slice, in degrees.
    pub fn slice_angles(&self) -> Result<Vec<(f32, f32)>, ChartError> {
        let total = self.total()?;
        let mut start = self.start_angle;
        Ok(self
            .slices
            .iter()
            .map(|slice| {
                let sweep = (slice.value / total * 360.0) as f32;
                let angles = (start, start + sweep);
                start += sweep;
                angles
            })
            .collect())
    }
}

/// Point at `angle` degrees on a circle, in y-down drawing coordinates.
fn polar(center: Point, radius: f32, angle: f32) -> Point {
    let rad = angle.to_radians();
    Point::new(center.x + radius * rad.cos(), center.y - radius * rad.sin())
}

impl Chart for PieChart {
    fn draw(&self, size: Size) -> Result<Drawing, ChartError> {
        let total = self.total()?;
        let angles = self.slice_angles()?;
        let theme = &self.theme;
        let mut drawing = Drawing::new(size);
        if let Some(bg) = theme.background {
            drawing.push(Shape::filled_rect(Rect::new(0.0, 0.0, size.width, size.height), bg));
        }

        let top = draw_title(self.title.as_deref(), theme, size, &mut drawing);
        let area_height = size.height - top - theme.padding;
        let area_width = size.width - 2.0 * theme.padding;
        // Outer labels need room on every side of the circle.
        let radius = area_width.min(area_height) / 2.0 * 0.72;
        if radius < 10.0 {
            return Err(ChartError::TooSmall {
                chart: self.name().to_string(),
                width: size.width,
                height: size.height,
            });
        }
        let center = Point::new(size.width / 2.0, top + area_height / 2.0);

        for (i, (slice, (start, end))) in self.slices.iter().zip(angles).enumerate() {
            if slice.value <= 0.0 {
                continue;
            }
            let color = slice.color.unwrap_or_else(|| theme.color_at(i));
            let steps = ((end - start) / ARC_STEP_DEG).ceil().max(1.0) as usize;
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            points.extend((0..=steps).map(|k| polar(center, radius, start + (end - start) * k as f32 / steps as f32)));
            drawing.push(Shape::Polygon {
                points,
                fill: Some(color),
                stroke: Some(Stroke::solid(Color::WHITE, 0.8)),
            });

            let middle = (start + end) / 2.0;
            let outer = polar(center, radius * 1.1, middle);
            let cos = middle.to_radians().cos();
            let anchor = if cos > 0.15 {
                TextAnchor::Start
            } else if cos < -0.15 {
                TextAnchor::End
            } else {
                TextAnchor::Middle
            };
            drawing.push(Shape::Text(
                Label::new(outer.offset(0.0, theme.label_size * 0.35), slice.label.clone(), theme.label_size)
                    .color(theme.text_color)
                    .anchor(anchor),
            ));

            if let Some(format) = &self.percent_format {
                let inner = polar(center, radius * 0.62, middle);
                drawing.push(Shape::Text(
                    Label::new(
                        inner.offset(0.0, theme.tick_size * 0.35),
                        format.format(slice.value / total * 100.0),
                        theme.tick_size,
                    )
                    .color(theme.text_color)
                    .anchor(TextAnchor::Middle),
                ));
            }
        }

        log::debug!("Drew pie chart '{}' with {} slices", self.name(), self.slices.len());
        Ok(drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composition() -> PieChart {
        PieChart::new().title("Composição").slices(
            [("Plástico", 30.0), ("Papel/Papelão", 25.0), ("Vidro", 15.0), ("Metal", 20.0), ("Orgânicos", 5.0), ("Outros", 5.0)]
                .into_iter()
                .map(|(l, v)| Slice::new(l, v)),
        )
    }

    #[test]
    fn slices_cover_full_circle_from_start_angle() {
        let angles = composition().slice_angles().unwrap();
        assert_eq!(angles.len(), 6);
        assert_eq!(angles[0].0, 90.0);
        assert!((angles[0].1 - (90.0 + 108.0)).abs() < 1e-3);
        for pair in angles.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        let covered: f32 = angles.iter().map(|(s, e)| e - s).sum();
        assert!((covered - 360.0).abs() < 1e-3);
    }

    #[test]
    fn draws_one_polygon_and_two_labels_per_slice() {
        let drawing = composition().draw(Size::new(320.0, 260.0)).unwrap();
        let polygons = drawing.shapes.iter().filter(|s| matches!(s, Shape::Polygon { .. })).count();
        assert_eq!(polygons, 6);
        assert!(drawing.has_label("Plástico"));
        assert!(drawing.has_label("30.0%"));
        assert!(drawing.has_label("5.0%"));
    }

    #[test]
    fn first_slice_starts_at_the_top() {
        let drawing = composition().draw(Size::new(300.0, 300.0)).unwrap();
        let first = drawing
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Polygon { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        let center = first[0];
        let edge = first[1];
        assert!((edge.x - center.x).abs() < 1e-3);
        assert!(edge.y < center.y);
    }

    #[test]
    fn rejects_zero_total_and_negative_values() {
        let zero = PieChart::new().slice(Slice::new("a", 0.0));
        assert!(matches!(zero.draw(Size::new(200.0, 200.0)), Err(ChartError::EmptyData(_))));
        let negative = PieChart::new().slice(Slice::new("a", -5.0)).slice(Slice::new("b", 10.0));
        assert!(matches!(negative.draw(Size::new(200.0, 200.0)), Err(ChartError::InvalidValue { .. })));
    }
}

use crate::Chart;
use crate::axes::{AxesFrame, draw_axes};
use crate::error::ChartError;
use crate::format::NumberFormat;
use crate::scale::{LinearScale, nice_ticks};
use crate::theme::ChartTheme;
use itertools::{Itertools, MinMaxResult};
use ods_types::{Color, Drawing, FontVariant, Label, LineDash, Point, Rect, Shape, Size, Stroke, TextAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    None,
    Circle,
    Square,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub color: Color,
    pub width: f32,
    pub dash: LineDash,
    pub marker: Marker,
}

impl LineSeries {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>, color: Color) -> Self {
        Self {
            label: label.into(),
            points,
            color,
            width: 1.5,
            dash: LineDash::Solid,
            marker: Marker::None,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn dash(mut self, dash: LineDash) -> Self {
        self.dash = dash;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    fn stroke(&self) -> Stroke {
        Stroke { color: self.color, width: self.width, dash: self.dash }
    }
}

/// A horizontal line across the whole plot, such as a target value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub label: String,
    pub value: f64,
    pub stroke: Stroke,
}

impl ReferenceLine {
    pub fn new(label: impl Into<String>, value: f64, stroke: Stroke) -> Self {
        Self { label: label.into(), value, stroke }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineChart {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub series: Vec<LineSeries>,
    pub reference_lines: Vec<ReferenceLine>,
    pub show_legend: bool,
    pub y_format: NumberFormat,
    pub theme: ChartTheme,
}

impl LineChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    pub fn series(mut self, series: LineSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn reference_line(mut self, line: ReferenceLine) -> Self {
        self.reference_lines.push(line);
        self
    }

    pub fn legend(mut self, show: bool) -> Self {
        self.show_legend = show;
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
        self.title.as_deref().unwrap_or("line chart")
    }

    fn validate(&self) -> Result<(), ChartError> {
        if self.series.iter().all(|s| s.points.is_empty()) {
            return Err(ChartError::EmptyData(self.name().to_string()));
        }
        for series in &self.series {
            if let Some(&(_, y)) = series.points.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
                return Err(ChartError::InvalidValue {
                    chart: self.name().to_string(),
                    label: series.label.clone(),
                    value: y,
                });
            }
        }
        if let Some(line) = self.reference_lines.iter().find(|l| !l.value.is_finite()) {
            return Err(ChartError::InvalidValue {
                chart: self.name().to_string(),
                label: line.label.clone(),
                value: line.value,
            });
        }
        Ok(())
    }

    fn draw_legend(&self, plot: Rect, drawing: &mut Drawing) {
        let theme = &self.theme;
        let entries: Vec<(&str, Stroke, Marker)> = self
            .series
            .iter()
            .filter(|s| !s.label.is_empty())
            .map(|s| (s.label.as_str(), s.stroke(), s.marker))
            .chain(
                self.reference_lines
                    .iter()
                    .filter(|l| !l.label.is_empty())
                    .map(|l| (l.label.as_str(), l.stroke, Marker::None)),
            )
            .collect();
        if entries.is_empty() {
            return;
        }

        let entry_height = theme.label_size * 1.5;
        let text_width = entries
            .iter()
            .map(|(label, _, _)| FontVariant::REGULAR.text_width(label, theme.label_size))
            .fold(0.0f32, f32::max);
        let frame = Rect::new(
            plot.x + 6.0,
            plot.y + 6.0,
            text_width + 34.0,
            entries.len() as f32 * entry_height + 6.0,
        );
        drawing.push(Shape::Rect {
            rect: frame,
            fill: Some(Color::WHITE),
            stroke: Some(Stroke::solid(Color::gray(190), 0.5)),
        });

        for (i, (label, stroke, marker)) in entries.into_iter().enumerate() {
            let center_y = frame.y + 3.0 + (i as f32 + 0.5) * entry_height;
            let sample = Stroke { width: stroke.width.min(2.5), ..stroke };
            drawing.push(Shape::line(
                Point::new(frame.x + 5.0, center_y),
                Point::new(frame.x + 25.0, center_y),
                sample,
            ));
            push_marker(drawing, marker, Point::new(frame.x + 15.0, center_y), stroke);
            drawing.push(Shape::Text(
                Label::new(
                    Point::new(frame.x + 29.0, center_y + theme.label_size * 0.35),
                    label,
                    theme.label_size,
                )
                .color(theme.text_color),
            ));
        }
    }
}

fn push_marker(drawing: &mut Drawing, marker: Marker, at: Point, stroke: Stroke) {
    let radius = stroke.width * 1.2 + 1.0;
    match marker {
        Marker::None => {}
        Marker::Circle => drawing.push(Shape::Circle {
            center: at,
            radius,
            fill: Some(stroke.color),
            stroke: None,
        }),
        Marker::Square => drawing.push(Shape::filled_rect(
            Rect::new(at.x - radius, at.y - radius, radius * 2.0, radius * 2.0),
            stroke.color,
        )),
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

impl Chart for LineChart {
    fn draw(&self, size: Size) -> Result<Drawing, ChartError> {
        self.validate()?;
        let theme = &self.theme;
        let mut drawing = Drawing::new(size);

        let all_points = || self.series.iter().flat_map(|s| s.points.iter().copied());
        let (x_min, x_max) = min_max(all_points().map(|(x, _)| x))
            .ok_or_else(|| ChartError::EmptyData(self.name().to_string()))?;
        let (y_min, y_max) = min_max(
            all_points()
                .map(|(_, y)| y)
                .chain(self.reference_lines.iter().map(|l| l.value)),
        )
        .ok_or_else(|| ChartError::EmptyData(self.name().to_string()))?;

        let y_span = if y_max > y_min { y_max - y_min } else { y_max.abs().max(1.0) };
        let y_ticks = nice_ticks(y_min - y_span * 0.05, y_max + y_span * 0.05, 6);

        let axes = draw_axes(
            &AxesFrame {
                chart: self.name(),
                title: self.title.as_deref(),
                x_label: self.x_label.as_deref(),
                y_label: self.y_label.as_deref(),
                y_ticks: &y_ticks,
                y_format: &self.y_format,
                x_tick_band: theme.tick_size + 6.0,
                theme,
            },
            size,
            &mut drawing,
        )?;
        let plot = axes.plot;

        let x_pad = if x_max > x_min { (x_max - x_min) * 0.05 } else { 0.5 };
        let x_scale = LinearScale::new((x_min - x_pad, x_max + x_pad), (plot.x, plot.right()));

        // Integer x ticks, thinned out so that at most ~15 labels are drawn.
        let first_tick = x_min.ceil() as i64;
        let last_tick = x_max.floor() as i64;
        let tick_step = (((last_tick - first_tick) as f64 / 15.0).ceil() as usize).max(1);
        for tick in (first_tick..=last_tick).step_by(tick_step) {
            let x = x_scale.map(tick as f64);
            if let Some(grid) = theme.grid {
                drawing.push(Shape::line(Point::new(x, plot.y), Point::new(x, plot.bottom()), grid));
            }
            drawing.push(Shape::line(
                Point::new(x, plot.bottom()),
                Point::new(x, plot.bottom() + 3.0),
                theme.axis,
            ));
            drawing.push(Shape::Text(
                Label::new(Point::new(x, plot.bottom() + theme.tick_size + 4.0), tick.to_string(), theme.tick_size)
                    .color(theme.text_color)
                    .anchor(TextAnchor::Middle),
            ));
        }

        for line in &self.reference_lines {
            let y = axes.y_scale.map(line.value);
            drawing.push(Shape::line(Point::new(plot.x, y), Point::new(plot.right(), y), line.stroke));
        }

        for series in &self.series {
            let points: Vec<Point> = series
                .points
                .iter()
                .map(|&(x, y)| Point::new(x_scale.map(x), axes.y_scale.map(y)))
                .collect();
            if points.len() > 1 {
                drawing.push(Shape::Polyline { points: points.clone(), stroke: series.stroke() });
            }
            for point in points {
                push_marker(&mut drawing, series.marker, point, series.stroke());
            }
        }

        if self.show_legend {
            self.draw_legend(plot, &mut drawing);
        }

        log::debug!("Drew line chart '{}' with {} shapes", self.name(), drawing.shapes.len());
        Ok(drawing)
    }
}

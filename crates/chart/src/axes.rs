//! Frame shared by the cartesian charts: title, y axis with ticks and grid,
//! axis labels and the resulting plot rectangle.

use crate::error::ChartError;
use crate::format::NumberFormat;
use crate::scale::{LinearScale, decimals_for_step};
use crate::text::wrap_text;
use crate::theme::ChartTheme;
use ods_types::{Drawing, FontVariant, Label, Point, Rect, Shape, Size, TextAnchor};

/// Smallest plot area, in points, that still yields a readable chart.
const MIN_PLOT_EXTENT: f32 = 20.0;

pub(crate) struct AxesFrame<'a> {
    pub chart: &'a str,
    pub title: Option<&'a str>,
    pub x_label: Option<&'a str>,
    pub y_label: Option<&'a str>,
    pub y_ticks: &'a [f64],
    pub y_format: &'a NumberFormat,
    /// Height reserved below the plot for the x tick labels.
    pub x_tick_band: f32,
    pub theme: &'a ChartTheme,
}

pub(crate) struct Axes {
    pub plot: Rect,
    pub y_scale: LinearScale,
}

/// Draws the title at the top of the chart and returns the y coordinate below it.
pub(crate) fn draw_title(
    title: Option<&str>,
    theme: &ChartTheme,
    size: Size,
    drawing: &mut Drawing,
) -> f32 {
    let mut top = theme.padding;
    let Some(title) = title else {
        return top;
    };
    let line_height = theme.title_size * 1.25;
    let lines = wrap_text(title, FontVariant::BOLD, theme.title_size, size.width - 2.0 * theme.padding);
    for (i, line) in lines.iter().enumerate() {
        let baseline = theme.padding + theme.title_size + i as f32 * line_height;
        drawing.push(Shape::Text(
            Label::new(Point::new(size.width / 2.0, baseline), line.clone(), theme.title_size)
                .font(FontVariant::BOLD)
                .color(theme.text_color)
                .anchor(TextAnchor::Middle),
        ));
    }
    top += lines.len() as f32 * line_height + 6.0;
    top
}

pub(crate) fn draw_axes(frame: &AxesFrame, size: Size, drawing: &mut Drawing) -> Result<Axes, ChartError> {
    let theme = frame.theme;
    if let Some(bg) = theme.background {
        drawing.push(Shape::filled_rect(Rect::new(0.0, 0.0, size.width, size.height), bg));
    }

    let top = draw_title(frame.title, theme, size, drawing);

    let step = match frame.y_ticks {
        [a, b, ..] => b - a,
        _ => 1.0,
    };
    let tick_format = frame.y_format.with_decimals(decimals_for_step(step));
    let tick_labels: Vec<String> = frame.y_ticks.iter().map(|&t| tick_format.format(t)).collect();
    let tick_width = tick_labels
        .iter()
        .map(|t| FontVariant::REGULAR.text_width(t, theme.tick_size))
        .fold(0.0f32, f32::max);

    let y_label_band = if frame.y_label.is_some() { theme.label_size * 1.6 } else { 0.0 };
    let x_label_band = if frame.x_label.is_some() { theme.label_size * 1.8 } else { 0.0 };

    let left = theme.padding + y_label_band + tick_width + 5.0;
    let right = size.width - theme.padding - 4.0;
    let bottom = size.height - theme.padding - x_label_band - frame.x_tick_band;
    let plot = Rect::new(left, top, right - left, bottom - top);

    if plot.width < MIN_PLOT_EXTENT || plot.height < MIN_PLOT_EXTENT {
        return Err(ChartError::TooSmall {
            chart: frame.chart.to_string(),
            width: size.width,
            height: size.height,
        });
    }

    let domain = match (frame.y_ticks.first(), frame.y_ticks.last()) {
        (Some(&lo), Some(&hi)) if hi > lo => (lo, hi),
        _ => (0.0, 1.0),
    };
    let y_scale = LinearScale::new(domain, (plot.bottom(), plot.y));

    for (tick, text) in frame.y_ticks.iter().zip(tick_labels) {
        let y = y_scale.map(*tick);
        if let Some(grid) = theme.grid {
            drawing.push(Shape::line(Point::new(plot.x, y), Point::new(plot.right(), y), grid));
        }
        drawing.push(Shape::line(Point::new(plot.x - 3.0, y), Point::new(plot.x, y), theme.axis));
        drawing.push(Shape::Text(
            Label::new(Point::new(plot.x - 5.0, y + theme.tick_size * 0.35), text, theme.tick_size)
                .color(theme.text_color)
                .anchor(TextAnchor::End),
        ));
    }

    drawing.push(Shape::line(Point::new(plot.x, plot.y), Point::new(plot.x, plot.bottom()), theme.axis));
    drawing.push(Shape::line(
        Point::new(plot.x, plot.bottom()),
        Point::new(plot.right(), plot.bottom()),
        theme.axis,
    ));

    if let Some(y_label) = frame.y_label {
        drawing.push(Shape::Text(
            Label::new(Point::new(theme.padding + theme.label_size, plot.center().y), y_label, theme.label_size)
                .color(theme.text_color)
                .anchor(TextAnchor::Middle)
                .rotate(90.0),
        ));
    }
    if let Some(x_label) = frame.x_label {
        drawing.push(Shape::Text(
            Label::new(
                Point::new(plot.center().x, size.height - theme.padding - theme.label_size * 0.3),
                x_label,
                theme.label_size,
            )
            .color(theme.text_color)
            .anchor(TextAnchor::Middle),
        ));
    }

    Ok(Axes { plot, y_scale })
}

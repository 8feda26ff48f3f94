//! The figures of both reports.

use super::ReportContext;
use super::format;
use super::styles::ODS12_COLOR;
use ods_chart::{Bar, BarChart, Chart, ChartError, ChartTheme, LineChart, LineSeries, Marker, NumberFormat, PieChart, ReferenceLine, Slice};
use ods_indicator::Observation;
use ods_types::{Color, Drawing, LineDash, Size, Stroke};

/// Six by four inches.
pub const FIGURE_SIZE: Size = Size { width: 432.0, height: 288.0 };
/// Four by four inches.
pub const PIE_SIZE: Size = Size { width: 288.0, height: 288.0 };

const DARK_GREEN: Color = Color::rgb(0x3F, 0x7E, 0x44);
const LIGHT_GREEN: Color = Color::rgb(0x56, 0xC0, 0x2B);
const MUSTARD: Color = Color::rgb(0xDD, 0xA6, 0x3A);
const RECYCLING_GREEN: Color = Color::rgb(0x3F, 0xB0, 0x49);
const TARGET_RED: Color = Color::rgb(0xD6, 0x27, 0x28);

fn ods_palette() -> Vec<Color> {
    vec![ODS12_COLOR, DARK_GREEN, LIGHT_GREEN, MUSTARD]
}

fn green_shades() -> Vec<Color> {
    vec![
        RECYCLING_GREEN,
        Color::rgb(0x56, 0xC4, 0x56),
        Color::rgb(0x76, 0xD2, 0x75),
        Color::rgb(0x98, 0xE0, 0x97),
        Color::rgb(0xB8, 0xEB, 0xB8),
        Color::rgb(0xD8, 0xF5, 0xD8),
    ]
}

fn percent_axis() -> NumberFormat {
    NumberFormat::new(1).decimal_comma()
}

fn percent_labels() -> NumberFormat {
    NumberFormat::new(1).decimal_comma().suffix("%")
}

fn points(observations: &[Observation]) -> Vec<(f64, f64)> {
    observations.iter().map(|o| (o.year as f64, o.value)).collect()
}

fn period(ctx: &ReportContext) -> String {
    format!("{}-{}", ctx.analysis.initial_year, ctx.analysis.last_observed_year)
}

/// Line of the observed series.
pub fn history_line(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    LineChart::new()
        .title(format!(
            "Evolução da Taxa de Reciclagem de Resíduos Sólidos Urbanos em {} ({})",
            ctx.dataset.region,
            period(ctx)
        ))
        .axis_labels("Ano", "Percentual (%)")
        .series(
            LineSeries::new("Dados históricos", points(&ctx.dataset.history), ODS12_COLOR)
                .width(2.0)
                .marker(Marker::Circle),
        )
        .y_format(percent_axis())
        .draw(FIGURE_SIZE)
}

/// The current value against the national benchmarks and the target.
pub fn comparison_bars(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    let analysis = ctx.analysis;
    let benchmarks = &ctx.dataset.benchmarks;
    BarChart::new()
        .title("Comparação da Taxa de Reciclagem: Situação Atual vs. Meta")
        .axis_labels(None, Some("Percentual (%)"))
        .bars([
            Bar::new(format!("{} ({})", ctx.dataset.region, analysis.last_observed_year), analysis.current_value),
            Bar::new("Média Brasil", benchmarks.national_average),
            Bar::new("Melhor Estado", benchmarks.best_state),
            Bar::new(format!("Meta {}", analysis.target.year), analysis.target.value),
        ])
        .value_labels(percent_labels(), true)
        .y_format(percent_axis())
        .theme(ChartTheme::default().with_palette(ods_palette()))
        .draw(FIGURE_SIZE)
}

/// Observed series, the linear path required to reach the target and the target itself.
pub fn projection_line(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    let analysis = ctx.analysis;
    let target = analysis.target;
    LineChart::new()
        .title(format!(
            "Projeção da Taxa de Reciclagem até {} para Atingir a Meta",
            target.year
        ))
        .axis_labels("Ano", "Percentual (%)")
        .series(
            LineSeries::new("Dados históricos", points(&ctx.dataset.history), ODS12_COLOR)
                .width(2.0)
                .marker(Marker::Circle),
        )
        .series(
            LineSeries::new("Projeção necessária", points(&analysis.path_from_last_observation()), LIGHT_GREEN)
                .width(2.0)
                .dash(LineDash::Dashed)
                .marker(Marker::Square),
        )
        .reference_line(ReferenceLine::new(
            format!("Meta {}: {}", target.year, format::percent(target.value, 1)),
            target.value,
            Stroke::solid(MUSTARD, 1.5).dashed(LineDash::DashDot),
        ))
        .legend(true)
        .y_format(percent_axis())
        .draw(FIGURE_SIZE)
}

/// Share of municipalities covered by each program.
pub fn program_bars(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    BarChart::new()
        .title(format!("Iniciativas de Gestão de Resíduos por Município em {}", ctx.dataset.region))
        .axis_labels(None, Some("Percentual de Municípios (%)"))
        .bars(ctx.dataset.programs.iter().map(|p| Bar::new(p.name.clone(), p.percent)))
        .value_labels(percent_labels(), false)
        .rotate_labels(true)
        .y_format(percent_axis())
        .theme(ChartTheme::default().with_palette(ods_palette()))
        .draw(FIGURE_SIZE)
}

/// Observed series as bars.
pub fn history_bars(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    BarChart::new()
        .title(format!(
            "Evolução do Percentual de Resíduos Reciclados em {} ({})",
            ctx.dataset.region,
            period(ctx)
        ))
        .axis_labels(Some("Ano"), Some("Percentual de Resíduos Reciclados (%)"))
        .bars(
            ctx.dataset
                .history
                .iter()
                .map(|o| Bar::new(o.year.to_string(), o.value).color(RECYCLING_GREEN)),
        )
        .value_labels(percent_axis(), false)
        .y_format(percent_axis())
        .draw(FIGURE_SIZE)
}

/// Composition of the recycled waste by material.
pub fn composition_pie(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    PieChart::new()
        .title(format!(
            "Distribuição dos Tipos de Resíduos Reciclados em {} ({})",
            ctx.dataset.region, ctx.analysis.last_observed_year
        ))
        .slices(ctx.dataset.waste_composition.iter().map(|s| Slice::new(s.label.clone(), s.percent)))
        .percent_format(Some(percent_labels()))
        .theme(ChartTheme::default().with_palette(green_shades()))
        .draw(PIE_SIZE)
}

/// Number of sustainability initiatives per municipality.
pub fn municipal_bars(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    BarChart::new()
        .title(format!(
            "Iniciativas de Consumo e Produção Sustentável por Município ({})",
            ctx.analysis.last_observed_year
        ))
        .axis_labels(Some("Município"), Some("Número de Iniciativas"))
        .bars(
            ctx.dataset
                .municipal_initiatives
                .iter()
                .map(|m| Bar::new(m.label.clone(), m.count as f64).color(RECYCLING_GREEN)),
        )
        .value_labels(NumberFormat::new(0), false)
        .y_format(NumberFormat::new(0))
        .draw(FIGURE_SIZE)
}

/// Observed series continued by the required path, against the target.
pub fn enhanced_projection_line(ctx: &ReportContext) -> Result<Drawing, ChartError> {
    let analysis = ctx.analysis;
    let target = analysis.target;
    LineChart::new()
        .title(format!("Projeção do Percentual de Resíduos Reciclados até {}", target.year))
        .axis_labels("Ano", "Percentual (%)")
        .series(
            LineSeries::new("Percentual reciclado", points(&ctx.dataset.history), RECYCLING_GREEN)
                .width(2.0)
                .marker(Marker::Circle),
        )
        .series(
            LineSeries::new("Projeção", points(&analysis.path_from_last_observation()), RECYCLING_GREEN.lighten(0.3))
                .width(2.0)
                .dash(LineDash::Dashed),
        )
        .reference_line(ReferenceLine::new(
            format!("Meta ODS ({})", format::percent(target.value, 0)),
            target.value,
            Stroke::solid(TARGET_RED, 1.5),
        ))
        .legend(true)
        .y_format(percent_axis())
        .draw(FIGURE_SIZE)
}

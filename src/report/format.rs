//! Brazilian Portuguese number and date formatting for report text.

use chrono::NaiveDate;

/// Formats `value` with `decimals` places and a decimal comma.
pub fn decimal(value: f64, decimals: usize) -> String {
    let value = if value.abs() < 0.5 * 10f64.powi(-(decimals as i32)) { 0.0 } else { value };
    format!("{:.*}", decimals, value).replace('.', ",")
}

/// `6,2%` style percentage.
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{}%", decimal(value, decimals))
}

pub fn date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Value followed by "ponto percentual", plural from two upwards.
pub fn percentage_points(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * scale).round() / scale;
    let unit = if rounded < 2.0 { "ponto percentual" } else { "pontos percentuais" };
    format!("{} {}", decimal(value, decimals), unit)
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("chart '{0}' has no data to plot")]
    EmptyData(String),

    #[error("chart '{chart}' cannot plot value {value} for '{label}'")]
    InvalidValue { chart: String, label: String, value: f64 },

    #[error("chart '{chart}' is too small: {width}x{height}pt leaves no plot area")]
    TooSmall { chart: String, width: f32, height: f32 },
}

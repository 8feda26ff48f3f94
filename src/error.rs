use ods_chart::ChartError;
use ods_indicator::InvalidInputError;
use ods_layout::LayoutError;
use ods_render_lopdf::RenderError;
use ods_style::StyleError;
use std::path::PathBuf;
use thiserror::Error;

/// Every way generating a report can fail.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Indicator data is invalid: {0}")]
    InvalidInput(#[from] InvalidInputError),

    #[error("Chart drawing failed: {0}")]
    Chart(#[from] ChartError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Stylesheet is invalid: {0}")]
    Style(#[from] StyleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON from '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Required data is missing: {0}")]
    MissingData(String),
}

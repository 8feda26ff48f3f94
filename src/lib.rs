//! PDF technical reports for the SDG 12 (ODS 12) recycled solid waste indicator.
//!
//! The pipeline loads the published indicator record and the complementary
//! dataset, runs the trend and target projection, and lays out two reports:
//! a technical report and an enhanced one with policy recommendations.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::ReportConfig;
pub use data::{IndicatorRecord, ReportDataset};
pub use error::ReportError;
pub use pipeline::{ReportPipeline, ReportPipelineBuilder};
pub use report::ReportKind;

pub use ods_indicator::{InvalidInputError, Observation, ProjectionResult, Target, TimeSeries, compute_projection};

//! Document builders for the two report kinds.

pub mod charts;
mod enhanced;
pub mod format;
pub mod styles;
mod technical;

use crate::data::{IndicatorRecord, ReportDataset};
use crate::error::ReportError;
use chrono::NaiveDate;
use ods_indicator::ProjectionResult;
use ods_layout::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Technical,
    Enhanced,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [ReportKind::Technical, ReportKind::Enhanced];

    /// Title written to the PDF metadata.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Technical => "Relatório Técnico: ODS 12",
            ReportKind::Enhanced => "Relatório Técnico Aprimorado: ODS 12",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Technical => write!(f, "technical"),
            ReportKind::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Everything a report builder reads.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub dataset: &'a ReportDataset,
    pub record: &'a IndicatorRecord,
    pub analysis: &'a ProjectionResult,
    pub generated_on: NaiveDate,
}

impl ReportContext<'_> {
    /// Timestamp of the record, or a placeholder when the record has none.
    pub fn last_updated(&self) -> &str {
        self.record.last_updated.as_deref().unwrap_or("data não disponível")
    }
}

/// Builds the block structure of `kind`, drawing its figures along the way.
pub fn build_document(kind: ReportKind, ctx: &ReportContext) -> Result<Document, ReportError> {
    let document = match kind {
        ReportKind::Technical => technical::build(ctx)?,
        ReportKind::Enhanced => enhanced::build(ctx)?,
    };
    log::debug!("Built {} report with {} blocks", kind, document.blocks.len());
    Ok(document)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ReportContext;
    use crate::data::{IndicatorRecord, RecordData, ReportDataset};
    use chrono::NaiveDate;
    use ods_indicator::compute_projection;

    pub fn with_context(check: impl FnOnce(&ReportContext)) {
        let dataset = ReportDataset::default();
        let record = IndicatorRecord {
            last_updated: Some("2025-04-10T12:00:00Z".to_string()),
            data: RecordData { value: Some(6.2), ..Default::default() },
        };
        let analysis = compute_projection(&dataset.series().unwrap(), dataset.target).unwrap();
        let ctx = ReportContext {
            dataset: &dataset,
            record: &record,
            analysis: &analysis,
            generated_on: NaiveDate::from_ymd_opt(2025, 4, 14).unwrap(),
        };
        check(&ctx);
    }
}

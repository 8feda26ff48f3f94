#![allow(dead_code)]

pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use ods_report::{IndicatorRecord, ReportConfig, ReportKind, ReportPipeline, ReportPipelineBuilder};
use chrono::NaiveDate;
use std::path::Path;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const RECORD_JSON: &str = r#"{
  "ultimaAtualizacao": "2025-04-10T12:00:00Z",
  "dados": { "valor": 6.2 }
}"#;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text of a single page, numbered from 1.
    pub fn page_text(&self, page: u32) -> String {
        self.doc.extract_text(&[page]).unwrap_or_default()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A pipeline over the built-in dataset with a fixed generation date.
pub fn reference_pipeline() -> Result<ReportPipeline, Box<dyn std::error::Error>> {
    let record: IndicatorRecord = serde_json::from_str(RECORD_JSON)?;
    Ok(ReportPipelineBuilder::new()
        .with_record(record)
        .with_generation_date(NaiveDate::from_ymd_opt(2025, 4, 14).ok_or("invalid date")?)
        .build()?)
}

pub fn generate(kind: ReportKind) -> Result<GeneratedPdf, Box<dyn std::error::Error>> {
    let bytes = reference_pipeline()?.generate_bytes(kind)?;
    GeneratedPdf::from_bytes(bytes)
}

/// Configuration reading from and writing to `root`, with the record file in place.
pub fn config_in(root: &Path) -> Result<ReportConfig, Box<dyn std::error::Error>> {
    let data_dir = root.join("dados");
    std::fs::create_dir_all(&data_dir)?;
    std::fs::write(data_dir.join("residuos_reciclados.json"), RECORD_JSON)?;
    Ok(ReportConfig {
        data_dir,
        output_dir: root.join("docs").join("relatorios"),
        ..Default::default()
    })
}

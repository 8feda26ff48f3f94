use crate::config::ReportConfig;
use crate::data::{IndicatorRecord, ReportDataset};
use crate::error::ReportError;
use crate::report::{self, ReportContext, ReportKind, styles};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use ods_indicator::{ProjectionResult, compute_projection};
use ods_layout::{Document, LayoutEngine};
use ods_render_lopdf::{PdfRenderer, RenderOptions};
use ods_style::Stylesheet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A builder for creating a `ReportPipeline`.
///
/// Anything not supplied explicitly is loaded from the locations named by the
/// configuration when `build` is called.
#[derive(Default)]
pub struct ReportPipelineBuilder {
    config: Option<ReportConfig>,
    dataset: Option<ReportDataset>,
    record: Option<IndicatorRecord>,
    stylesheet: Option<Stylesheet>,
    generated_at: Option<NaiveDateTime>,
}

impl ReportPipelineBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `dataset` instead of the configured dataset file.
    pub fn with_dataset(mut self, dataset: ReportDataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Uses `record` instead of reading the configured record file.
    pub fn with_record(mut self, record: IndicatorRecord) -> Self {
        self.record = Some(record);
        self
    }

    /// Replaces the built-in stylesheet. A configured stylesheet file is still merged on top.
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    /// Pins the date printed in the reports and written to the PDF metadata.
    pub fn with_generation_date(mut self, date: NaiveDate) -> Self {
        self.generated_at = Some(date.and_time(NaiveTime::MIN));
        self
    }

    pub fn build(self) -> Result<ReportPipeline, ReportError> {
        let config = self.config.unwrap_or_default();

        let record = match self.record {
            Some(record) => record,
            None => IndicatorRecord::load(&config.record_path())?,
        };

        let dataset = match (self.dataset, &config.dataset_file) {
            (Some(dataset), _) => dataset,
            (None, Some(file)) => ReportDataset::load(file)?,
            (None, None) => {
                log::debug!("No dataset file configured, using the built-in reference data");
                ReportDataset::default()
            }
        };
        dataset.check_record(&record);

        let mut stylesheet = self.stylesheet.unwrap_or_else(styles::default_stylesheet);
        if let Some(path) = &config.stylesheet_file {
            stylesheet.merge(load_stylesheet(path)?);
        }
        stylesheet.validate()?;

        Ok(ReportPipeline {
            config,
            dataset,
            record,
            stylesheet,
            generated_at: self.generated_at.unwrap_or_else(|| Local::now().naive_local()),
        })
    }
}

fn load_stylesheet(path: &Path) -> Result<Stylesheet, ReportError> {
    let source = fs::read_to_string(path).map_err(|e| {
        ReportError::Io(io::Error::new(e.kind(), format!("Failed to read stylesheet from '{}': {}", path.display(), e)))
    })?;
    let stylesheet = Stylesheet::from_json(&source)?;
    log::info!("Loaded {} styles from {}", stylesheet.styles.len(), path.display());
    Ok(stylesheet)
}

/// Turns the loaded inputs into finished PDF reports.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    config: ReportConfig,
    dataset: ReportDataset,
    record: IndicatorRecord,
    stylesheet: Stylesheet,
    generated_at: NaiveDateTime,
}

impl ReportPipeline {
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn dataset(&self) -> &ReportDataset {
        &self.dataset
    }

    pub fn record(&self) -> &IndicatorRecord {
        &self.record
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    /// Computes the growth statistics and the path to the target.
    pub fn analyze(&self) -> Result<ProjectionResult, ReportError> {
        if self.dataset.history.is_empty() {
            return Err(ReportError::MissingData("the dataset has no historical observations".to_string()));
        }
        let series = self.dataset.series()?;
        let analysis = compute_projection(&series, self.dataset.target)?;
        log::info!(
            "Analyzed {} observations: {:.1}% in {}, {:.2} points per year needed to reach {:.1}% in {}",
            series.len(),
            analysis.current_value,
            analysis.last_observed_year,
            analysis.required_annual_increment,
            analysis.target.value,
            analysis.target.year
        );
        Ok(analysis)
    }

    pub fn build_document(&self, kind: ReportKind, analysis: &ProjectionResult) -> Result<Document, ReportError> {
        let ctx = ReportContext {
            dataset: &self.dataset,
            record: &self.record,
            analysis,
            generated_on: self.generated_at.date(),
        };
        report::build_document(kind, &ctx)
    }

    /// Generates one report entirely in memory.
    pub fn generate_bytes(&self, kind: ReportKind) -> Result<Vec<u8>, ReportError> {
        let analysis = self.analyze()?;
        self.render(kind, &analysis)
    }

    fn render(&self, kind: ReportKind, analysis: &ProjectionResult) -> Result<Vec<u8>, ReportError> {
        log::info!("Generating {} report", kind);
        let document = self.build_document(kind, analysis)?;
        let laid_out = LayoutEngine::new(&self.stylesheet).layout(&document)?;
        log::info!("Laid out {} report on {} pages", kind, laid_out.page_count());

        let options = RenderOptions {
            title: Some(kind.title().to_string()),
            author: Some(self.config.author.clone()),
            subject: Some(format!(
                "ODS 12: percentual de resíduos sólidos reciclados em {}",
                self.dataset.region
            )),
            creator: Some("ods-report".to_string()),
            creation_date: Some(self.generated_at),
        };
        let bytes = PdfRenderer::new(&self.stylesheet, options).render_to_bytes(&laid_out)?;
        log::debug!("Rendered {} report to {} bytes", kind, bytes.len());
        Ok(bytes)
    }

    /// Generates `kinds` and writes them to the configured output directory.
    ///
    /// Every report is rendered before the first file is written, so a failure
    /// leaves no output behind.
    pub fn generate_to_dir(&self, kinds: &[ReportKind]) -> Result<Vec<PathBuf>, ReportError> {
        let analysis = self.analyze()?;
        let rendered = kinds
            .iter()
            .map(|&kind| Ok((self.config.output_path(kind), self.render(kind, &analysis)?)))
            .collect::<Result<Vec<(PathBuf, Vec<u8>)>, ReportError>>()?;

        fs::create_dir_all(&self.config.output_dir).map_err(|e| {
            ReportError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create output directory '{}': {}", self.config.output_dir.display(), e),
            ))
        })?;

        rendered
            .into_iter()
            .map(|(path, bytes)| -> Result<PathBuf, ReportError> {
                fs::write(&path, &bytes).map_err(|e| {
                    ReportError::Io(io::Error::new(e.kind(), format!("Failed to write '{}': {}", path.display(), e)))
                })?;
                log::info!("Wrote {}", path.display());
                Ok(path)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RecordData;
    use ods_indicator::Observation;

    fn record() -> IndicatorRecord {
        IndicatorRecord {
            last_updated: Some("2025-04-10".to_string()),
            data: RecordData { value: Some(6.2), ..Default::default() },
        }
    }

    #[test]
    fn explicit_inputs_skip_file_loading() {
        let pipeline = ReportPipelineBuilder::new().with_record(record()).build().unwrap();
        let analysis = pipeline.analyze().unwrap();
        assert_eq!(analysis.years_remaining, 6);
        assert_eq!(pipeline.dataset().region, "Sergipe");
    }

    #[test]
    fn missing_record_file_fails_the_build() {
        let config = ReportConfig { data_dir: PathBuf::from("does/not/exist"), ..Default::default() };
        let err = ReportPipelineBuilder::new().with_config(config).build().unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
        assert!(err.to_string().contains("residuos_reciclados.json"));
    }

    #[test]
    fn invalid_history_is_reported_by_analyze() {
        let dataset = ReportDataset {
            history: vec![Observation::new(2017, 0.0), Observation::new(2024, 5.0)],
            ..Default::default()
        };
        let pipeline = ReportPipelineBuilder::new().with_record(record()).with_dataset(dataset).build().unwrap();
        assert!(matches!(pipeline.analyze(), Err(ReportError::InvalidInput(_))));
    }

    #[test]
    fn empty_history_is_missing_data() {
        let dataset = ReportDataset { history: Vec::new(), ..Default::default() };
        let pipeline = ReportPipelineBuilder::new().with_record(record()).with_dataset(dataset).build().unwrap();
        assert!(matches!(pipeline.analyze(), Err(ReportError::MissingData(_))));
    }

    #[test]
    fn generation_date_is_printed() {
        let pipeline = ReportPipelineBuilder::new()
            .with_record(record())
            .with_generation_date(NaiveDate::from_ymd_opt(2025, 4, 14).unwrap())
            .build()
            .unwrap();
        let analysis = pipeline.analyze().unwrap();
        let document = pipeline.build_document(ReportKind::Technical, &analysis).unwrap();
        let has_date = document.blocks.iter().any(|block| match block {
            ods_layout::Block::Paragraph(p) => p.runs.iter().any(|r| r.text.contains("Data: 14/04/2025")),
            _ => false,
        });
        assert!(has_date);
    }
}

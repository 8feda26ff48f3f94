mod common;

use common::{GeneratedPdf, TestResult, config_in, init_logging};
use ods_report::{Observation, ReportDataset, ReportError, ReportKind, ReportPipelineBuilder};
use std::fs;

#[test]
fn writes_both_reports_into_a_new_directory() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path())?;

    let pipeline = ReportPipelineBuilder::new().with_config(config.clone()).build()?;
    let written = pipeline.generate_to_dir(&ReportKind::ALL)?;

    assert_eq!(written.len(), 2);
    assert_eq!(written[0], config.output_dir.join("relatorio_tecnico_ods12.pdf"));
    assert_eq!(written[1], config.output_dir.join("relatorio_tecnico_aprimorado_ods12.pdf"));
    for path in &written {
        let pdf = GeneratedPdf::from_bytes(fs::read(path)?)?;
        assert!(pdf.page_count() > 3);
    }
    Ok(())
}

#[test]
fn invalid_series_writes_nothing() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path())?;
    let dataset = ReportDataset {
        history: vec![Observation::new(2017, 0.0), Observation::new(2024, 5.0)],
        ..Default::default()
    };

    let pipeline = ReportPipelineBuilder::new().with_config(config.clone()).with_dataset(dataset).build()?;
    let err = pipeline.generate_to_dir(&ReportKind::ALL).unwrap_err();

    assert!(matches!(err, ReportError::InvalidInput(_)));
    assert!(!config.output_dir.exists());
    Ok(())
}

#[test]
fn dataset_file_replaces_reference_data() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let mut config = config_in(dir.path())?;
    let dataset_path = dir.path().join("dataset.json");
    fs::write(
        &dataset_path,
        r#"{ "region": "Alagoas", "history": [ { "ano": 2020, "valor": 3.0 }, { "ano": 2024, "valor": 5.0 } ] }"#,
    )?;
    config.dataset_file = Some(dataset_path);

    let pipeline = ReportPipelineBuilder::new().with_config(config).build()?;
    let analysis = pipeline.analyze()?;
    assert_eq!(pipeline.dataset().region, "Alagoas");
    assert_eq!(analysis.initial_year, 2020);
    assert!((analysis.required_annual_increment - 10.0 / 6.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn stylesheet_file_overrides_named_styles() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let mut config = config_in(dir.path())?;
    let stylesheet_path = dir.path().join("estilos.json");
    fs::write(&stylesheet_path, r#"{ "styles": { "body": { "font_size": 11.0, "line_height": 13.0 } } }"#)?;
    config.stylesheet_file = Some(stylesheet_path);

    let pipeline = ReportPipelineBuilder::new().with_config(config).build()?;
    let body = pipeline.stylesheet().compute_style("body");
    assert_eq!(body.font_size, 11.0);
    assert!(pipeline.stylesheet().styles.contains_key("section"));
    Ok(())
}

#[test]
fn malformed_record_names_the_file() -> TestResult {
    init_logging();
    let dir = tempfile::tempdir()?;
    let config = config_in(dir.path())?;
    fs::write(config.record_path(), "{ \"dados\": ")?;

    let err = ReportPipelineBuilder::new().with_config(config).build().unwrap_err();
    assert!(matches!(err, ReportError::Json { .. }));
    assert!(err.to_string().contains("residuos_reciclados.json"));
    Ok(())
}

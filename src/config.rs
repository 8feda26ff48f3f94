use crate::report::ReportKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the optional configuration file, without extension.
pub const DEFAULT_CONFIG_NAME: &str = "config/default";

/// Where report inputs are read from and where the PDFs are written.
///
/// Loaded from an optional TOML file with `ODS_REPORT__*` environment
/// variables layered on top. Every field has a default, so running without
/// any configuration uses the repository layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    /// Indicator record, relative to `data_dir`.
    pub record_file: PathBuf,
    /// Optional dataset overriding the built-in reference data.
    pub dataset_file: Option<PathBuf>,
    /// Optional JSON stylesheet whose named styles replace the built-in ones.
    pub stylesheet_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub technical_file_name: String,
    pub enhanced_file_name: String,
    pub author: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            data_dir: PathBuf::from("dados"),
            record_file: PathBuf::from("residuos_reciclados.json"),
            dataset_file: None,
            stylesheet_file: None,
            output_dir: PathBuf::from("docs/relatorios"),
            technical_file_name: "relatorio_tecnico_ods12.pdf".to_string(),
            enhanced_file_name: "relatorio_tecnico_aprimorado_ods12.pdf".to_string(),
            author: "Laboratório de Indicadores para Monitoramento das Famílias Sergipanas (LIMFS)".to_string(),
        }
    }
}

impl ReportConfig {
    /// Loads `path`, or `config/default.toml` when present, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        builder = match path {
            Some(path) => builder.add_source(config::File::from(path)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        // Always layer environment variables on top
        builder = builder.add_source(config::Environment::with_prefix("ODS_REPORT").separator("__"));

        let config: ReportConfig = builder.build()?.try_deserialize()?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(&self.record_file)
    }

    pub fn output_path(&self, kind: ReportKind) -> PathBuf {
        let file_name = match kind {
            ReportKind::Technical => &self.technical_file_name,
            ReportKind::Enhanced => &self.enhanced_file_name,
        };
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_follow_repository_layout() {
        let config = ReportConfig::default();
        assert_eq!(config.record_path(), PathBuf::from("dados/residuos_reciclados.json"));
        assert_eq!(
            config.output_path(ReportKind::Enhanced),
            PathBuf::from("docs/relatorios/relatorio_tecnico_aprimorado_ods12.pdf")
        );
    }

    #[test]
    fn file_values_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "output_dir = \"out\"")?;
        writeln!(file, "technical_file_name = \"tecnico.pdf\"")?;
        file.flush()?;

        let config = ReportConfig::load(Some(file.path()))?;
        assert_eq!(config.output_path(ReportKind::Technical), PathBuf::from("out/tecnico.pdf"));
        assert_eq!(config.data_dir, PathBuf::from("dados"));
        Ok(())
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(ReportConfig::load(Some(Path::new("does/not/exist.toml"))).is_err());
    }
}

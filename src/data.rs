//! Report inputs: the published indicator record and the complementary dataset.

use crate::error::ReportError;
use ods_indicator::{InvalidInputError, Observation, Target, TimeSeries};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let source = fs::read_to_string(path).map_err(|e| {
        ReportError::Io(io::Error::new(e.kind(), format!("Failed to read '{}': {}", path.display(), e)))
    })?;
    serde_json::from_str(&source).map_err(|source| ReportError::Json { path: path.to_path_buf(), source })
}

/// The indicator file published by the data team.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRecord {
    #[serde(rename = "ultimaAtualizacao", default)]
    pub last_updated: Option<String>,
    #[serde(rename = "dados", default)]
    pub data: RecordData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordData {
    #[serde(rename = "valor", default)]
    pub value: Option<f64>,
    #[serde(rename = "ano", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "fonte", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl IndicatorRecord {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let record: IndicatorRecord = read_json(path)?;
        log::info!(
            "Loaded indicator record from {} (updated {})",
            path.display(),
            record.last_updated.as_deref().unwrap_or("unknown")
        );
        Ok(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    pub national_average: f64,
    pub best_state: f64,
}

/// A waste management program and its coverage among municipalities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub municipalities: u32,
    /// Share of all municipalities covered, in percent.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionShare {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalInitiatives {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAction {
    pub action: String,
    pub horizon: String,
    pub impact: String,
}

/// Everything the reports need besides the indicator record.
///
/// Every field defaults to the reference data for Sergipe, so a dataset file
/// only has to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDataset {
    pub region: String,
    pub municipality_count: u32,
    pub organization: String,
    /// Annual observations of the indicator, oldest first.
    pub history: Vec<Observation>,
    pub target: Target,
    pub benchmarks: Benchmarks,
    pub programs: Vec<Program>,
    pub waste_composition: Vec<CompositionShare>,
    pub municipal_initiatives: Vec<MunicipalInitiatives>,
    pub priority_actions: Vec<PriorityAction>,
    pub references: Vec<String>,
}

impl Default for ReportDataset {
    fn default() -> Self {
        let history = [2.1, 2.5, 3.2, 3.8, 4.3, 5.0, 5.7, 6.2]
            .iter()
            .zip(2017..)
            .map(|(&value, year)| Observation::new(year, value))
            .collect();
        let program = |name: &str, municipalities, percent| Program { name: name.to_string(), municipalities, percent };
        let share = |label: &str, percent| CompositionShare { label: label.to_string(), percent };
        let initiatives = |label: &str, count| MunicipalInitiatives { label: label.to_string(), count };
        let action = |action: &str, horizon: &str, impact: &str| PriorityAction {
            action: action.to_string(),
            horizon: horizon.to_string(),
            impact: impact.to_string(),
        };

        ReportDataset {
            region: "Sergipe".to_string(),
            municipality_count: 75,
            organization: "Laboratório de Indicadores para Monitoramento das Famílias Sergipanas (LIMFS)".to_string(),
            history,
            target: Target::new(2030, 15.0),
            benchmarks: Benchmarks { national_average: 4.0, best_state: 12.5 },
            programs: vec![
                program("Coleta Seletiva Municipal", 15, 20.0),
                program("Cooperativas de Reciclagem", 8, 10.7),
                program("Ecopontos de Coleta", 12, 16.0),
                program("Compostagem", 5, 6.7),
            ],
            waste_composition: vec![
                share("Plástico", 30.0),
                share("Papel/Papelão", 25.0),
                share("Vidro", 15.0),
                share("Metal", 20.0),
                share("Orgânicos", 5.0),
                share("Outros", 5.0),
            ],
            municipal_initiatives: vec![
                initiatives("Aracaju", 42),
                initiatives("Nossa Senhora do Socorro", 18),
                initiatives("São Cristóvão", 15),
                initiatives("Lagarto", 12),
                initiatives("Itabaiana", 10),
                initiatives("Outros", 38),
            ],
            priority_actions: vec![
                action("Ampliar coleta seletiva para todos os municípios", "Curto prazo (1-2 anos)", "Alto"),
                action("Programa de compostagem de resíduos orgânicos", "Médio prazo (2-3 anos)", "Alto"),
                action("Criar centros de reparo e reutilização", "Médio prazo (2-3 anos)", "Médio"),
                action("Implementar logística reversa abrangente", "Longo prazo (3-5 anos)", "Alto"),
                action("Campanha educativa sobre desperdício alimentar", "Curto prazo (1 ano)", "Médio"),
            ],
            references: vec![
                "Organização das Nações Unidas (ONU). Objetivos de Desenvolvimento Sustentável - ODS 12. \
                 Disponível em: https://brasil.un.org/pt-br/sdgs/12"
                    .to_string(),
                "ABRELPE. Panorama dos Resíduos Sólidos no Brasil 2024.".to_string(),
                "SEMARH/SE. Plano Estadual de Resíduos Sólidos de Sergipe, 2023.".to_string(),
                "IBGE. Pesquisa Nacional de Saneamento Básico, 2023.".to_string(),
                "Laboratório de Indicadores para Monitoramento das Famílias Sergipanas (LIMFS). \
                 Painel ODS 12 - Consumo e Produção Responsáveis, 2025."
                    .to_string(),
            ],
        }
    }
}

impl ReportDataset {
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let dataset: ReportDataset = read_json(path)?;
        log::info!("Loaded dataset from {} ({} observations)", path.display(), dataset.history.len());
        Ok(dataset)
    }

    /// The validated historical series.
    pub fn series(&self) -> Result<TimeSeries, InvalidInputError> {
        TimeSeries::new(self.history.clone())
    }

    pub fn program(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.name == name)
    }

    /// Logs a warning when the record disagrees with the last historical value.
    pub fn check_record(&self, record: &IndicatorRecord) {
        match (record.data.value, self.history.last()) {
            (Some(value), Some(last)) if (value - last.value).abs() > 1e-9 => log::warn!(
                "Indicator record reports {} but the history ends with {} in {}; using the history",
                value,
                last.value,
                last.year
            ),
            (None, _) => log::warn!("Indicator record has no value"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn record_uses_portuguese_keys() {
        let json = r#"{ "ultimaAtualizacao": "2025-04-10T12:00:00Z", "dados": { "valor": 6.2 } }"#;
        let record: IndicatorRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.last_updated.as_deref(), Some("2025-04-10T12:00:00Z"));
        assert_eq!(record.data.value, Some(6.2));
    }

    #[test]
    fn record_fields_are_optional() {
        let record: IndicatorRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, IndicatorRecord::default());
    }

    #[test]
    fn partial_dataset_keeps_reference_values() {
        let json = r#"{ "region": "Alagoas", "history": [ { "ano": 2020, "valor": 1.0 }, { "ano": 2021, "valor": 1.5 } ] }"#;
        let dataset: ReportDataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.region, "Alagoas");
        assert_eq!(dataset.series().unwrap().len(), 2);
        assert_eq!(dataset.target, Target::new(2030, 15.0));
        assert_eq!(dataset.programs.len(), 4);
    }

    #[test]
    fn default_dataset_matches_reference_series() {
        let dataset = ReportDataset::default();
        let series = dataset.series().unwrap();
        assert_eq!(series.first().map(|o| o.year), Some(2017));
        assert_eq!(series.last().map(|o| (o.year, o.value)), Some((2024, 6.2)));
        assert_eq!(dataset.program("Compostagem").map(|p| p.municipalities), Some(5));
    }

    #[test]
    fn malformed_json_names_the_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{{ not json")?;
        let err = IndicatorRecord::load(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::Json { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = IndicatorRecord::load(Path::new("nao/existe.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}

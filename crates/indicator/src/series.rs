use crate::error::InvalidInputError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One annual value of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(alias = "ano")]
    pub year: i32,
    #[serde(alias = "valor")]
    pub value: f64,
}

impl Observation {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

impl From<(i32, f64)> for Observation {
    fn from((year, value): (i32, f64)) -> Self {
        Self { year, value }
    }
}

/// The year and value the indicator is expected to reach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(alias = "ano")]
    pub year: i32,
    #[serde(alias = "valor")]
    pub value: f64,
}

impl Target {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Observations ordered by strictly increasing year.
///
/// The ordering and finiteness of values are checked on construction; the
/// minimum length is left to the consumers that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct TimeSeries {
    points: Vec<Observation>,
}

impl TimeSeries {
    pub fn new(points: Vec<Observation>) -> Result<Self, InvalidInputError> {
        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(InvalidInputError::NonFiniteValue { year: bad.year });
        }
        if let Some((previous, next)) = points
            .iter()
            .tuple_windows()
            .find(|(a, b)| b.year <= a.year)
        {
            return Err(InvalidInputError::UnorderedYears {
                previous: previous.year,
                next: next.year,
            });
        }
        Ok(Self { points })
    }

    /// Builds a series from consecutive years starting at `first_year`.
    pub fn from_values(first_year: i32, values: &[f64]) -> Result<Self, InvalidInputError> {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                i32::try_from(i)
                    .ok()
                    .and_then(|offset| first_year.checked_add(offset))
                    .map(|year| Observation::new(year, value))
                    .ok_or(InvalidInputError::YearOutOfRange { first_year, count: values.len() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(points)
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Value change between each pair of consecutive observations.
    pub fn annual_changes(&self) -> Vec<f64> {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| b.value - a.value)
            .collect()
    }

    /// True when no observation is lower than the one before it.
    pub fn is_non_decreasing(&self) -> bool {
        self.points.iter().tuple_windows().all(|(a, b)| b.value >= a.value)
    }
}

impl TryFrom<Vec<Observation>> for TimeSeries {
    type Error = InvalidInputError;

    fn try_from(points: Vec<Observation>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TimeSeries> for Vec<Observation> {
    fn from(series: TimeSeries) -> Self {
        series.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_and_decreasing_years() {
        let dup = TimeSeries::new(vec![Observation::new(2017, 1.0), Observation::new(2017, 2.0)]);
        assert_eq!(
            dup,
            Err(InvalidInputError::UnorderedYears { previous: 2017, next: 2017 })
        );
        let back = TimeSeries::new(vec![Observation::new(2018, 1.0), Observation::new(2016, 2.0)]);
        assert!(matches!(back, Err(InvalidInputError::UnorderedYears { .. })));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = TimeSeries::from_values(2020, &[1.0, f64::NAN]).unwrap_err();
        assert_eq!(err, InvalidInputError::NonFiniteValue { year: 2021 });
    }

    #[test]
    fn annual_changes_and_trend() {
        let series = TimeSeries::from_values(2020, &[1.0, 1.5, 1.25]).unwrap();
        assert_eq!(series.annual_changes(), vec![0.5, -0.25]);
        assert!(!series.is_non_decreasing());
    }

    #[test]
    fn consecutive_years_must_fit_in_range() {
        let err = TimeSeries::from_values(i32::MAX - 1, &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, InvalidInputError::YearOutOfRange { first_year: i32::MAX - 1, count: 3 });

        let series = TimeSeries::from_values(i32::MAX - 1, &[1.0, 2.0]).unwrap();
        assert_eq!(series.last(), Some(&Observation::new(i32::MAX, 2.0)));
    }

    #[test]
    fn deserializes_portuguese_field_names() {
        let json = r#"[{"ano": 2023, "valor": 5.7}, {"year": 2024, "value": 6.2}]"#;
        let series: TimeSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last(), Some(&Observation::new(2024, 6.2)));
    }

    #[test]
    fn deserialization_validates_order() {
        let json = r#"[{"year": 2024, "value": 1.0}, {"year": 2023, "value": 2.0}]"#;
        assert!(serde_json::from_str::<TimeSeries>(json).is_err());
    }
}

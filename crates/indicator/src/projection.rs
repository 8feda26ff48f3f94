use crate::error::InvalidInputError;
use crate::series::{Observation, Target, TimeSeries};
use serde::Serialize;

/// Longest projection horizon, in years, that is materialized as a path.
pub const MAX_HORIZON_YEARS: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// No observation is below the one before it.
    Increasing,
    Variable,
}

/// Statistics of an observed series and the linear path required to reach a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub initial_year: i32,
    pub initial_value: f64,
    pub last_observed_year: i32,
    pub current_value: f64,
    /// Change between the first and last observation, in percent.
    pub percent_change: f64,
    /// Compound annual growth rate over `n - 1` periods, in percent.
    pub compound_annual_growth_rate: f64,
    pub target: Target,
    pub gap: f64,
    pub years_remaining: i32,
    pub required_annual_increment: f64,
    /// One entry per year after the last observation, ending at the target year.
    pub projected_path: Vec<Observation>,
    pub trend: Trend,
    pub latest_annual_change: f64,
    /// Average yearly change over the observed period.
    pub average_annual_increment: f64,
    /// Value the target year would reach if the historical average pace continued.
    pub historical_pace_estimate: f64,
}

impl ProjectionResult {
    /// The last observation followed by the projected path.
    pub fn path_from_last_observation(&self) -> Vec<Observation> {
        std::iter::once(Observation::new(self.last_observed_year, self.current_value))
            .chain(self.projected_path.iter().copied())
            .collect()
    }

    /// Whether the historical pace alone would reach the target.
    pub fn on_track(&self) -> bool {
        self.historical_pace_estimate >= self.target.value
    }

    /// Ratio between the required yearly increment and the historical one.
    pub fn required_pace_ratio(&self) -> Option<f64> {
        (self.average_annual_increment > 0.0)
            .then(|| self.required_annual_increment / self.average_annual_increment)
    }
}

/// Computes growth statistics for `series` and the constant yearly increment
/// that takes its last value to `target`.
///
/// Preconditions are checked in order: at least two observations, a positive
/// first value, a non-negative last value, a target year after the last
/// observation, a finite target value and a horizon of at most
/// [`MAX_HORIZON_YEARS`].
pub fn compute_projection(
    series: &TimeSeries,
    target: Target,
) -> Result<ProjectionResult, InvalidInputError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (*first, *last),
        _ => return Err(InvalidInputError::InsufficientPoints { found: series.len() }),
    };

    if first.value <= 0.0 {
        return Err(InvalidInputError::NonPositiveInitialValue { value: first.value });
    }
    if last.value < 0.0 {
        return Err(InvalidInputError::NegativeFinalValue { value: last.value });
    }
    if target.year <= last.year {
        return Err(InvalidInputError::NonPositiveHorizon {
            target_year: target.year,
            last_year: last.year,
        });
    }
    if !target.value.is_finite() {
        return Err(InvalidInputError::NonFiniteValue { year: target.year });
    }
    let horizon = i64::from(target.year) - i64::from(last.year);
    if horizon > MAX_HORIZON_YEARS {
        return Err(InvalidInputError::HorizonTooLong {
            target_year: target.year,
            years: horizon,
            max: MAX_HORIZON_YEARS,
        });
    }
    // Bounded above, so the narrowing is exact.
    let years_remaining = horizon as i32;

    let periods = (series.len() - 1) as f64;
    let percent_change = (last.value - first.value) / first.value * 100.0;
    let compound_annual_growth_rate = ((last.value / first.value).powf(1.0 / periods) - 1.0) * 100.0;

    let gap = target.value - last.value;
    let required_annual_increment = gap / years_remaining as f64;

    let projected_path = (1..=years_remaining)
        .map(|i| Observation::new(last.year + i, last.value + required_annual_increment * i as f64))
        .collect();

    let average_annual_increment = (last.value - first.value) / (i64::from(last.year) - i64::from(first.year)) as f64;
    let latest_annual_change = series.annual_changes().last().copied().unwrap_or(0.0);
    let trend = if series.is_non_decreasing() {
        Trend::Increasing
    } else {
        Trend::Variable
    };

    Ok(ProjectionResult {
        initial_year: first.year,
        initial_value: first.value,
        last_observed_year: last.year,
        current_value: last.value,
        percent_change,
        compound_annual_growth_rate,
        target,
        gap,
        years_remaining,
        required_annual_increment,
        projected_path,
        trend,
        latest_annual_change,
        average_annual_increment,
        historical_pace_estimate: last.value + average_annual_increment * years_remaining as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn sergipe_series() -> TimeSeries {
        TimeSeries::from_values(2017, &[2.1, 2.5, 3.2, 3.8, 4.3, 5.0, 5.7, 6.2]).unwrap()
    }

    #[test]
    fn concrete_scenario() {
        let result = compute_projection(&sergipe_series(), Target::new(2030, 15.0)).unwrap();

        assert!(approx_eq(result.percent_change, 195.238_095, 1e-4));
        assert!(approx_eq(result.gap, 8.8, 1e-4));
        assert_eq!(result.years_remaining, 6);
        assert!(approx_eq(result.required_annual_increment, 1.466_667, 1e-4));
        assert_eq!(result.projected_path[0].year, 2025);
        assert!(approx_eq(result.projected_path[0].value, 7.666_667, 1e-4));
        assert_eq!(result.initial_value, 2.1);
        assert_eq!(result.current_value, 6.2);
    }

    #[test]
    fn compound_growth_rate_uses_n_minus_one_periods() {
        let result = compute_projection(&sergipe_series(), Target::new(2030, 15.0)).unwrap();
        let expected = ((6.2f64 / 2.1).powf(1.0 / 7.0) - 1.0) * 100.0;
        assert!(approx_eq(result.compound_annual_growth_rate, expected, TOL));
        assert!(approx_eq(result.compound_annual_growth_rate, 16.72, 0.01));
    }

    #[test]
    fn path_lands_on_target() {
        let target = Target::new(2030, 15.0);
        let result = compute_projection(&sergipe_series(), target).unwrap();
        let last = result.projected_path.last().unwrap();
        assert_eq!(last.year, target.year);
        assert!(approx_eq(last.value, target.value, TOL));
        assert_eq!(result.projected_path.len(), 6);
    }

    #[test]
    fn path_has_constant_step() {
        let result = compute_projection(&sergipe_series(), Target::new(2030, 15.0)).unwrap();
        let path = result.path_from_last_observation();
        for pair in path.windows(2) {
            assert_eq!(pair[1].year - pair[0].year, 1);
            assert!(approx_eq(pair[1].value - pair[0].value, result.required_annual_increment, TOL));
        }
    }

    #[test]
    fn single_step_horizon() {
        let target = Target::new(2025, 7.0);
        let result = compute_projection(&sergipe_series(), target).unwrap();
        assert_eq!(result.projected_path.len(), 1);
        assert_eq!(result.projected_path[0].year, 2025);
        assert!(approx_eq(result.projected_path[0].value, 7.0, TOL));
    }

    #[test]
    fn deterministic() {
        let series = sergipe_series();
        let a = compute_projection(&series, Target::new(2030, 15.0)).unwrap();
        let b = compute_projection(&series, Target::new(2030, 15.0)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.compound_annual_growth_rate.to_bits(), b.compound_annual_growth_rate.to_bits());
    }

    #[test]
    fn rejects_single_point() {
        let series = TimeSeries::from_values(2024, &[6.2]).unwrap();
        let err = compute_projection(&series, Target::new(2030, 15.0)).unwrap_err();
        assert_eq!(err, InvalidInputError::InsufficientPoints { found: 1 });
    }

    #[test]
    fn rejects_empty_series() {
        let series = TimeSeries::new(vec![]).unwrap();
        let err = compute_projection(&series, Target::new(2030, 15.0)).unwrap_err();
        assert_eq!(err, InvalidInputError::InsufficientPoints { found: 0 });
    }

    #[test]
    fn rejects_zero_initial_value() {
        let series = TimeSeries::new(vec![Observation::new(2017, 0.0), Observation::new(2024, 5.0)]).unwrap();
        let err = compute_projection(&series, Target::new(2030, 15.0)).unwrap_err();
        assert_eq!(err, InvalidInputError::NonPositiveInitialValue { value: 0.0 });
    }

    #[test]
    fn rejects_negative_values() {
        let negative_start = TimeSeries::from_values(2020, &[-1.0, 2.0]).unwrap();
        assert!(matches!(
            compute_projection(&negative_start, Target::new(2030, 15.0)),
            Err(InvalidInputError::NonPositiveInitialValue { .. })
        ));

        let negative_end = TimeSeries::from_values(2020, &[1.0, -2.0]).unwrap();
        assert!(matches!(
            compute_projection(&negative_end, Target::new(2030, 15.0)),
            Err(InvalidInputError::NegativeFinalValue { .. })
        ));
    }

    #[test]
    fn rejects_target_not_after_last_year() {
        for year in [2023, 2024] {
            let err = compute_projection(&sergipe_series(), Target::new(year, 15.0)).unwrap_err();
            assert_eq!(
                err,
                InvalidInputError::NonPositiveHorizon { target_year: year, last_year: 2024 }
            );
        }
    }

    #[test]
    fn rejects_horizon_beyond_limit() {
        let series = TimeSeries::new(vec![Observation::new(-10, 1.0), Observation::new(-5, 2.0)]).unwrap();
        let err = compute_projection(&series, Target::new(i32::MAX, 15.0)).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::HorizonTooLong {
                target_year: i32::MAX,
                years: i64::from(i32::MAX) + 5,
                max: MAX_HORIZON_YEARS,
            }
        );

        let err = compute_projection(&sergipe_series(), Target::new(2_000_000_000, 15.0)).unwrap_err();
        assert!(matches!(err, InvalidInputError::HorizonTooLong { .. }));
    }

    #[test]
    fn horizon_at_limit_is_projected() {
        let target = Target::new(2024 + MAX_HORIZON_YEARS as i32, 15.0);
        let result = compute_projection(&sergipe_series(), target).unwrap();
        assert_eq!(result.projected_path.len(), MAX_HORIZON_YEARS as usize);
        assert_eq!(result.projected_path.last().map(|o| o.year), Some(target.year));
    }

    #[test]
    fn observed_span_wider_than_i32_is_handled() {
        let series = TimeSeries::new(vec![Observation::new(i32::MIN, 1.0), Observation::new(10, 2.0)]).unwrap();
        let result = compute_projection(&series, Target::new(12, 15.0)).unwrap();
        let span = i64::from(10) - i64::from(i32::MIN);
        assert!(approx_eq(result.average_annual_increment, 1.0 / span as f64, 1e-15));
        assert_eq!(result.years_remaining, 2);
        assert_eq!(result.projected_path.len(), 2);
    }

    #[test]
    fn rejects_non_finite_target() {
        let err = compute_projection(&sergipe_series(), Target::new(2030, f64::INFINITY)).unwrap_err();
        assert!(matches!(err, InvalidInputError::NonFiniteValue { year: 2030 }));
    }

    #[test]
    fn historical_pace_and_trend() {
        let result = compute_projection(&sergipe_series(), Target::new(2030, 15.0)).unwrap();
        assert_eq!(result.trend, Trend::Increasing);
        assert!(approx_eq(result.average_annual_increment, 4.1 / 7.0, TOL));
        assert!(approx_eq(result.latest_annual_change, 0.5, 1e-12));
        assert!(approx_eq(result.historical_pace_estimate, 6.2 + 6.0 * 4.1 / 7.0, TOL));
        assert!(!result.on_track());
        let ratio = result.required_pace_ratio().unwrap();
        assert!(approx_eq(ratio, 1.466_666_7 / (4.1 / 7.0), 1e-4));
    }

    #[test]
    fn falling_series_is_variable_and_has_no_pace_ratio() {
        let series = TimeSeries::from_values(2020, &[5.0, 4.0, 3.0]).unwrap();
        let result = compute_projection(&series, Target::new(2025, 1.0)).unwrap();
        assert_eq!(result.trend, Trend::Variable);
        assert!(result.gap < 0.0);
        assert!(result.required_pace_ratio().is_none());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let series = sergipe_series();
        let before = series.clone();
        let _ = compute_projection(&series, Target::new(2030, 15.0)).unwrap();
        assert_eq!(series, before);
    }
}

use thiserror::Error;

/// Input rejected by the series constructor or by the projector.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidInputError {
    #[error("insufficient data points: at least 2 observations are required, found {found}")]
    InsufficientPoints { found: usize },

    #[error("initial value must be positive to compute growth rates, got {value}")]
    NonPositiveInitialValue { value: f64 },

    #[error("final value must not be negative to compute a compound growth rate, got {value}")]
    NegativeFinalValue { value: f64 },

    #[error("target year {target_year} leaves no horizon after the last observation in {last_year}")]
    NonPositiveHorizon { target_year: i32, last_year: i32 },

    #[error("target year {target_year} is {years} years after the last observation, the limit is {max}")]
    HorizonTooLong { target_year: i32, years: i64, max: i64 },

    #[error("{count} consecutive years starting at {first_year} do not fit in the supported year range")]
    YearOutOfRange { first_year: i32, count: usize },

    #[error("years must be strictly increasing, found {next} after {previous}")]
    UnorderedYears { previous: i32, next: i32 },

    #[error("value for {year} is not a finite number")]
    NonFiniteValue { year: i32 },
}

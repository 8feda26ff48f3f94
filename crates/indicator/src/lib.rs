//! Annual indicator series and the projection towards a target value.
//!
//! [`compute_projection`] is a pure function: it reads a validated
//! [`TimeSeries`] and a [`Target`] and returns a [`ProjectionResult`] with
//! descriptive statistics plus the constant yearly increment needed to reach
//! the target.

mod error;
mod projection;
mod series;

pub use error::InvalidInputError;
pub use projection::{MAX_HORIZON_YEARS, ProjectionResult, Trend, compute_projection};
pub use series::{Observation, Target, TimeSeries};


//! Subsystems for doing basic calculus on expressions: derivatives,
//! repeated derivatives, and truncated power series.

mod derivative;
pub mod series;

pub use derivative::{DerivativeEngine, DifferentiationFailure, DifferentiationError, differentiate, nth_derivative, nth_derivatives};
pub use series::{PowerSeries, SeriesEngine, taylor_series};


// The #[non_exhaustive] attribute applies at the crate-level, and I
// want module-level restrictions, which are far stricter.
#![allow(clippy::manual_non_exhaustive)]

pub mod error;
pub mod expr;
pub mod pade;
pub mod poly;
pub mod sampling;
pub mod taylor;
pub mod util;

pub use error::Error;
pub use pade::{PadeApproximation, PadeEngine};
pub use poly::Polynomial;
pub use sampling::Approximant;
pub use taylor::{CoefficientMethod, TaylorApproximation, TaylorEngine};

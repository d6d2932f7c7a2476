//! Coefficients for pseudo-boolean polynomials.
//!
//! - [`Number`]: exact rational or `f64`, promoted to float on mixing
//! - [`Symbolic`]: sparse polynomial in named parameters (penalty weights etc.)
//! - [`Coefficient`]: either of the above, collapsed to a number when possible

pub mod coefficient;
pub mod error;
pub mod number;
pub mod symbolic;

pub use coefficient::Coefficient;
pub use error::CoeffError;
pub use number::Number;
pub use symbolic::{ParamMonomial, Symbolic};

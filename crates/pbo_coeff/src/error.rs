//! Error types for pbo_coeff crate.

use thiserror::Error;

/// Errors raised by coefficient arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoeffError {
    /// Division (true or floor) by an exact or floating zero
    #[error("division by zero")]
    DivisionByZero,

    /// Divisor still carries free parameters
    #[error("cannot divide by symbolic value '{0}'")]
    SymbolicDivisor(String),

    /// A number was required but parameters remain unresolved
    #[error("coefficient depends on unresolved parameters: {}", .0.join(", "))]
    Unresolved(Vec<String>),
}

//! Pseudo-boolean and Ising polynomial engine.
//!
//! Polynomials over binary ({0, 1}) or spin ({1, -1}) variables with exact or
//! symbolic coefficients, exact conversion between the two domains, degree
//! reduction with ancilla variables, penalty-encoded constraints and a
//! brute-force reference solver.

pub mod ancilla;
pub mod bits;
pub mod bruteforce;
pub mod convert;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod label;
pub mod macros;
pub mod matrix;
pub mod model;
pub mod polynomial;
pub mod quadratic;
pub mod reduce;
pub mod sat;
pub mod term;
pub mod var_index;
pub mod wire;

pub use pbo_coeff;
pub use pbo_coeff::{CoeffError, Coefficient, Number};

pub use ancilla::{AncillaOrigin, AncillaTable};
pub use bruteforce::{
    solve_hising_bruteforce, solve_ising_bruteforce, solve_pubo_bruteforce, solve_qubo_bruteforce,
    MAX_BRUTEFORCE_VARIABLES,
};
pub use convert::{hising_to_pubo, ising_to_qubo, pubo_to_hising, qubo_to_ising};
pub use diagnostics::{Diagnostic, Diagnostics, Satisfiability};
pub use domain::{Binary, Domain, DomainKind, Spin};
pub use error::{PbError, Result};
pub use label::{Label, Variable};
pub use model::{Constraint, ConstraintKind, ConstraintOptions, Hoio, Model, Pcbo};
pub use polynomial::{Assignment, HIsing, Polynomial, Pubo};
pub use quadratic::{Ising, Quadratic, Qubo, QUADRATIC_DEGREE};
pub use reduce::ReductionWeight;
pub use term::Term;
pub use var_index::VariableIndex;

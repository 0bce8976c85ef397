//! # First order ODE solver
//! Solves `dy/dx = f(x, y)` symbolically when the right-hand side belongs to one of three
//! families, tried in this order:
//! 1) direct: `f` does not depend on `y`, so `y = ∫f dx + C`
//! 2) separable: `f = g(x) * h(y)`, so `∫ 1/h(y) dy = ∫ g(x) dx + C`
//! 3) linear: `f = A(x) * y + B(x)`, solved with the integrating factor `μ = exp(-∫A dx)`
//!
//! Everything else is reported as unsupported (a status, not an error).
//!
//! Example#
//! ```
//! use RustedODE::ode_solver::solve_api::{solve, Status};
//! let result = solve("dy/dx = x*y");
//! assert_eq!(result.status, Status::Ok);
//! assert_eq!(result.final_solution_text.unwrap(), "y(x) = C * exp(x^2 / 2)");
//! for step in result.steps.iter() {
//!     println!("{}", step);
//! }
//! ```
/// classification of the right-hand side into direct/separable/linear/unsupported
pub mod classifier;
/// task document -> solve -> trajectory -> csv
pub mod ode_task;
/// errors of the solving pipeline
pub mod solver_errors;
/// `solve(text)` entry point and the result record handed to the presentation layer
pub mod solve_api;
/// derivation trail records
pub mod steps;
/// the three solving strategies
pub mod strategies;

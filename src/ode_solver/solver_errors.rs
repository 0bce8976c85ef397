use crate::symbolic::symbolic_errors::{IntegrationError, ParseError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// malformed equation text
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),
    /// an antiderivative the chosen strategy cannot do without
    #[error("not solvable with current rules: {0}")]
    Integration(#[from] IntegrationError),
    #[error("not solvable with current rules: {what}")]
    NotIntegrable { what: String },
    /// a variable-free part of the right-hand side such as `1 / 0` or `ln(0)`
    #[error("undefined constant in the right-hand side: {0}")]
    UndefinedConstant(String),
}

impl SolveError {
    pub fn not_integrable(what: &str) -> Self {
        SolveError::NotIntegrable {
            what: what.to_string(),
        }
    }
}

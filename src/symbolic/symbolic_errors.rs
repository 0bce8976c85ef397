//! Error types of the symbolic layer.
//!
//! `ParseError` covers everything that can go wrong while turning a string into an `Expr`
//! (the "syntax error" family), `IntegrationError` is returned by `Expr::integrate` when
//! no rule of the rule set matches. Neither of them is ever a panic.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidCharacter { ch: char, pos: usize },
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("mismatched parentheses")]
    MismatchedParentheses,
    #[error("operator '{0}' is missing an operand")]
    MissingOperand(String),
    #[error("function '{0}' expects exactly one argument in parentheses")]
    FunctionArity(String),
    #[error("input does not reduce to a single expression")]
    NotSingleExpression,
    #[error("expression is nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("equation must contain exactly one '='")]
    MissingEquals,
    #[error("left-hand side must be dy/dx, found '{0}'")]
    BadLeftHandSide(String),
}

/// No rule of the integration rule set matched `expr`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot integrate {expr} with respect to {var}")]
pub struct IntegrationError {
    pub expr: String,
    pub var: String,
}

impl IntegrationError {
    pub fn new(expr: &impl std::fmt::Display, var: &str) -> Self {
        IntegrationError {
            expr: expr.to_string(),
            var: var.to_string(),
        }
    }
}

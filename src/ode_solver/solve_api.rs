//! `solve(text)`: the single entry point of the solver. Takes the equation as typed by the user
//! (`dy/dx = ...`) and returns a record the presentation layer can display without any
//! symbolic knowledge: status, classification, derivation trail, final solution text and the
//! right-hand side to build a numeric evaluator from.
use crate::ode_solver::classifier::{Classification, classify};
use crate::ode_solver::solver_errors::SolveError;
use crate::ode_solver::steps::{Derivation, SolutionForm, Step};
use crate::ode_solver::strategies::{solve_direct, solve_linear, solve_separable};
use crate::symbolic::parse_expr::parse_expression;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::ParseError;
use log::{info, warn};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Ok,
    /// well formed, but not direct, separable or linear
    Unsupported,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: Status,
    pub classification: Option<Classification>,
    /// `dy/dx = <simplified right-hand side>`
    pub normalized_equation: Option<String>,
    pub steps: Vec<Step>,
    pub final_solution_text: Option<String>,
    /// right-hand side of `y(x) = ...`, explicit solutions only
    pub solution: Option<Expr>,
    pub form: Option<SolutionForm>,
    pub rhs: Option<Expr>,
    pub message: Option<String>,
}

impl SolveResult {
    fn error(message: String) -> SolveResult {
        SolveResult {
            status: Status::Error,
            classification: None,
            normalized_equation: None,
            steps: Vec::new(),
            final_solution_text: None,
            solution: None,
            form: None,
            rhs: None,
            message: Some(message),
        }
    }
}

/// Successful run of the pipeline; `derivation` is None for unsupported equations.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeSolution {
    pub rhs: Expr,
    pub classification: Classification,
    pub derivation: Option<Derivation>,
}

/// Splits `dy/dx = rhs` and parses the right-hand side. The left side must be `dy/dx`,
/// ignoring case and whitespace.
pub fn parse_equation(text: &str) -> Result<Expr, ParseError> {
    let mut parts = text.split('=');
    let (lhs, rhs) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lhs), Some(rhs), None) => (lhs, rhs),
        _ => return Err(ParseError::MissingEquals),
    };
    let normalized: String = lhs
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if normalized != "dy/dx" {
        return Err(ParseError::BadLeftHandSide(lhs.trim().to_string()));
    }
    parse_expression(rhs)
}

/// Parses, classifies and solves. Unsupported equations are `Ok` with no derivation.
/// A right-hand side with an undefined constant part is an error, no closed form is built
/// from it.
pub fn solve_equation(text: &str) -> Result<OdeSolution, SolveError> {
    let rhs = parse_equation(text)?;
    if let Some(undefined) = rhs.undefined_constant() {
        return Err(SolveError::UndefinedConstant(undefined.to_string()));
    }
    let classification = classify(&rhs);
    let derivation = match &classification {
        Classification::Direct(f) => Some(solve_direct(f)?),
        Classification::Separable {
            x_part,
            y_part,
            y_reciprocal,
        } => Some(solve_separable(x_part, y_part, y_reciprocal)?),
        Classification::Linear { a, b } => Some(solve_linear(a, b)?),
        Classification::Unsupported => None,
    };
    Ok(OdeSolution {
        rhs,
        classification,
        derivation,
    })
}

/// Never panics: every failure is reported through `status` and `message`.
pub fn solve(text: &str) -> SolveResult {
    info!("solving {}", text.trim());
    let solution = match solve_equation(text) {
        Ok(solution) => solution,
        Err(e) => {
            warn!("{}", e);
            return SolveResult::error(e.to_string());
        }
    };
    let normalized_equation = Some(format!("dy/dx = {}", solution.rhs));
    match solution.derivation {
        Some(derivation) => SolveResult {
            status: Status::Ok,
            classification: Some(solution.classification),
            normalized_equation,
            steps: derivation.steps,
            final_solution_text: Some(derivation.final_text),
            solution: derivation.solution,
            form: Some(derivation.form),
            rhs: Some(solution.rhs),
            message: None,
        },
        None => SolveResult {
            status: Status::Unsupported,
            classification: Some(solution.classification),
            normalized_equation,
            steps: Vec::new(),
            final_solution_text: None,
            solution: None,
            form: None,
            rhs: Some(solution.rhs),
            message: Some(
                "the equation is not direct, separable or linear in y".to_string(),
            ),
        },
    }
}

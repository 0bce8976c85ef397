use std::fmt;

use strum_macros::Display;

/// One record of the derivation trail. The equation fragment is always the rendered text of
/// the expressions involved; wording and layout belong to whoever displays it.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    pub description: String,
    pub equation: Option<String>,
}

impl Step {
    pub fn new(title: &str, description: &str, equation: Option<String>) -> Step {
        Step {
            title: title.to_string(),
            description: description.to_string(),
            equation,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)?;
        if let Some(equation) = &self.equation {
            write!(f, "\n    {}", equation)?;
        }
        Ok(())
    }
}

/// whether the final solution is solved for y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SolutionForm {
    Explicit,
    Implicit,
}

/// Output of a successful strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub steps: Vec<Step>,
    pub final_text: String,
    /// right-hand side of `y(x) = ...` when the solution is explicit
    pub solution: Option<crate::symbolic::symbolic_engine::Expr>,
    pub form: SolutionForm,
}

//! The three solving strategies. Each one produces the derivation trail in the order a human
//! would write it down: identify the structure, rewrite into the canonical form, set up the
//! integrals, evaluate them, solve for y.
use crate::ode_solver::solver_errors::SolveError;
use crate::ode_solver::steps::{Derivation, SolutionForm, Step};
use crate::symbolic::symbolic_engine::{DEPENDENT_VAR, Expr, INDEPENDENT_VAR, INTEGRATION_CONST};
use log::{info, warn};

fn c() -> Expr {
    Expr::var(INTEGRATION_CONST)
}

/// `dy/dx = f(x)`: `y = ∫f dx + C`
pub fn solve_direct(rhs: &Expr) -> Result<Derivation, SolveError> {
    let mut steps = vec![Step::new(
        "Identify the equation type",
        "The right-hand side does not depend on y, so y is found by direct integration.",
        Some(format!("dy/dx = {}", rhs)),
    )];
    steps.push(Step::new(
        "Integrate both sides",
        "Integrate the right-hand side with respect to x.",
        Some(format!("y = ∫({}) dx", rhs)),
    ));
    let antiderivative = rhs.integrate(INDEPENDENT_VAR).map_err(|_| {
        SolveError::not_integrable("right-hand side not integrable by the supported rule set")
    })?;
    steps.push(Step::new(
        "Evaluate the integral",
        "Apply the integration rules term by term.",
        Some(format!("∫({}) dx = {}", rhs, antiderivative)),
    ));
    let solution = (antiderivative + c()).simplify();
    let final_text = format!("y(x) = {}", solution);
    steps.push(Step::new(
        "General solution",
        "Add the constant of integration C.",
        Some(final_text.clone()),
    ));
    info!("direct solution: {}", final_text);
    Ok(Derivation {
        steps,
        final_text,
        solution: Some(solution),
        form: SolutionForm::Explicit,
    })
}

/// `dy/dx = g(x) * h(y)`: `∫ 1/h(y) dy = ∫ g(x) dx + C`
pub fn solve_separable(
    x_part: &Expr,
    y_part: &Expr,
    y_reciprocal: &Expr,
) -> Result<Derivation, SolveError> {
    let mut steps = vec![Step::new(
        "Identify the equation type",
        "The right-hand side factors into a function of x times a function of y, so the variables separate.",
        Some(format!("dy/dx = ({}) * ({})", x_part, y_part)),
    )];
    steps.push(Step::new(
        "Separate the variables",
        "Divide both sides by the y factor and multiply by dx.",
        Some(format!("({}) dy = ({}) dx", y_reciprocal, x_part)),
    ));
    steps.push(Step::new(
        "Integrate both sides",
        "Integrate the left side with respect to y and the right side with respect to x.",
        Some(format!("∫({}) dy = ∫({}) dx", y_reciprocal, x_part)),
    ));
    let left = y_reciprocal.integrate(DEPENDENT_VAR)?;
    let right = x_part.integrate(INDEPENDENT_VAR)?;
    let implicit_text = format!("{} = {}", left, (right.clone() + c()).simplify());
    steps.push(Step::new(
        "Evaluate the integrals",
        "Both antiderivatives are known; collect the constants into C.",
        Some(implicit_text.clone()),
    ));
    let log_abs_y = Expr::var(DEPENDENT_VAR).abs().ln();
    if left == log_abs_y {
        let solution = (c() * right.exp()).simplify();
        let final_text = format!("y(x) = {}", solution);
        steps.push(Step::new(
            "Solve for y",
            "Exponentiate both sides; the sign and exp(C) are absorbed into the constant C.",
            Some(final_text.clone()),
        ));
        info!("separable solution: {}", final_text);
        return Ok(Derivation {
            steps,
            final_text,
            solution: Some(solution),
            form: SolutionForm::Explicit,
        });
    }
    steps.push(Step::new(
        "Implicit solution",
        "The relation between x and y is left in implicit form.",
        Some(implicit_text.clone()),
    ));
    info!("separable implicit solution: {}", implicit_text);
    Ok(Derivation {
        steps,
        final_text: implicit_text,
        solution: None,
        form: SolutionForm::Implicit,
    })
}

/// `dy/dx = A(x) * y + B(x)`, i.e. `dy/dx + P(x) * y = Q(x)` with `P = -A` and `Q = B`
pub fn solve_linear(a: &Expr, b: &Expr) -> Result<Derivation, SolveError> {
    let y = Expr::var(DEPENDENT_VAR);
    let canonical = (a.clone() * y.clone() + b.clone()).simplify();
    let mut steps = vec![Step::new(
        "Identify the equation type",
        "Every term is either free of y or a coefficient times y, so the equation is linear in y.",
        Some(format!("dy/dx = {}", canonical)),
    )];
    let p = (-a.clone()).simplify();
    let q = b.clone();
    steps.push(Step::new(
        "Standard form",
        "Move the y term to the left side.",
        Some(format!(
            "dy/dx + {} = {}",
            (p.clone() * y.clone()).simplify(),
            q
        )),
    ));
    steps.push(Step::new(
        "Read off the coefficients",
        "Coefficient of y on the left and the free term on the right.",
        Some(format!("P(x) = {}, Q(x) = {}", p, q)),
    ));
    let p_integral = p
        .integrate(INDEPENDENT_VAR)
        .map_err(|_| SolveError::not_integrable("cannot integrate P(x)"))?;
    let mu = p_integral.clone().exp().simplify();
    steps.push(Step::new(
        "Integrating factor",
        "Multiply the equation by μ(x) = exp(∫P(x) dx).",
        Some(format!("μ(x) = exp({}) = {}", p_integral, mu)),
    ));
    let mu_q = (mu.clone() * q.clone()).simplify();
    steps.push(Step::new(
        "Exact derivative",
        "The left side becomes the derivative of μ(x) * y.",
        Some(format!("d/dx ({} * y) = {}", mu, mu_q)),
    ));
    match mu_q.integrate(INDEPENDENT_VAR) {
        Ok(integral) => {
            steps.push(Step::new(
                "Integrate both sides",
                "Integrate the right side with respect to x.",
                Some(format!("∫({}) dx = {}", mu_q, integral)),
            ));
            let solution = ((integral + c()) / mu).simplify();
            let final_text = format!("y(x) = {}", solution);
            steps.push(Step::new(
                "Solve for y",
                "Divide by the integrating factor.",
                Some(final_text.clone()),
            ));
            info!("linear solution: {}", final_text);
            Ok(Derivation {
                steps,
                final_text,
                solution: Some(solution),
                form: SolutionForm::Explicit,
            })
        }
        Err(e) => {
            warn!("{}; leaving the integral unevaluated", e);
            let final_text = format!("y(x) = (1 / {}) * (∫({}) dx + C)", mu, mu_q);
            steps.push(Step::new(
                "Integrate both sides",
                "The integral of μ(x) * Q(x) is beyond the supported rules and is left unevaluated.",
                Some(final_text.clone()),
            ));
            Ok(Derivation {
                steps,
                final_text,
                solution: None,
                form: SolutionForm::Implicit,
            })
        }
    }
}

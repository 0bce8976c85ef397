//! Sorts the right-hand side of `dy/dx = f(x, y)` into the solvable families.
//!
//! The matches are conservative on purpose: a right-hand side that would need algebraic
//! rewriting (expansion, factoring, cancellation) to fit a family is reported as unsupported.
use crate::symbolic::symbolic_engine::{DEPENDENT_VAR, Expr, INDEPENDENT_VAR};
use log::{debug, info};
use strum_macros::Display;

#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Classification {
    /// `dy/dx = f(x)`
    Direct(Expr),
    /// `dy/dx = x_part * y_part`; `y_reciprocal` is `1 / y_part` built from the factors
    Separable {
        x_part: Expr,
        y_part: Expr,
        y_reciprocal: Expr,
    },
    /// `dy/dx = a * y + b`, `a` and `b` free of `y`
    Linear { a: Expr, b: Expr },
    Unsupported,
}

/// Signed product `±(numerator[0] * ... ) / (denominator[0] * ...)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFactors {
    pub negative: bool,
    pub numerator: Vec<Expr>,
    pub denominator: Vec<Expr>,
}

impl ProductFactors {
    /// Flattens nested products, quotients and negations.
    pub fn of(expr: &Expr) -> ProductFactors {
        let mut factors = ProductFactors::default();
        factors.collect(expr, false);
        factors
    }

    fn collect(&mut self, expr: &Expr, inverted: bool) {
        match expr {
            Expr::Mul(lhs, rhs) => {
                self.collect(lhs, inverted);
                self.collect(rhs, inverted);
            }
            Expr::Div(lhs, rhs) => {
                self.collect(lhs, inverted);
                self.collect(rhs, !inverted);
            }
            Expr::Neg(inner) => {
                self.negative = !self.negative;
                self.collect(inner, inverted);
            }
            factor if inverted => self.denominator.push(factor.clone()),
            factor => self.numerator.push(factor.clone()),
        }
    }
}

/// product of the factors, 1 for none
pub fn product(factors: &[Expr]) -> Expr {
    factors
        .iter()
        .cloned()
        .reduce(|acc, factor| acc * factor)
        .unwrap_or(Expr::Const(1.0))
}

/// sum of the terms, 0 for none
pub fn sum(terms: Vec<Expr>) -> Expr {
    terms
        .into_iter()
        .reduce(|acc, term| acc + term)
        .unwrap_or(Expr::Const(0.0))
}

fn signed(expr: Expr, negative: bool) -> Expr {
    if negative { -expr } else { expr }
}

/// Flattens nested sums and differences into `(negative, term)` pairs.
pub fn signed_terms(expr: &Expr) -> Vec<(bool, Expr)> {
    fn collect(expr: &Expr, negative: bool, out: &mut Vec<(bool, Expr)>) {
        match expr {
            Expr::Add(lhs, rhs) => {
                collect(lhs, negative, out);
                collect(rhs, negative, out);
            }
            Expr::Sub(lhs, rhs) => {
                collect(lhs, negative, out);
                collect(rhs, !negative, out);
            }
            Expr::Neg(inner) => collect(inner, !negative, out),
            term => out.push((negative, term.clone())),
        }
    }
    let mut terms = Vec::new();
    collect(expr, false, &mut terms);
    terms
}

/// Classifies an already simplified right-hand side.
pub fn classify(rhs: &Expr) -> Classification {
    let classification = if !rhs.contains_variable(DEPENDENT_VAR) {
        Classification::Direct(rhs.clone())
    } else if let Some(separable) = match_separable(rhs) {
        separable
    } else if let Some(linear) = match_linear_ode(rhs) {
        linear
    } else {
        Classification::Unsupported
    };
    info!("dy/dx = {} classified as {}", rhs, classification);
    classification
}

fn match_separable(rhs: &Expr) -> Option<Classification> {
    let factors = ProductFactors::of(rhs);
    let (mut x_num, mut x_den) = (Vec::new(), Vec::new());
    let (mut y_num, mut y_den) = (Vec::new(), Vec::new());
    let tagged = factors
        .numerator
        .iter()
        .map(|f| (f, true))
        .chain(factors.denominator.iter().map(|f| (f, false)));
    for (factor, in_numerator) in tagged {
        let has_x = factor.contains_variable(INDEPENDENT_VAR);
        let has_y = factor.contains_variable(DEPENDENT_VAR);
        if has_x && has_y {
            debug!("not separable: factor {} depends on both variables", factor);
            return None;
        }
        match (has_y, in_numerator) {
            (true, true) => y_num.push(factor.clone()),
            (true, false) => y_den.push(factor.clone()),
            (false, true) => x_num.push(factor.clone()),
            (false, false) => x_den.push(factor.clone()),
        }
    }
    if y_num.is_empty() && y_den.is_empty() {
        return None;
    }
    let x_part = signed(product(&x_num) / product(&x_den), factors.negative).simplify();
    let y_part = (product(&y_num) / product(&y_den)).simplify();
    if !y_part.contains_variable(DEPENDENT_VAR) {
        debug!("not separable: y part {} is degenerate", y_part);
        return None;
    }
    let y_reciprocal = reciprocal(&y_num, &y_den);
    Some(Classification::Separable {
        x_part,
        y_part,
        y_reciprocal,
    })
}

/// `1 / (num / den)` with numerator and denominator swapped; a numerator factor `u^p` with a
/// numeric exponent stays in the numerator as `u^-p`
fn reciprocal(numerator: &[Expr], denominator: &[Expr]) -> Expr {
    let mut new_num = denominator.to_vec();
    let mut new_den = Vec::new();
    for factor in numerator {
        match factor {
            Expr::Pow(base, exp) => match exp.numeric_value() {
                Some(p) => new_num.push(base.as_ref().clone().pow(Expr::Const(-p))),
                None => new_den.push(factor.clone()),
            },
            _ => new_den.push(factor.clone()),
        }
    }
    (product(&new_num) / product(&new_den)).simplify()
}

fn match_linear_ode(rhs: &Expr) -> Option<Classification> {
    let mut coefficients = Vec::new();
    let mut free_terms = Vec::new();
    for (negative, term) in signed_terms(rhs) {
        if !term.contains_variable(DEPENDENT_VAR) {
            free_terms.push(signed(term, negative));
            continue;
        }
        match y_coefficient(&term) {
            Some(coefficient) => coefficients.push(signed(coefficient, negative)),
            None => {
                debug!("not linear: term {} is not coefficient * y", term);
                return None;
            }
        }
    }
    if coefficients.is_empty() {
        return None;
    }
    Some(Classification::Linear {
        a: sum(coefficients).simplify(),
        b: sum(free_terms).simplify(),
    })
}

/// coefficient of a term containing exactly one bare `y` factor and no other `y`
fn y_coefficient(term: &Expr) -> Option<Expr> {
    let factors = ProductFactors::of(term);
    if factors
        .denominator
        .iter()
        .any(|f| f.contains_variable(DEPENDENT_VAR))
    {
        return None;
    }
    let y = Expr::var(DEPENDENT_VAR);
    let mut found = false;
    let mut rest = Vec::new();
    for factor in factors.numerator.iter() {
        if *factor == y && !found {
            found = true;
        } else if factor.contains_variable(DEPENDENT_VAR) {
            return None;
        } else {
            rest.push(factor.clone());
        }
    }
    if !found {
        return None;
    }
    let coefficient = signed(product(&rest) / product(&factors.denominator), factors.negative);
    Some(coefficient.simplify())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    #[test]
    fn test_product_factors() {
        let factors = ProductFactors::of(&parse("-x*y/(2*(x+1))"));
        assert!(factors.negative);
        assert_eq!(factors.numerator, vec![parse("x"), parse("y")]);
        assert_eq!(factors.denominator, vec![Expr::Const(2.0), parse("x+1")]);
        let factors = ProductFactors::of(&parse("x/(y/x)"));
        assert_eq!(factors.numerator, vec![parse("x"), parse("x")]);
        assert_eq!(factors.denominator, vec![parse("y")]);
    }

    #[test]
    fn test_signed_terms() {
        let terms = signed_terms(&parse("x - (y - 2) + -x*y"));
        let rendered: Vec<(bool, String)> = terms
            .into_iter()
            .map(|(negative, term)| (negative, term.to_string()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (false, "x".to_string()),
                (true, "y".to_string()),
                (false, "2".to_string()),
                (false, "-x * y".to_string()),
            ]
        );
    }

    #[test]
    fn test_direct() {
        assert_eq!(classify(&parse("2*x")), Classification::Direct(parse("2*x")));
        assert_eq!(classify(&parse("5")).to_string(), "direct");
    }

    #[test]
    fn test_separable() {
        match classify(&parse("x*y")) {
            Classification::Separable {
                x_part,
                y_part,
                y_reciprocal,
            } => {
                assert_eq!(x_part, parse("x"));
                assert_eq!(y_part, parse("y"));
                assert_eq!(y_reciprocal.to_string(), "1 / y");
            }
            other => panic!("expected separable, got {:?}", other),
        }
        match classify(&parse("-(y^2)/(x+1)")) {
            Classification::Separable {
                x_part,
                y_part,
                y_reciprocal,
            } => {
                assert_eq!(x_part.to_string(), "-(1 / (x + 1))");
                assert_eq!(y_part.to_string(), "y^2");
                assert_eq!(y_reciprocal.to_string(), "y^-2");
            }
            other => panic!("expected separable, got {:?}", other),
        }
        assert_eq!(classify(&parse("y")).to_string(), "separable");
        assert_eq!(classify(&parse("exp(x)/cos(y)")).to_string(), "separable");
    }

    #[test]
    fn test_linear() {
        match classify(&parse("x + y")) {
            Classification::Linear { a, b } => {
                assert_eq!(a, Expr::Const(1.0));
                assert_eq!(b, parse("x"));
            }
            other => panic!("expected linear, got {:?}", other),
        }
        match classify(&parse("x*y + y - sin(x)")) {
            Classification::Linear { a, b } => {
                assert_eq!(a.to_string(), "x + 1");
                assert_eq!(b.to_string(), "-sin(x)");
            }
            other => panic!("expected linear, got {:?}", other),
        }
        match classify(&parse("-y/x + x^2")) {
            Classification::Linear { a, b } => {
                assert_eq!(a.to_string(), "-(1 / x)");
                assert_eq!(b.to_string(), "x^2");
            }
            other => panic!("expected linear, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported() {
        for input in ["y^2 + x", "sin(x*y)", "x*y*y + x", "x/y + x", "exp(y) + x", "sin(x + y)"] {
            assert_eq!(
                classify(&parse(input)),
                Classification::Unsupported,
                "{} should be unsupported",
                input
            );
        }
    }
}

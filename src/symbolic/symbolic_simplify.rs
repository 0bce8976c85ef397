//! # Symbolic Expression Simplification Module
//!
//! One bottom-up pass: children are simplified first, then the rules below are tried on the
//! node itself. Every rule returns either a constant, an already simplified child, or a node
//! whose children are simplified and which matches no rule, so a second pass changes nothing.
//!
//! ## Rules
//!
//! - **Constant Folding**: `+ - * / ^` between two constants is evaluated (`^` is `powf`)
//!   when the result is finite; `1 / 0`, `0^-1` or `(-1)^0.5` stay structural
//! - **Additive identities**: `x + 0 = x`, `0 + x = x`, `x - 0 = x`, `0 - x = -x`
//! - **Multiplicative identities**: `x * 1 = x`, `1 * x = x`, `x * 0 = 0`, `0 * x = 0`,
//!   `x / 1 = x`, `0 / x = 0`, `-1 * x = -x`, `x / -1 = -x`
//! - **Scaled quotients**: `c1 * (x / c2) = (c1 / c2) * x`
//! - **Power identities**: `x^0 = 1`, `x^1 = x`
//! - **Negation**: `-(c)` folds into the constant `-c`, `-(-x) = x`
//!
//! Identity checks compare constants with an absolute tolerance of `TOLERANCE` (1e-9).
//! Functions are never evaluated, `exp(0)` stays `exp(0)`.

use crate::symbolic::symbolic_engine::{Expr, TOLERANCE};

impl Expr {
    /// Canonicalizes the expression with constant folding and the identities listed in the
    /// module documentation. Total: never fails, the result is equal to the input as a real
    /// function (up to removable singularities such as `0 / x`).
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Neg(expr) => simplify_neg(expr.simplify()),
            Expr::Func(function, expr) => Expr::Func(*function, expr.simplify().boxed()),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify(), rhs.simplify()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify(), rhs.simplify()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify(), rhs.simplify()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify(), rhs.simplify()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify(), exp.simplify()),
        }
    }
}

/// the folded constant, or `structural()` if the value is inf or NaN
fn fold(value: f64, structural: impl FnOnce() -> Expr) -> Expr {
    if value.is_finite() {
        Expr::Const(value)
    } else {
        structural()
    }
}

fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Const(c) => Expr::Const(if c == 0.0 { 0.0 } else { -c }),
        Expr::Neg(inner) => *inner,
        other => Expr::Neg(other.boxed()),
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs, rhs) {
        (Expr::Const(a), Expr::Const(b)) => fold(a + b, || Expr::Const(a) + Expr::Const(b)),
        (lhs, rhs) if rhs.is_zero() => lhs,
        (lhs, rhs) if lhs.is_zero() => rhs,
        (lhs, rhs) => Expr::Add(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs, rhs) {
        (Expr::Const(a), Expr::Const(b)) => fold(a - b, || Expr::Const(a) - Expr::Const(b)),
        (lhs, rhs) if rhs.is_zero() => lhs,
        (lhs, rhs) if lhs.is_zero() => simplify_neg(rhs),
        (lhs, rhs) => Expr::Sub(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs, rhs) {
        (Expr::Const(a), Expr::Const(b)) => fold(a * b, || Expr::Const(a) * Expr::Const(b)),
        (lhs, rhs) if lhs.is_zero() || rhs.is_zero() => Expr::Const(0.0),
        (lhs, rhs) if rhs.is_one() => lhs,
        (lhs, rhs) if lhs.is_one() => rhs,
        (lhs, rhs) if lhs.is_minus_one() => simplify_neg(rhs),
        (lhs, rhs) if rhs.is_minus_one() => simplify_neg(lhs),
        (Expr::Const(a), Expr::Div(num, den)) => match *den {
            Expr::Const(b) if b.abs() >= TOLERANCE && (a / b).is_finite() => {
                simplify_mul(Expr::Const(a / b), *num)
            }
            den => Expr::Mul(Expr::Const(a).boxed(), Expr::Div(num, den.boxed()).boxed()),
        },
        (Expr::Div(num, den), Expr::Const(a)) => match *den {
            Expr::Const(b) if b.abs() >= TOLERANCE && (a / b).is_finite() => {
                simplify_mul(Expr::Const(a / b), *num)
            }
            den => Expr::Mul(Expr::Div(num, den.boxed()).boxed(), Expr::Const(a).boxed()),
        },
        (lhs, rhs) => Expr::Mul(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs, rhs) {
        (Expr::Const(a), Expr::Const(b)) => fold(a / b, || Expr::Const(a) / Expr::Const(b)),
        (lhs, rhs) if rhs.is_one() => lhs,
        (lhs, rhs) if rhs.is_minus_one() => simplify_neg(lhs),
        (lhs, _) if lhs.is_zero() => Expr::Const(0.0),
        (lhs, rhs) => Expr::Div(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    match (base, exp) {
        (Expr::Const(a), Expr::Const(b)) => {
            fold(a.powf(b), || Expr::Const(a).pow(Expr::Const(b)))
        }
        (_, exp) if exp.is_zero() => Expr::Const(1.0),
        (base, exp) if exp.is_one() => base,
        (base, exp) => Expr::Pow(base.boxed(), exp.boxed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Function;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_constant_folding() {
        let expr = (Expr::Const(2.0) + Expr::Const(3.0)) * Expr::Const(4.0);
        assert_eq!(expr.simplify(), Expr::Const(20.0));
        let expr = Expr::Const(2.0).pow(Expr::Const(10.0)) / Expr::Const(4.0);
        assert_eq!(expr.simplify(), Expr::Const(256.0));
        let expr = -(Expr::Const(1.0) - Expr::Const(3.0));
        assert_eq!(expr.simplify(), Expr::Const(2.0));
    }

    #[test]
    fn test_additive_identities() {
        assert_eq!((x() + Expr::Const(0.0)).simplify(), x());
        assert_eq!((Expr::Const(0.0) + x()).simplify(), x());
        assert_eq!((x() - Expr::Const(0.0)).simplify(), x());
        assert_eq!((Expr::Const(0.0) - x()).simplify(), -x());
        // within tolerance
        assert_eq!((x() + Expr::Const(1e-12)).simplify(), x());
    }

    #[test]
    fn test_multiplicative_identities() {
        assert_eq!((x() * Expr::Const(1.0)).simplify(), x());
        assert_eq!((Expr::Const(1.0) * x()).simplify(), x());
        assert_eq!((x() * Expr::Const(0.0)).simplify(), Expr::Const(0.0));
        assert_eq!((Expr::Const(0.0) * x().exp()).simplify(), Expr::Const(0.0));
        assert_eq!((x() / Expr::Const(1.0)).simplify(), x());
        assert_eq!((Expr::Const(0.0) / x()).simplify(), Expr::Const(0.0));
        assert_eq!((Expr::Const(-1.0) * x()).simplify(), -x());
        assert_eq!((x() / Expr::Const(-1.0)).simplify(), -x());
    }

    #[test]
    fn test_scaled_quotient() {
        let expr = Expr::Const(2.0) * (x().pow(Expr::Const(2.0)) / Expr::Const(2.0));
        assert_eq!(expr.simplify(), x().pow(Expr::Const(2.0)));
        let expr = Expr::Const(3.0) * (x() / Expr::Const(2.0));
        assert_eq!(expr.simplify(), Expr::Const(1.5) * x());
    }

    #[test]
    fn test_power_identities() {
        assert_eq!(x().pow(Expr::Const(0.0)).simplify(), Expr::Const(1.0));
        assert_eq!(x().pow(Expr::Const(1.0)).simplify(), x());
        assert_eq!(
            x().pow(Expr::Const(1.0) + Expr::Const(1.0)).simplify(),
            x().pow(Expr::Const(2.0))
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!((-Expr::Const(2.0)).simplify(), Expr::Const(-2.0));
        assert_eq!((-(-x())).simplify(), x());
        assert_eq!((-x().exp()).simplify(), -x().exp());
        assert_eq!((-Expr::Const(0.0)).simplify().to_string(), "0");
    }

    #[test]
    fn test_functions_are_not_evaluated() {
        let expr = (Expr::Const(0.0) * x()).exp();
        assert_eq!(
            expr.simplify(),
            Expr::Func(Function::Exp, Box::new(Expr::Const(0.0)))
        );
    }

    #[test]
    fn test_non_finite_constants_are_not_folded() {
        let one_over_zero = Expr::Const(1.0) / Expr::Const(0.0);
        assert_eq!(one_over_zero.simplify(), one_over_zero);
        let root_of_minus_one = Expr::Const(-1.0).pow(Expr::Const(0.5));
        assert_eq!(root_of_minus_one.simplify(), root_of_minus_one);
        let zero_to_minus_one = Expr::Const(0.0).pow(Expr::Const(-1.0));
        assert_eq!(zero_to_minus_one.simplify(), zero_to_minus_one);
        let overflow = Expr::Const(f64::MAX) * Expr::Const(10.0);
        assert_eq!(overflow.simplify(), overflow);
        // scaled quotient whose factor would overflow keeps the quotient
        let expr = Expr::Const(f64::MAX) * (x() / Expr::Const(0.5));
        assert_eq!(expr.simplify(), expr);

        for input in ["x + 1/0", "(-1)^0.5 * y", "0^-1 - x", "(1/0) * y"] {
            let simplified = Expr::parse_expression(input).unwrap();
            let text = simplified.to_string();
            assert!(!text.contains("inf") && !text.contains("NaN"), "{}", text);
            let reparsed = Expr::parse_expression(&text).unwrap();
            assert_eq!(reparsed, simplified, "round trip of {}", input);
        }
    }

    #[test]
    fn test_idempotent() {
        for input in [
            "x + 0*y",
            "2*(x^2/2) + 1*y - 0",
            "-(-(x)) * -1",
            "(x - 0)^1 / 1 + 0 - y",
            "3*(x/2)*(y/4)",
            "exp(-1*x) * (0 + x)",
        ] {
            let expr = Expr::parse_expression(input).unwrap();
            let once = expr.simplify();
            assert_eq!(once.simplify(), once, "simplify not idempotent on {}", input);
        }
    }
}

//! # Symbolic Integration Module
//!
//! Bounded rule set for indefinite integrals. No constant of integration is added here, the
//! ODE solver does that. A failure means "no rule matched" and must never be read as zero.
//!
//! Rules, tried in this order for a node `n` and variable `v`:
//! 1. `n` independent of `v`: `n * v`
//! 2. `v` itself: `v^2 / 2`
//! 3. `-u`: `-∫u`
//! 4. `u + w`, `u - w`: `∫u ± ∫w`
//! 5. `u * w` with exactly one side independent of `v`: constant multiple rule
//! 6. `u / w`: `w` independent of `v` gives `∫u / w`; a constant numerator over an affine
//!    denominator `a*v + b` gives `(u / a) * ln(abs(w))`
//! 7. `v^p` with numeric `p`: `ln(abs(v))` for `p = -1`, otherwise `v^(p+1) / (p+1)`
//! 8. `exp`, `sin`, `cos`, `tan` of an affine argument `a*v + b`
//!
//! Products of two dependent factors, integration by parts and general substitution are not
//! attempted.
use crate::symbolic::symbolic_engine::{Expr, Function, TOLERANCE};
use crate::symbolic::symbolic_errors::IntegrationError;
use log::debug;

/// `a * var + b` decomposition of an expression; `a == 0` means the expression does not depend
/// on the variable.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearForm {
    pub a: f64,
    pub b: Expr,
}

impl LinearForm {
    /// affine in the variable with a nonzero slope
    pub fn is_affine(&self) -> bool {
        self.a.abs() >= TOLERANCE
    }
}

impl Expr {
    /// Antiderivative of the expression with respect to `var`, simplified.
    pub fn integrate(&self, var: &str) -> Result<Expr, IntegrationError> {
        match self.integrate_raw(var) {
            Ok(result) => Ok(result.simplify()),
            Err(e) => {
                debug!("integration failed: {}", e);
                Err(e)
            }
        }
    }

    fn integrate_raw(&self, var: &str) -> Result<Expr, IntegrationError> {
        // ∫ c dv = c*v
        if !self.contains_variable(var) {
            return Ok(self.clone() * Expr::var(var));
        }
        match self {
            // ∫ v dv = v²/2
            Expr::Var(_) => Ok(Expr::var(var).pow(Expr::Const(2.0)) / Expr::Const(2.0)),
            Expr::Neg(expr) => Ok(-expr.integrate_raw(var)?),
            // ∫ (f ± g) dv = ∫ f dv ± ∫ g dv
            Expr::Add(lhs, rhs) => Ok(lhs.integrate_raw(var)? + rhs.integrate_raw(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate_raw(var)? - rhs.integrate_raw(var)?),
            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),
            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),
            Expr::Func(function, arg) => self.integrate_function(*function, arg, var),
            Expr::Const(_) => Ok(self.clone() * Expr::var(var)),
        }
    }

    /// ∫ c*f dv = c * ∫ f dv, only when exactly one factor is independent of the variable
    fn integrate_multiplication(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        var: &str,
    ) -> Result<Expr, IntegrationError> {
        match (lhs.contains_variable(var), rhs.contains_variable(var)) {
            (false, true) => Ok(lhs.clone() * rhs.integrate_raw(var)?),
            (true, false) => Ok(rhs.clone() * lhs.integrate_raw(var)?),
            _ => Err(IntegrationError::new(self, var)),
        }
    }

    fn integrate_division(
        &self,
        lhs: &Expr,
        rhs: &Expr,
        var: &str,
    ) -> Result<Expr, IntegrationError> {
        // ∫ f/c dv = (∫ f dv) / c
        if !rhs.contains_variable(var) {
            return Ok(lhs.integrate_raw(var)? / rhs.clone());
        }
        if lhs.contains_variable(var) {
            return Err(IntegrationError::new(self, var));
        }
        // ∫ c/v dv = c*ln|v|
        if let Expr::Var(name) = rhs {
            if name == var {
                return Ok(lhs.clone() * rhs.clone().abs().ln());
            }
        }
        // ∫ c/(a*v + b) dv = (c/a)*ln|a*v + b|
        match rhs.match_linear(var) {
            Some(form) if form.is_affine() => {
                Ok((lhs.clone() / Expr::Const(form.a)) * rhs.clone().abs().ln())
            }
            _ => Err(IntegrationError::new(self, var)),
        }
    }

    fn integrate_power(&self, base: &Expr, exp: &Expr, var: &str) -> Result<Expr, IntegrationError> {
        let base_is_var = matches!(base, Expr::Var(name) if name == var);
        let power = if base_is_var { exp.numeric_value() } else { None };
        match power {
            // ∫ v^-1 dv = ln|v|
            Some(p) if (p + 1.0).abs() < TOLERANCE => Ok(base.clone().abs().ln()),
            // ∫ v^p dv = v^(p+1)/(p+1)
            Some(p) => {
                let p1 = Expr::Const(p + 1.0);
                Ok(base.clone().pow(p1.clone()) / p1)
            }
            None => Err(IntegrationError::new(self, var)),
        }
    }

    fn integrate_function(
        &self,
        function: Function,
        arg: &Expr,
        var: &str,
    ) -> Result<Expr, IntegrationError> {
        let a = match arg.match_linear(var) {
            Some(form) if form.is_affine() => Expr::Const(form.a),
            _ => return Err(IntegrationError::new(self, var)),
        };
        let arg = arg.clone();
        match function {
            // ∫ exp(a*v + b) dv = exp(a*v + b)/a
            Function::Exp => Ok(arg.exp() / a),
            // ∫ sin(a*v + b) dv = -cos(a*v + b)/a
            Function::Sin => Ok(-arg.func(Function::Cos) / a),
            // ∫ cos(a*v + b) dv = sin(a*v + b)/a
            Function::Cos => Ok(arg.func(Function::Sin) / a),
            // ∫ tan(a*v + b) dv = -ln|cos(a*v + b)|/a
            Function::Tan => Ok(-arg.func(Function::Cos).abs().ln() / a),
            _ => Err(IntegrationError::new(self, var)),
        }
    }

    /// Decomposes the expression as `a * var + b` by walking sums, negations and products or
    /// quotients by numeric constants. Returns `None` as soon as the variable is used in a
    /// non-affine way (inside a function, in a power, in a denominator, times itself).
    pub fn match_linear(&self, var: &str) -> Option<LinearForm> {
        if !self.contains_variable(var) {
            return Some(LinearForm {
                a: 0.0,
                b: self.clone(),
            });
        }
        match self {
            Expr::Var(_) => Some(LinearForm {
                a: 1.0,
                b: Expr::Const(0.0),
            }),
            Expr::Neg(expr) => {
                let form = expr.match_linear(var)?;
                Some(LinearForm {
                    a: -form.a,
                    b: (-form.b).simplify(),
                })
            }
            Expr::Add(lhs, rhs) => {
                let (l, r) = (lhs.match_linear(var)?, rhs.match_linear(var)?);
                Some(LinearForm {
                    a: l.a + r.a,
                    b: (l.b + r.b).simplify(),
                })
            }
            Expr::Sub(lhs, rhs) => {
                let (l, r) = (lhs.match_linear(var)?, rhs.match_linear(var)?);
                Some(LinearForm {
                    a: l.a - r.a,
                    b: (l.b - r.b).simplify(),
                })
            }
            Expr::Mul(lhs, rhs) => {
                let (c, form) = if let Some(c) = lhs.numeric_value() {
                    (c, rhs.match_linear(var)?)
                } else if let Some(c) = rhs.numeric_value() {
                    (c, lhs.match_linear(var)?)
                } else {
                    return None;
                };
                Some(LinearForm {
                    a: c * form.a,
                    b: (Expr::Const(c) * form.b).simplify(),
                })
            }
            Expr::Div(lhs, rhs) => {
                let c = rhs.numeric_value().filter(|c| c.abs() >= TOLERANCE)?;
                let form = lhs.match_linear(var)?;
                Some(LinearForm {
                    a: form.a / c,
                    b: (form.b / Expr::Const(c)).simplify(),
                })
            }
            Expr::Const(_) | Expr::Pow(..) | Expr::Func(..) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(input: &str) -> Expr {
        Expr::parse_expression(input).unwrap()
    }

    fn integral(input: &str) -> String {
        parse(input).integrate("x").unwrap().to_string()
    }

    /// numeric derivative of the antiderivative must give back the integrand
    fn check_antiderivative(input: &str, points: &[f64]) {
        let f = parse(input);
        let big_f = f.integrate("x").unwrap();
        let h = 1e-6;
        for &x in points {
            let derivative = (big_f.eval_xy(x + h, 0.0) - big_f.eval_xy(x - h, 0.0)) / (2.0 * h);
            assert_relative_eq!(derivative, f.eval_xy(x, 0.0), epsilon = 1e-5, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_constant_and_variable() {
        assert_eq!(integral("3"), "3 * x");
        assert_eq!(integral("x"), "x^2 / 2");
        assert_eq!(integral("y"), "y * x");
        assert_eq!(integral("2*x"), "x^2");
        assert_eq!(integral("-x"), "-(x^2 / 2)");
    }

    #[test]
    fn test_sums() {
        assert_eq!(integral("2*x + 1"), "x^2 + x");
        check_antiderivative("x^2 - 3*x + exp(x)", &[-1.0, 0.5, 2.0]);
    }

    #[test]
    fn test_power_rule() {
        assert_eq!(integral("x^2"), "x^3 / 3");
        assert_eq!(integral("x^-1"), "ln(abs(x))");
        check_antiderivative("x^0.5", &[0.5, 1.0, 4.0]);
        check_antiderivative("x^-2", &[0.5, 1.0, 4.0]);
    }

    #[test]
    fn test_quotients() {
        assert_eq!(integral("1/x"), "ln(abs(x))");
        assert_eq!(integral("1/(x+1)"), "ln(abs(x + 1))");
        assert_eq!(integral("x/2"), "x^2 / 2 / 2");
        check_antiderivative("3/(2*x - 1)", &[1.0, 2.0, -3.0]);
        // zero numerator is independent of x and goes through the constant rule
        assert_eq!(integral("0/(x+1)"), "0");
    }

    #[test]
    fn test_affine_functions() {
        assert_eq!(integral("exp(x)"), "exp(x)");
        assert_eq!(integral("cos(x)"), "sin(x)");
        assert_eq!(integral("sin(x)"), "-cos(x)");
        assert_eq!(integral("exp(2*x)"), "exp(2 * x) / 2");
        check_antiderivative("sin(3*x + 1)", &[0.1, 0.7, 2.0]);
        check_antiderivative("cos(x/2 - 4)", &[0.1, 0.7, 2.0]);
        check_antiderivative("tan(2*x)", &[0.1, 0.3, 0.5]);
        check_antiderivative("exp(-x)", &[0.1, 0.7, 2.0]);
    }

    #[test]
    fn test_independent_function_is_constant() {
        assert_eq!(integral("ln(2)"), "ln(2) * x");
        assert_eq!(integral("ln(y)"), "ln(y) * x");
    }

    #[test]
    fn test_unsupported_shapes_fail() {
        for input in [
            "x*exp(x)",
            "x*x",
            "1/x^2 + 1/(x*x)",
            "x/(x+1)",
            "ln(x)",
            "sqrt(x)",
            "exp(x^2)",
            "sin(x*x)",
            "2^x",
            "x^x",
            "1/(x^2 + 1)",
        ] {
            assert!(parse(input).integrate("x").is_err(), "{} should fail", input);
        }
    }

    #[test]
    fn test_integration_error_message() {
        let err = parse("x*exp(x)").integrate("x").unwrap_err();
        assert_eq!(err.to_string(), "cannot integrate x * exp(x) with respect to x");
    }

    #[test]
    fn test_integrate_other_variable() {
        let expr = parse("1/y");
        assert_eq!(expr.integrate("y").unwrap().to_string(), "ln(abs(y))");
        let expr = parse("x*y");
        assert_eq!(expr.integrate("y").unwrap().to_string(), "x * y^2 / 2");
    }

    #[test]
    fn test_match_linear_recovers_coefficients() {
        let cases = [
            ("2*x + 3", 2.0),
            ("x - 5", 1.0),
            ("-(x/4) + y", -0.25),
            ("3*(x + 1) - 2*(2 - x)", 5.0),
            ("(1 - x)/2", -0.5),
            ("x*(-7)", -7.0),
        ];
        for (input, a) in cases {
            let expr = parse(input);
            let form = expr.match_linear("x").unwrap();
            assert_relative_eq!(form.a, a, epsilon = 1e-12);
            assert!(!form.b.contains_variable("x"));
            for (x, y) in [(-2.0, 0.3), (0.0, 1.0), (1.5, -4.0)] {
                let rebuilt = form.a * x + form.b.eval_xy(x, y);
                assert_relative_eq!(rebuilt, expr.eval_xy(x, y), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_match_linear_rejects_nonlinear() {
        for input in ["x^2", "x*x", "1/x", "exp(x)", "x*y", "2/(x+1)"] {
            assert!(parse(input).match_linear("x").is_none(), "{}", input);
        }
        let independent = parse("y + 2").match_linear("x").unwrap();
        assert_eq!(independent.a, 0.0);
        assert!(!independent.is_affine());
    }
}

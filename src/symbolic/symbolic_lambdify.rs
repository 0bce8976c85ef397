//! Turns a symbolic expression into a regular rust function.
//!
//! The closure tree is built once (`lambdify_xy`) and then evaluated at as many points as the
//! caller wants. Evaluation never panics: a variable other than `x` or `y`, division by zero or
//! a value outside of a function's real domain all end up as NaN at the boundary.
use crate::symbolic::symbolic_engine::{DEPENDENT_VAR, Expr, INDEPENDENT_VAR};

/// compiled numeric function of (x, y)
pub type Lambdified = Box<dyn Fn(f64, f64) -> f64 + Send + Sync>;

impl Expr {
    /// Compiles the expression into a closure of the independent and the dependent variable.
    pub fn lambdify_xy(&self) -> Lambdified {
        match self {
            Expr::Var(name) => {
                if name == INDEPENDENT_VAR {
                    Box::new(|x, _| x)
                } else if name == DEPENDENT_VAR {
                    Box::new(|_, y| y)
                } else {
                    Box::new(|_, _| f64::NAN)
                }
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_, _| val)
            }
            Expr::Neg(expr) => {
                let expr_fn = expr.lambdify_xy();
                Box::new(move |x, y| -expr_fn(x, y))
            }
            Expr::Func(function, expr) => {
                let function = *function;
                let expr_fn = expr.lambdify_xy();
                Box::new(move |x, y| function.apply(expr_fn(x, y)))
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_xy();
                let rhs_fn = rhs.lambdify_xy();
                Box::new(move |x, y| lhs_fn(x, y) + rhs_fn(x, y))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_xy();
                let rhs_fn = rhs.lambdify_xy();
                Box::new(move |x, y| lhs_fn(x, y) - rhs_fn(x, y))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_xy();
                let rhs_fn = rhs.lambdify_xy();
                Box::new(move |x, y| lhs_fn(x, y) * rhs_fn(x, y))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_xy();
                let rhs_fn = rhs.lambdify_xy();
                Box::new(move |x, y| lhs_fn(x, y) / rhs_fn(x, y))
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify_xy();
                let exp_fn = exp.lambdify_xy();
                Box::new(move |x, y| base_fn(x, y).powf(exp_fn(x, y)))
            }
        }
    }

    /// Evaluates the expression at (x, y); non-finite results are reported as NaN.
    pub fn eval_xy(&self, x: f64, y: f64) -> f64 {
        let value = match self {
            Expr::Var(name) if name == INDEPENDENT_VAR => x,
            Expr::Var(name) if name == DEPENDENT_VAR => y,
            Expr::Var(_) => f64::NAN,
            Expr::Const(val) => *val,
            Expr::Neg(expr) => -expr.eval_xy(x, y),
            Expr::Func(function, expr) => function.apply(expr.eval_xy(x, y)),
            Expr::Add(lhs, rhs) => lhs.eval_xy(x, y) + rhs.eval_xy(x, y),
            Expr::Sub(lhs, rhs) => lhs.eval_xy(x, y) - rhs.eval_xy(x, y),
            Expr::Mul(lhs, rhs) => lhs.eval_xy(x, y) * rhs.eval_xy(x, y),
            Expr::Div(lhs, rhs) => lhs.eval_xy(x, y) / rhs.eval_xy(x, y),
            Expr::Pow(base, exp) => base.eval_xy(x, y).powf(exp.eval_xy(x, y)),
        };
        if value.is_finite() { value } else { f64::NAN }
    }

    /// Value of an expression without variables, None if it has any or is not finite.
    pub fn numeric_value(&self) -> Option<f64> {
        if let Expr::Const(c) = self {
            return c.is_finite().then_some(*c);
        }
        if !self.is_closed() {
            return None;
        }
        let value = self.eval_xy(f64::NAN, f64::NAN);
        if value.is_finite() { Some(value) } else { None }
    }

    /// The outermost variable-free part of the expression that has no finite value,
    /// such as `1 / 0` in `x + 1 / 0` or `ln(0)`.
    pub fn undefined_constant(&self) -> Option<&Expr> {
        if self.is_closed() {
            return match self.numeric_value() {
                Some(_) => None,
                None => Some(self),
            };
        }
        match self {
            Expr::Var(_) | Expr::Const(_) => None,
            Expr::Neg(expr) | Expr::Func(_, expr) => expr.undefined_constant(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.undefined_constant().or_else(|| rhs.undefined_constant()),
        }
    }

    /// Substitutes a variable with an expression.
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Neg(inner) => Expr::Neg(inner.substitute_variable(var, expr).boxed()),
            Expr::Func(function, inner) => {
                Expr::Func(*function, inner.substitute_variable(var, expr).boxed())
            }
            Expr::Add(lhs, rhs) => Expr::Add(
                lhs.substitute_variable(var, expr).boxed(),
                rhs.substitute_variable(var, expr).boxed(),
            ),
            Expr::Sub(lhs, rhs) => Expr::Sub(
                lhs.substitute_variable(var, expr).boxed(),
                rhs.substitute_variable(var, expr).boxed(),
            ),
            Expr::Mul(lhs, rhs) => Expr::Mul(
                lhs.substitute_variable(var, expr).boxed(),
                rhs.substitute_variable(var, expr).boxed(),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                lhs.substitute_variable(var, expr).boxed(),
                rhs.substitute_variable(var, expr).boxed(),
            ),
            Expr::Pow(base, exp) => Expr::Pow(
                base.substitute_variable(var, expr).boxed(),
                exp.substitute_variable(var, expr).boxed(),
            ),
        }
    }
}

/// Derivative evaluator for the numeric sampler: `f(x, y)` of `dy/dx = f(x, y)`.
/// Returns NaN wherever the right-hand side is undefined, it never panics.
pub fn make_derivative_evaluator(rhs: &Expr) -> impl Fn(f64, f64) -> f64 + Send + Sync + use<> {
    let compiled = rhs.lambdify_xy();
    move |x, y| {
        let value = compiled(x, y);
        if value.is_finite() { value } else { f64::NAN }
    }
}

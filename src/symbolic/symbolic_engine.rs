//! # Symbolic Engine Module
//!
//! This module provides the expression tree the whole crate is built on: the parser produces it,
//! the simplifier and the integrator rewrite it, the ODE solver classifies it and the lambdify
//! module turns it into a numeric function.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the independent variable `x`, the dependent variable `y`
//!   (and the integration constant `C`, which only the solver creates)
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Negation**: `Neg` - unary minus
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Func(Function, arg)` - sin, cos, tan, cot, sec, csc, exp, ln, sqrt, abs
//!
//! ### `Function` Enum
//! Closed table of named unary functions. Names are parsed case-insensitively and accept the
//! aliases `log` (for `ln`), `tg` (for `tan`) and `ctg` (for `cot`).
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: every node owns its children through `Box<Expr>`, so a
//!    subtree used twice is always a deep clone, there is no sharing.
//!
//! 2. **Operator Overloading**: implements std::ops traits (Add, Sub, Mul, Div, Neg) for
//!    natural construction: `x.clone() * y + Expr::Const(1.0)`
//!
//! 3. **Minimal parenthesization**: `Display` prints the infix form with only the parentheses
//!    the precedence table requires; this text is what the step trail of the solver shows.

use std::fmt;

use strum_macros::{Display, EnumIter, EnumString};

/// name of the independent variable
pub const INDEPENDENT_VAR: &str = "x";
/// name of the dependent variable
pub const DEPENDENT_VAR: &str = "y";
/// name of the arbitrary constant of integration
pub const INTEGRATION_CONST: &str = "C";
/// absolute tolerance of every numeric identity check
pub const TOLERANCE: f64 = 1e-9;

/// Named unary functions known to the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Function {
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tan", serialize = "tg")]
    Tan,
    #[strum(to_string = "cot", serialize = "ctg")]
    Cot,
    #[strum(to_string = "sec")]
    Sec,
    #[strum(to_string = "csc")]
    Csc,
    #[strum(to_string = "exp")]
    Exp,
    #[strum(to_string = "ln", serialize = "log")]
    Ln,
    #[strum(to_string = "sqrt")]
    Sqrt,
    #[strum(to_string = "abs")]
    Abs,
}

impl Function {
    /// numeric value of the function, NaN outside of the real domain
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Function::Sin => v.sin(),
            Function::Cos => v.cos(),
            Function::Tan => v.tan(),
            Function::Cot => v.cos() / v.sin(),
            Function::Sec => 1.0 / v.cos(),
            Function::Csc => 1.0 / v.sin(),
            Function::Exp => v.exp(),
            Function::Ln => v.ln(),
            Function::Sqrt => v.sqrt(),
            Function::Abs => v.abs(),
        }
    }
}

/// Core symbolic expression enum representing mathematical expressions as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name ("x", "y")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Unary negation: -arg
    Neg(Box<Expr>),
    /// Named function applied to one argument: f(arg)
    Func(Function, Box<Expr>),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates a symbolic variable.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Applies a named function to this expression.
    pub fn func(self, function: Function) -> Expr {
        Expr::Func(function, self.boxed())
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        self.func(Function::Exp)
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        self.func(Function::Ln)
    }

    /// Creates absolute value abs(self).
    pub fn abs(self) -> Expr {
        self.func(Function::Abs)
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Neg(expr) | Expr::Func(_, expr) => expr.contains_variable(var_name),
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => {
                left.contains_variable(var_name) || right.contains_variable(var_name)
            }
        }
    }

    /// true if there is no variable at all in the expression
    pub fn is_closed(&self) -> bool {
        match self {
            Expr::Var(_) => false,
            Expr::Const(_) => true,
            Expr::Neg(expr) | Expr::Func(_, expr) => expr.is_closed(),
            Expr::Add(left, right)
            | Expr::Sub(left, right)
            | Expr::Mul(left, right)
            | Expr::Div(left, right)
            | Expr::Pow(left, right) => left.is_closed() && right.is_closed(),
        }
    }

    /// Checks if expression is a constant equal to zero within `TOLERANCE`.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(c) if c.abs() < TOLERANCE)
    }

    /// Checks if expression is a constant equal to one within `TOLERANCE`.
    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(c) if (c - 1.0).abs() < TOLERANCE)
    }

    /// Checks if expression is a constant equal to minus one within `TOLERANCE`.
    pub fn is_minus_one(&self) -> bool {
        matches!(self, Expr::Const(c) if (c + 1.0).abs() < TOLERANCE)
    }

    /// Binding strength used by the printer: sums 1, products 2, powers 3,
    /// negation and negative numbers 4, atoms and function calls 5.
    pub fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => 1,
            Expr::Mul(..) | Expr::Div(..) => 2,
            Expr::Pow(..) => 3,
            Expr::Neg(_) => 4,
            Expr::Const(c) if *c < 0.0 => 4,
            Expr::Var(_) | Expr::Const(_) | Expr::Func(..) => 5,
        }
    }
}

/// writes `child`, in parentheses if it binds weaker than `parent_prec`
/// or equally and `strict_on_equal` is set
fn write_operand(
    f: &mut fmt::Formatter,
    child: &Expr,
    parent_prec: u8,
    strict_on_equal: bool,
) -> fmt::Result {
    let prec = child.precedence();
    if prec < parent_prec || (strict_on_equal && prec == parent_prec) {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// `+ - * /` are printed with spaces, `^` without. The right operand of `-` and `/` is
/// parenthesized on equal precedence. For `^` this is done on both sides rather than on the
/// right only: `(x^2)^3` would otherwise print as `x^2^3`, which parses as `x^(2^3)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => {
                if *val == 0.0 {
                    write!(f, "0")
                } else {
                    write!(f, "{}", val)
                }
            }
            Expr::Neg(expr) => {
                write!(f, "-")?;
                write_operand(f, expr, 4, false)
            }
            Expr::Func(function, expr) => write!(f, "{}({})", function, expr),
            Expr::Add(lhs, rhs) => {
                write_operand(f, lhs, 1, false)?;
                write!(f, " + ")?;
                write_operand(f, rhs, 1, false)
            }
            Expr::Sub(lhs, rhs) => {
                write_operand(f, lhs, 1, false)?;
                write!(f, " - ")?;
                write_operand(f, rhs, 1, true)
            }
            Expr::Mul(lhs, rhs) => {
                write_operand(f, lhs, 2, false)?;
                write!(f, " * ")?;
                write_operand(f, rhs, 2, false)
            }
            Expr::Div(lhs, rhs) => {
                write_operand(f, lhs, 2, false)?;
                write!(f, " / ")?;
                write_operand(f, rhs, 2, true)
            }
            Expr::Pow(base, exp) => {
                write_operand(f, base, 3, true)?;
                write!(f, "^")?;
                write_operand(f, exp, 3, true)
            }
        }
    }
}

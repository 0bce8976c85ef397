#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedODE::symbolic::symbolic_engine::Expr;
/// let input = "x^2 * ln(x + y)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.to_string(), "x^2 * ln(x + y)");
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree (`Expr`) and the table of named functions (`Function`)
/// 2) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use RustedODE::symbolic::symbolic_engine::Expr;
/// let x = Expr::var("x");
/// let expr = (x.clone() + Expr::Const(1.0)).abs().ln();
/// assert_eq!(expr.to_string(), "ln(abs(x + 1))");
/// assert!(expr.contains_variable("x"));
/// assert!(!expr.contains_variable("y"));
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
/// errors of parsing and integration
pub mod symbolic_errors;
///______________________________________________________________________________________________________________________________________________
/// rule based antiderivatives and affine (a*x + b) pattern matching
/// Example#
/// ```
/// use RustedODE::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("2*x + cos(3*x)").unwrap();
/// let F = f.integrate("x").unwrap();
/// println!("F = {}", F);
/// // polynomial times exponent is beyond the rule set
/// let g = Expr::parse_expression("x*exp(x)").unwrap();
/// assert!(g.integrate("x").is_err());
/// ```
pub mod symbolic_integration;
/// turns a symbolic expression into a regular rust function of (x, y)
pub mod symbolic_lambdify;
/// algebraic simplification: constant folding and identities
pub mod symbolic_simplify;

/// Fixed step 4th order Runge-Kutta sampler of solution curves through an initial point
/// Example#
/// ```
/// use RustedODE::numerical::RK4_trajectory::{sample_trajectory, DEFAULT_STEPS};
/// use RustedODE::symbolic::symbolic_engine::Expr;
/// use RustedODE::symbolic::symbolic_lambdify::make_derivative_evaluator;
/// // dy/dx = y through (0, 1) is exp(x)
/// let rhs = Expr::parse_expression("y").unwrap();
/// let f = make_derivative_evaluator(&rhs);
/// let trajectory = sample_trajectory(&f, 0.0, 1.0, 1.0, DEFAULT_STEPS);
/// let end = trajectory.forward.last().unwrap();
/// assert!((end.y - std::f64::consts::E).abs() < 1e-6);
/// ```
pub mod RK4_trajectory;

//! Classical 4th order Runge-Kutta for a scalar ODE `dy/dx = f(x, y)`, used to sample a
//! solution curve through an initial point in both directions.
//!
//! The derivative evaluator reports undefined points as NaN. A non-finite slope is counted as
//! zero so the step itself always completes; the direction stops at the first point whose y is
//! not finite.
use log::{debug, info};

/// steps taken in each direction by default
pub const DEFAULT_STEPS: usize = 160;
/// largest step count accepted from a task document
pub const MAX_STEPS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Sampled curve. `forward` starts at the initial point and goes right; `backward` holds the
/// points left of the initial point in ascending x, so `backward ++ forward` is ordered by x.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    pub forward: Vec<Point>,
    pub backward: Vec<Point>,
}

impl Trajectory {
    /// all points in ascending x
    pub fn points(&self) -> Vec<Point> {
        self.backward
            .iter()
            .chain(self.forward.iter())
            .copied()
            .collect()
    }
}

pub struct RK4Sampler<'a> {
    f: &'a dyn Fn(f64, f64) -> f64,
    pub x: f64,
    pub y: f64,
    h: f64,
}

fn finite_or_zero(slope: f64) -> f64 {
    if slope.is_finite() { slope } else { 0.0 }
}

impl<'a> RK4Sampler<'a> {
    pub fn new(f: &'a dyn Fn(f64, f64) -> f64) -> RK4Sampler<'a> {
        RK4Sampler {
            f,
            x: 0.0,
            y: 0.0,
            h: 0.0,
        }
    }

    pub fn set_initial(&mut self, x0: f64, y0: f64, h: f64) {
        self.x = x0;
        self.y = y0;
        self.h = h;
    }

    /// one step; false if the new y is not finite
    pub fn _step_impl(&mut self) -> bool {
        let (x, y, h) = (self.x, self.y, self.h);
        let f = self.f;
        let k1 = finite_or_zero(f(x, y));
        let k2 = finite_or_zero(f(x + h / 2.0, y + h * k1 / 2.0));
        let k3 = finite_or_zero(f(x + h / 2.0, y + h * k2 / 2.0));
        let k4 = finite_or_zero(f(x + h, y + h * k3));
        self.y = y + h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        self.x = x + h;
        self.y.is_finite()
    }

    /// up to `steps` points after the current one, stops before the first non-finite y
    pub fn run(&mut self, steps: usize) -> Vec<Point> {
        let mut points = Vec::with_capacity(steps.min(MAX_STEPS));
        for i in 0..steps {
            if !self._step_impl() {
                debug!("trajectory stopped after {} steps at x = {}", i, self.x);
                break;
            }
            points.push(Point {
                x: self.x,
                y: self.y,
            });
        }
        points
    }
}

/// Samples the curve through `(x0, y0)` on `[x0 - span, x0 + span]` with `steps` steps of
/// `span / steps` in each direction.
pub fn sample_trajectory(
    f: &dyn Fn(f64, f64) -> f64,
    x0: f64,
    y0: f64,
    span: f64,
    steps: usize,
) -> Trajectory {
    if steps == 0 || !y0.is_finite() {
        return Trajectory::default();
    }
    let h = span / steps as f64;
    let mut sampler = RK4Sampler::new(f);

    sampler.set_initial(x0, y0, h);
    let mut forward = vec![Point { x: x0, y: y0 }];
    forward.extend(sampler.run(steps));

    sampler.set_initial(x0, y0, -h);
    let mut backward = sampler.run(steps);
    backward.reverse();

    info!(
        "trajectory through ({}, {}): {} points forward, {} backward",
        x0,
        y0,
        forward.len(),
        backward.len()
    );
    Trajectory { forward, backward }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::symbolic_lambdify::make_derivative_evaluator;
    use approx::assert_relative_eq;

    #[test]
    fn test_exponential_growth_reaches_e() {
        let f = |_x: f64, y: f64| y;
        let trajectory = sample_trajectory(&f, 0.0, 1.0, 1.0, DEFAULT_STEPS);
        assert_eq!(trajectory.forward.len(), DEFAULT_STEPS + 1);
        let last = trajectory.forward[DEFAULT_STEPS];
        assert_relative_eq!(last.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(last.y, std::f64::consts::E, epsilon = 1e-9);
        // backward end at x = -1
        let first = trajectory.backward[0];
        assert_relative_eq!(first.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(first.y, (-1.0f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_points_are_ordered_by_x() {
        let f = |x: f64, _y: f64| x.cos();
        let trajectory = sample_trajectory(&f, 0.5, 0.0, 2.0, 40);
        let points = trajectory.points();
        assert_eq!(points.len(), 81);
        assert!(points.windows(2).all(|w| w[0].x < w[1].x));
        assert_eq!(trajectory.forward[0], Point { x: 0.5, y: 0.0 });
        // y = sin(x) - sin(0.5)
        for p in points.iter() {
            assert_relative_eq!(p.y, p.x.sin() - 0.5f64.sin(), epsilon = 1e-7);
        }
    }

    #[test]
    fn test_stops_at_overflow() {
        // slopes stay finite but their weighted sum overflows right of x = 1
        let f = |x: f64, _y: f64| if x > 1.0 { f64::MAX } else { 1.0 };
        let trajectory = sample_trajectory(&f, 0.0, 0.0, 4.0, 160);
        assert!(trajectory.forward.len() > 30);
        assert!(trajectory.forward.len() < 161);
        assert!(trajectory.forward.iter().all(|p| p.y.is_finite()));
        assert_eq!(trajectory.backward.len(), 160);
    }

    #[test]
    fn test_huge_step_count_does_not_preallocate() {
        // the first step already overflows, nothing close to `steps` points is produced
        let f = |_x: f64, _y: f64| f64::MAX;
        let mut sampler = RK4Sampler::new(&f);
        sampler.set_initial(0.0, 0.0, 1.0);
        assert!(sampler.run(100_000_000_000_000).is_empty());
    }

    #[test]
    fn test_undefined_slope_counts_as_zero() {
        // 1/x is undefined at the start point, the step still completes
        let rhs = Expr::parse_expression("1/x").unwrap();
        let f = make_derivative_evaluator(&rhs);
        let trajectory = sample_trajectory(&f, 0.0, 0.0, 1.0, 10);
        assert_eq!(trajectory.forward.len(), 11);
        assert_eq!(trajectory.backward.len(), 10);
        assert!(trajectory.points().iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_degenerate_input() {
        let f = |_x: f64, y: f64| y;
        assert_eq!(sample_trajectory(&f, 0.0, 1.0, 1.0, 0), Trajectory::default());
        assert_eq!(
            sample_trajectory(&f, 0.0, f64::NAN, 1.0, 10),
            Trajectory::default()
        );
    }
}

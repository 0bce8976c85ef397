use RustedODE::numerical::RK4_trajectory::{DEFAULT_STEPS, sample_trajectory};
use RustedODE::ode_solver::solve_api::solve;
use RustedODE::symbolic::symbolic_engine::Expr;
use RustedODE::symbolic::symbolic_lambdify::make_derivative_evaluator;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    for equation in ["dy/dx = 3*cos(2*x) - exp(-x)", "dy/dx = x*y", "dy/dx = x*y + y"] {
        group.bench_function(equation, |b| b.iter(|| solve(black_box(equation))));
    }
    group.finish();
}

fn bench_trajectory(c: &mut Criterion) {
    let rhs = match Expr::parse_expression("sin(x) * y - x^2") {
        Ok(rhs) => rhs,
        Err(e) => panic!("{}", e),
    };
    let f = make_derivative_evaluator(&rhs);
    c.bench_function("trajectory 2x160 steps", |b| {
        b.iter(|| sample_trajectory(&f, black_box(0.0), black_box(1.0), 4.0, DEFAULT_STEPS))
    });
}

criterion_group!(benches, bench_solve, bench_trajectory);
criterion_main!(benches);

use crate::Utils::logger::save_trajectory_to_file;
use crate::numerical::RK4_trajectory::{DEFAULT_STEPS, sample_trajectory};
use crate::ode_solver::ode_task::OdeTask;
use crate::ode_solver::solve_api::{Status, solve};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::make_derivative_evaluator;
use itertools::Itertools;

/// prints the derivation trail and the outcome of `solve`
pub fn print_solution(equation: &str) {
    let result = solve(equation);
    println!("{}", equation);
    if let Some(classification) = &result.classification {
        println!("classification: {}", classification);
    }
    println!("{}", result.steps.iter().join("\n"));
    match result.status {
        Status::Ok => println!(
            "solution ({}): {}",
            result.form.map(|f| f.to_string()).unwrap_or_default(),
            result.final_solution_text.unwrap_or_default()
        ),
        Status::Unsupported | Status::Error => {
            println!("{}: {}", result.status, result.message.unwrap_or_default())
        }
    }
    println!();
}

#[allow(dead_code)]
pub fn ode_examples(example: usize) {
    match example {
        0 => {
            // one equation of every family plus the failures
            for equation in [
                "dy/dx = 2*x",
                "dy/dx = 3*cos(2*x) - exp(-x)",
                "dy/dx = x*y",
                "dy/dx = x/y",
                "dy/dx = x*y + y",
                "dy/dx = x + y",
                "dy/dx = y^2 + x",
                "dy/dx = x*exp(x)",
                "dy/dx = x +",
            ] {
                print_solution(equation);
            }
        }
        1 => {
            // the symbolic layer on its own
            let f = match Expr::parse_expression("2*x*exp(x^2) + 1/(3*x - 1)") {
                Ok(f) => f,
                Err(e) => {
                    println!("{}", e);
                    return;
                }
            };
            println!("f = {}, simplified: {}", f, f.simplify());
            for term in ["1/(3*x - 1)", "sin(2*x + 1)", "x^-2", "x*exp(x)"] {
                match Expr::parse_expression(term).map(|t| t.integrate("x")) {
                    Ok(Ok(integral)) => println!("∫({}) dx = {}", term, integral),
                    Ok(Err(e)) => println!("{}", e),
                    Err(e) => println!("{}", e),
                }
            }
            let f_xy = f.lambdify_xy();
            println!("f(1, 0) = {}", f_xy(1.0, 0.0));
        }
        2 => {
            // numeric curve of an equation with no closed form through (0, 0.5)
            let result = solve("dy/dx = y^2 - x");
            let Some(rhs) = result.rhs else {
                println!("{:?}", result.message);
                return;
            };
            let f = make_derivative_evaluator(&rhs);
            let trajectory = sample_trajectory(&f, 0.0, 0.5, 2.0, DEFAULT_STEPS);
            let points = trajectory.points();
            println!(
                "{} points, x from {} to {}",
                points.len(),
                points.first().map(|p| p.x).unwrap_or(f64::NAN),
                points.last().map(|p| p.x).unwrap_or(f64::NAN)
            );
            if let Err(e) = save_trajectory_to_file(&points, "riccati_trajectory.txt") {
                println!("cannot save trajectory: {}", e);
            }
        }
        3 => {
            // the same run described by a task document
            let document = r#"
            equation
              text: dy/dx = -2*x*y
            initial
              x0: 0.0
              y0: 1.0
            sampler
              span: 3.0
              steps: 120
            output
              loglevel: info
              csv: gaussian.csv
            "#;
            match OdeTask::parse(document).and_then(|task| task.run()) {
                Ok(report) => {
                    println!("{}", report.result.steps.iter().join("\n"));
                    println!("{:?}", report.result.final_solution_text);
                }
                Err(e) => println!("task failed: {}", e),
            }
        }
        _ => {
            println!("no such example: {}", example);
        }
    }
}

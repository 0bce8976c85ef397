#![allow(non_snake_case)]
use RustedODE::Examples::ode_examples::ode_examples;
use RustedODE::ode_solver::ode_task::OdeTask;
use itertools::Itertools;
use std::path::Path;

/// `RustedODE "dy/dx = x*y"` solves one equation, `RustedODE task.txt` runs a task document,
/// without arguments the built-in example runs.
fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        let example = 0;
        ode_examples(example);
        return;
    }
    let input = args.iter().join(" ");
    let task = if Path::new(&input).is_file() {
        OdeTask::from_file(&input)
    } else {
        Ok(OdeTask::new(&input))
    };
    let report = match task.and_then(|task| task.run()) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let result = report.result;
    if let Some(equation) = &result.normalized_equation {
        println!("{}", equation);
    }
    println!("{}", result.steps.iter().join("\n"));
    match (&result.final_solution_text, &result.message) {
        (Some(solution), _) => println!("{}", solution),
        (None, Some(message)) => println!("{}: {}", result.status, message),
        (None, None) => {}
    }
    if let Some(trajectory) = report.trajectory {
        println!("sampled {} points", trajectory.points().len());
    }
}

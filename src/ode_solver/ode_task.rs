//! A task document describes one run: the equation, the initial point of the sampled curve,
//! the sampler settings and where the output goes.
//! ```text
//! equation
//!   text: dy/dx = x*y
//! initial
//!   x0: 0.0
//!   y0: 1.0
//! sampler
//!   span: 4.0
//!   steps: 160
//! output
//!   loglevel: info
//!   csv: trajectory.csv
//! ```
//! Only `equation.text` is required.
use crate::Utils::logger::{init_logger, level_from_str, save_trajectory_to_csv};
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document_as};
use crate::numerical::RK4_trajectory::{DEFAULT_STEPS, MAX_STEPS, Trajectory, sample_trajectory};
use crate::ode_solver::solve_api::{SolveResult, Status, solve};
use crate::symbolic::symbolic_lambdify::make_derivative_evaluator;
use log::info;

#[derive(Debug, Clone, PartialEq)]
pub struct OdeTask {
    pub equation: String,
    pub x0: f64,
    pub y0: f64,
    pub span: f64,
    pub steps: usize,
    pub loglevel: Option<String>,
    pub csv: Option<String>,
}

/// What a run produced; no trajectory for equations that failed to parse.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub result: SolveResult,
    pub trajectory: Option<Trajectory>,
}

fn template() -> DocumentMap {
    let sections: [(&str, &[&str]); 4] = [
        ("equation", &["text"]),
        ("initial", &["x0", "y0"]),
        ("sampler", &["span", "steps"]),
        ("output", &["loglevel", "csv"]),
    ];
    sections
        .iter()
        .map(|(title, keys)| {
            let section: SectionMap = keys.iter().map(|key| (key.to_string(), None)).collect();
            (title.to_string(), section)
        })
        .collect()
}

/// the single value of `title.key`, None if absent
fn single<'a>(doc: &'a DocumentMap, title: &str, key: &str) -> Result<Option<&'a Value>, String> {
    match doc.get(title).and_then(|section| section.get(key)) {
        Some(Some(values)) => match values.as_slice() {
            [value] => Ok(Some(value)),
            [] => Ok(None),
            _ => Err(format!("{}.{} expects a single value", title, key)),
        },
        _ => Ok(None),
    }
}

fn float_or(doc: &DocumentMap, title: &str, key: &str, default: f64) -> Result<f64, String> {
    match single(doc, title, key)? {
        None => Ok(default),
        Some(value) => value
            .as_float()
            .ok_or_else(|| format!("{}.{} must be a number, got '{}'", title, key, value)),
    }
}

fn string_opt(doc: &DocumentMap, title: &str, key: &str) -> Result<Option<String>, String> {
    Ok(single(doc, title, key)?.map(|value| value.to_string()))
}

impl Default for OdeTask {
    fn default() -> Self {
        OdeTask {
            equation: String::new(),
            x0: 0.0,
            y0: 1.0,
            span: 4.0,
            steps: DEFAULT_STEPS,
            loglevel: None,
            csv: None,
        }
    }
}

impl OdeTask {
    pub fn new(equation: &str) -> OdeTask {
        OdeTask {
            equation: equation.to_string(),
            ..OdeTask::default()
        }
    }

    pub fn from_document(doc: &DocumentMap) -> Result<OdeTask, String> {
        let defaults = OdeTask::default();
        let equation = string_opt(doc, "equation", "text")?
            .ok_or_else(|| "equation.text is required".to_string())?;
        let steps = match single(doc, "sampler", "steps")? {
            None => defaults.steps,
            Some(value) => match value.as_integer() {
                Some(n) if n > 0 && n as u64 <= MAX_STEPS as u64 => n as usize,
                _ => {
                    return Err(format!(
                        "sampler.steps must be an integer from 1 to {}, got '{}'",
                        MAX_STEPS, value
                    ));
                }
            },
        };
        let loglevel = string_opt(doc, "output", "loglevel")?;
        level_from_str(loglevel.as_deref())?;
        Ok(OdeTask {
            equation,
            x0: float_or(doc, "initial", "x0", defaults.x0)?,
            y0: float_or(doc, "initial", "y0", defaults.y0)?,
            span: float_or(doc, "sampler", "span", defaults.span)?,
            steps,
            loglevel,
            csv: string_opt(doc, "output", "csv")?,
        })
    }

    /// parses the task document text
    pub fn parse(input: &str) -> Result<OdeTask, String> {
        let doc = parse_document_as(input, Some(&template()))?;
        OdeTask::from_document(&doc)
    }

    pub fn from_file(path: &str) -> Result<OdeTask, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read task file {}: {}", path, e))?;
        OdeTask::parse(&contents)
    }

    /// Solves the equation, samples the curve through `(x0, y0)` and writes it to `csv` if set.
    /// Unsupported equations are still sampled, the numeric curve needs no closed form.
    pub fn run(&self) -> Result<TaskReport, String> {
        init_logger(self.loglevel.as_deref())?;
        let result = solve(&self.equation);
        let trajectory = match (&result.status, &result.rhs) {
            (Status::Ok | Status::Unsupported, Some(rhs)) => {
                let f = make_derivative_evaluator(rhs);
                Some(sample_trajectory(&f, self.x0, self.y0, self.span, self.steps))
            }
            _ => None,
        };
        if let (Some(trajectory), Some(csv)) = (&trajectory, &self.csv) {
            save_trajectory_to_csv(&trajectory.points(), csv)
                .map_err(|e| format!("cannot write {}: {}", csv, e))?;
            info!("trajectory written to {}", csv);
        }
        Ok(TaskReport { result, trajectory })
    }
}

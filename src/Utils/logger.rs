use crate::numerical::RK4_trajectory::Point;
use csv::Writer;
use log::info;
use simplelog::*;
use std::fs::File;
use std::io::{self, Write};

/// Level filter from an optional level name; None means "use the default" (info),
/// Some(Off) means logging is disabled.
pub fn level_from_str(loglevel: Option<&str>) -> Result<LevelFilter, String> {
    match loglevel {
        None => Ok(LevelFilter::Info),
        Some(level) => match level.to_lowercase().as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            "off" | "none" => Ok(LevelFilter::Off),
            other => Err(format!(
                "loglevel must be debug, info, warn, error or off, got '{}'",
                other
            )),
        },
    }
}

/// Terminal logger. A second call keeps the first logger, the error from simplelog is ignored.
pub fn init_logger(loglevel: Option<&str>) -> Result<(), String> {
    let log_option = level_from_str(loglevel)?;
    if log_option == LevelFilter::Off {
        return Ok(());
    }
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    if logger_instance.is_ok() {
        info!("logging started with loglevel: {}", log_option);
    }
    Ok(())
}

/// tab separated `x	y` table with a header line
pub fn save_trajectory_to_file(points: &[Point], filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "x\ty")?;
    for point in points {
        writeln!(file, "{}\t{}", point.x, point.y)?;
    }
    Ok(())
}

pub fn save_trajectory_to_csv(points: &[Point], filename: &str) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(["x", "y"])?;
    for point in points {
        writer.write_record(&[point.x.to_string(), point.y.to_string()])?;
    }
    writer.flush()?;
    info!("{} points saved to {}", points.len(), filename);
    Ok(())
}

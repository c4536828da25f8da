use chrono::Local;
use colored::Colorize;
use fern::Dispatch;
use log::LevelFilter;
use std::fs::{create_dir_all, OpenOptions};
use std::path::Path;

/// Initialise the global logger. Diagnostics always go to stdout; a file
/// sink is added only when `log_file_path` is given.
pub fn init_logger(log_level: &str, log_file_path: Option<&str>) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };

    let mut dispatch = Dispatch::new()
        .format(|out, message, record| {
            let level_str = match record.level() {
                log::Level::Error => "ERROR".red(),
                log::Level::Warn => "WARN".yellow(),
                log::Level::Info => "INFO".green(),
                log::Level::Debug => "DEBUG".cyan(),
                log::Level::Trace => "TRACE".normal(),
            };

            out.finish(format_args!(
                "[{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level_str,
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = log_file_path {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.exists() {
                create_dir_all(parent).expect("Failed to create log directory");
            }
        }

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Cannot open log file");
        dispatch = dispatch.chain(log_file);
    }

    dispatch.apply().expect("Failed to initialize logger");
}

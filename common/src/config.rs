use once_cell::sync::OnceCell;
use std::env;

/// Tool-wide settings, loaded once from the environment (optionally seeded
/// from a `.env` file).
#[derive(Debug)]
pub struct Config {
    pub log_level: String,
    /// Optional log file; diagnostics always go to stdout regardless.
    pub log_file: Option<String>,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
            let log_file = env::var("LOG_FILE").ok();

            Config {
                log_level,
                log_file,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}

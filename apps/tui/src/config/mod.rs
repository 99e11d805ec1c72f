use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::filter::FilterKey;
use crate::logging::{logging_config_from_env, LoggingConfig};

/// Backend used when nothing overrides it.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Time between refresh cycles.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(10_000);

/// Upper bound on a single backend request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Log file used while the terminal is owned by the UI
pub const DEFAULT_LOG_FILE: &str = "race-dash.log";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: String,
    pub refresh_interval: Duration,
    pub initial_filter: FilterKey,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads `.env`, then reads overrides from the environment.
    ///
    /// In TUI mode logs default to a file so they do not scribble over the screen.
    pub fn load(headless: bool) -> Self {
        dotenv().ok();

        let mut logging = logging_config_from_env();
        if logging.file.is_none() && !headless {
            logging.file = Some(PathBuf::from(DEFAULT_LOG_FILE));
        }

        Self {
            api_base: get_api_base(),
            refresh_interval: REFRESH_INTERVAL,
            initial_filter: get_initial_filter(),
            logging,
        }
    }
}

/// Gets the backend base URL
pub fn get_api_base() -> String {
    env::var("RACE_DASH_API_BASE")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Gets the filter the races grid opens with
pub fn get_initial_filter() -> FilterKey {
    env::var("RACE_DASH_FILTER").map_or(FilterKey::All, |value| FilterKey::parse(&value))
}

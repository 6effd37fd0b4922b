use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub sweep_on_start: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path = std::env::var("PROGRESS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("progress.sqlite3"));

        let sweep_on_start = std::env::var("PROGRESS_SWEEP_ON_START")
            .ok()
            .and_then(|value| parse_flag(&value))
            .unwrap_or(true);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            sweep_on_start,
            log_level,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

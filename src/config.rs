use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Only needed when the database-backed sequence allocator is used.
    pub database_url: Option<String>,
    pub log_level: String,
    pub run_migrations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            log_level: "info".to_string(),
            run_migrations: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let run_migrations = match env::var("RUN_MIGRATIONS") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| anyhow::anyhow!("RUN_MIGRATIONS must be true or false, got {}", value))?,
            Err(_) => true,
        };

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            log_level: env::var("APP_TRANSFER_LOG").unwrap_or_else(|_| "info".to_string()),
            run_migrations,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

use anyhow::{anyhow, Result};
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/signs.db";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;
const DEFAULT_REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    /// Idle time after which an unfinished statistics flow is dropped.
    pub session_ttl_minutes: i64,
    /// Channels a user must be in to use `/list`. Empty disables the check.
    pub required_channel_ids: Vec<i64>,
    pub report_date_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = database_url_from_env();

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let session_ttl_minutes = match non_empty_var("SESSION_TTL_MINUTES") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| anyhow!("Invalid SESSION_TTL_MINUTES"))?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        let required_channel_ids = match non_empty_var("REQUIRED_CHANNEL_IDS") {
            Some(value) => parse_channel_ids(&value)?,
            None => Vec::new(),
        };

        let report_date_format = non_empty_var("REPORT_DATE_FORMAT")
            .unwrap_or_else(|| DEFAULT_REPORT_DATE_FORMAT.to_string());

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            http_port,
            session_ttl_minutes,
            required_channel_ids,
            report_date_format,
        })
    }
}

/// `DATABASE_URL`, or the default when unset or blank.
pub fn database_url_from_env() -> String {
    non_empty_var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_channel_ids(value: &str) -> Result<Vec<i64>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>()
                .map_err(|_| anyhow!("Invalid REQUIRED_CHANNEL_IDS entry: {}", id))
        })
        .collect()
}

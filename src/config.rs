use std::{env, time::Duration};

use crate::error::{BoardError, BoardResult};

pub static CACHE_DURATION: Duration = Duration::new(3600, 0); // 1 hour

pub const DEFAULT_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_BASE: &str = "CNY";
pub const DEFAULT_AMOUNT: f64 = 100.0;
pub const MIN_AMOUNT: f64 = 1.0;
pub const DEFAULT_EXPORT_FILE: &str = "exchange_rates.csv";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Endpoint settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub base: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base: DEFAULT_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> BoardResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BoardResult<Self> {
        let mut config = Config::default();

        if let Some(url) = lookup("RATES_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(base) = lookup("RATES_BASE") {
            config.base = normalize_code(&base)?;
        }
        if let Some(secs) = lookup("RATES_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| BoardError::Config(format!("RATES_TIMEOUT_SECS={}", secs)))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Upper-cases a currency code and checks it is three ASCII letters.
pub fn normalize_code(raw: &str) -> BoardResult<String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(BoardError::Config(format!("invalid currency code: {}", raw)))
    }
}

// src/utils/config.rs
use std::time::Duration;

use crate::utils::error::AppError;

pub const DEFAULT_API_BASE: &str = "https://api.congress.gov/v3";
pub const DEFAULT_USER_AGENT: &str = concat!("bill_sections/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Structural headings that end a section body in flattened bill text.
pub const DEFAULT_BOUNDARY_KEYWORDS: &[&str] = &["TITLE", "DIVISION"];

const ENV_API_KEY: &str = "CONGRESS_API_KEY";
const ENV_API_BASE: &str = "CONGRESS_API_BASE";
const ENV_USER_AGENT: &str = "BILL_SECTIONS_USER_AGENT";
const ENV_TIMEOUT_SECS: &str = "BILL_SECTIONS_TIMEOUT_SECS";
const ENV_BOUNDARY_KEYWORDS: &str = "BILL_SECTIONS_BOUNDARY_KEYWORDS";

/// Runtime configuration for the upstream client and the text segmenter.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub api_key: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub boundary_keywords: Vec<String>,
}

/// Values supplied on the command line; each one wins over its env var.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: Option<u64>,
    pub boundary_keywords: Vec<String>,
}

impl Config {
    /// Builds the configuration from the process environment plus CLI overrides.
    pub fn load(overrides: Overrides) -> Result<Self, AppError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    fn resolve<F>(overrides: Overrides, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let api_key = non_blank(overrides.api_key)
            .or_else(|| non_blank(lookup(ENV_API_KEY)))
            .ok_or_else(|| {
                AppError::Config(format!("an API key is required (--api-key or {})", ENV_API_KEY))
            })?;

        let api_base = non_blank(overrides.api_base)
            .or_else(|| non_blank(lookup(ENV_API_BASE)))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let user_agent = non_blank(overrides.user_agent)
            .or_else(|| non_blank(lookup(ENV_USER_AGENT)))
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match non_blank(lookup(ENV_TIMEOUT_SECS)) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    AppError::Config(format!("{} must be a whole number of seconds, got '{}'", ENV_TIMEOUT_SECS, raw))
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err(AppError::Config("request timeout must be at least one second".to_string()));
        }

        let boundary_keywords = if !overrides.boundary_keywords.is_empty() {
            overrides.boundary_keywords
        } else if let Some(raw) = non_blank(lookup(ENV_BOUNDARY_KEYWORDS)) {
            raw.split(',').map(str::trim).filter(|k| !k.is_empty()).map(String::from).collect()
        } else {
            DEFAULT_BOUNDARY_KEYWORDS.iter().map(|k| k.to_string()).collect()
        };

        tracing::debug!("Resolved API base {} with timeout {}s", api_base, timeout_secs);

        Ok(Self {
            api_base,
            api_key,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
            boundary_keywords,
        })
    }
}

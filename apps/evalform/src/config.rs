use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_INVITE_BASE_URL: &str = "https://wa.me";
const DEFAULT_INVITE_LOCATION_URL: &str = "https://share.google/CAX5a6oB5OS5skyAU";

/// Application configuration loaded from environment variables.
/// Startup fails if the spreadsheet endpoint is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub sheet_endpoint_url: String,
    pub submit_timeout: Duration,
    pub max_resume_bytes: usize,
    pub criteria_file: Option<PathBuf>,
    pub invite_base_url: String,
    pub invite_location_url: String,
    pub form_defaults: FormDefaults,
    pub port: u16,
    pub rust_log: String,
}

/// Values a fresh (or reset) session starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDefaults {
    pub position: String,
    pub interviewer: String,
    pub notice_period: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let sheet_endpoint_url = require_env("SHEET_ENDPOINT_URL")?;
        validate_endpoint(&sheet_endpoint_url)?;

        Ok(Config {
            sheet_endpoint_url,
            submit_timeout: Duration::from_secs(
                parse_env("SUBMIT_TIMEOUT_SECS", DEFAULT_SUBMIT_TIMEOUT_SECS)
                    .context("SUBMIT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_resume_bytes: parse_env("MAX_RESUME_BYTES", DEFAULT_MAX_RESUME_BYTES)
                .context("MAX_RESUME_BYTES must be a byte count")?,
            criteria_file: std::env::var("CRITERIA_FILE").ok().map(PathBuf::from),
            invite_base_url: std::env::var("INVITE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_INVITE_BASE_URL.to_string()),
            invite_location_url: std::env::var("INVITE_LOCATION_URL")
                .unwrap_or_else(|_| DEFAULT_INVITE_LOCATION_URL.to_string()),
            form_defaults: FormDefaults {
                position: std::env::var("DEFAULT_POSITION").unwrap_or_default(),
                interviewer: std::env::var("DEFAULT_INTERVIEWER").unwrap_or_default(),
                notice_period: std::env::var("DEFAULT_NOTICE_PERIOD").unwrap_or_default(),
            },
            port: parse_env("PORT", 8080_u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}

/// The endpoint must be an absolute http(s) URL; anything else would make
/// every submission go nowhere.
fn validate_endpoint(raw: &str) -> Result<()> {
    let url = reqwest::Url::parse(raw.trim())
        .with_context(|| format!("SHEET_ENDPOINT_URL is not a valid URL: '{raw}'"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("SHEET_ENDPOINT_URL must use http or https, got '{}'", url.scheme());
    }
    Ok(())
}

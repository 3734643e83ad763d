use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::resume::ResumeFormat;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
/// Upper bound for a single backend round trip. The backend gives no guidance,
/// so this only guards against a request that never settles.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
/// Built once in `main` and handed to every consumer by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub accepted_formats: Vec<ResumeFormat>,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            accepted_formats: vec![ResumeFormat::Pdf, ResumeFormat::Docx],
            output_dir: PathBuf::from("."),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let api_base_url = optional_env("ATS_API_BASE_URL")
            .map(|url| normalize_base_url(&url))
            .unwrap_or(defaults.api_base_url);

        let request_timeout = match optional_env("ATS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("ATS_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.request_timeout,
        };

        let accepted_formats = match optional_env("ATS_ACCEPTED_TYPES") {
            Some(raw) => parse_accepted_formats(&raw)?,
            None => defaults.accepted_formats,
        };

        Ok(Config {
            api_base_url,
            request_timeout,
            accepted_formats,
            output_dir: optional_env("ATS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

/// Parses a comma-separated allow-list such as `pdf,docx` or full MIME strings.
pub fn parse_accepted_formats(raw: &str) -> Result<Vec<ResumeFormat>> {
    let mut formats = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let format = ResumeFormat::from_token(token)
            .with_context(|| format!("ATS_ACCEPTED_TYPES contains unknown type '{token}'"))?;
        if !formats.contains(&format) {
            formats.push(format);
        }
    }
    if formats.is_empty() {
        anyhow::bail!("ATS_ACCEPTED_TYPES must name at least one file type");
    }
    Ok(formats)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

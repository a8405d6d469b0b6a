use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if `OPENAI_API_KEY` is missing or a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub gpt_model: String,
    pub openai_base_url: String,
    pub log_level: String,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub port: u16,
    pub tesseract_path: String,
    pub ocr_language: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'OPENAI_API_KEY' is not set")?;

        let port = var("PORT", "8000")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let max_upload_mb = var("MAX_UPLOAD_MB", "25")
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;

        Ok(Config {
            openai_api_key,
            gpt_model: var("GPT_MODEL", DEFAULT_MODEL),
            openai_base_url: var("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            log_level: var("LOG_LEVEL", "info").to_lowercase(),
            cors_origins: parse_origins(&var("CORS_ORIGINS", "*")),
            port,
            tesseract_path: var("TESSERACT_PATH", "tesseract"),
            ocr_language: var("OCR_LANGUAGE", "eng"),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

/// Comma-separated origins. A `*` entry allows any origin and yields an empty list.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins = raw
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect::<Vec<_>>();

    if origins.iter().any(|origin| origin == "*") {
        Vec::new()
    } else {
        origins
    }
}

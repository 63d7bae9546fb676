use anyhow::{Context, Result};

use crate::screening::prompts::SCREENING_PROMPT_TEMPLATE;

/// Application configuration loaded from environment variables.
/// Panics at startup if required variables are missing.
///
/// The prompt template is part of the configuration: it is resolved exactly
/// once here (compiled-in default, or the file named by `PROMPT_TEMPLATE_PATH`)
/// and passed by reference into the prompt builder. Business logic never
/// reaches for a global to find it.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub prompt_template: String,
    pub llm_max_concurrency: usize,
    pub screening_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:generateContent";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let prompt_template = match std::env::var("PROMPT_TEMPLATE_PATH") {
            Ok(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt template from '{path}'"))?,
            Err(_) => SCREENING_PROMPT_TEMPLATE.to_string(),
        };

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
            prompt_template,
            llm_max_concurrency: std::env::var("LLM_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .context("LLM_MAX_CONCURRENCY must be a positive integer")?,
            screening_timeout_secs: std::env::var("SCREENING_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("SCREENING_TIMEOUT_SECS must be a number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::curation::curator::{DEFAULT_AI_TIMEOUT, DEFAULT_MAX_AI_FAILURES};
use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Application configuration loaded from environment variables.
/// Everything is optional; a missing LLM key disables the AI tier and a missing
/// `DATABASE_URL` selects the in-memory store.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub max_ai_failures: u32,
    pub enable_search_fallback: bool,
    pub search_timeout: Duration,
    pub github_token: Option<String>,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            llm_api_key: None,
            llm_api_base: DEFAULT_API_BASE.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_timeout: DEFAULT_AI_TIMEOUT,
            max_ai_failures: DEFAULT_MAX_AI_FAILURES,
            enable_search_fallback: false,
            search_timeout: Duration::from_secs(10),
            github_token: None,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        Ok(Config {
            database_url: var("DATABASE_URL"),
            llm_api_key: var("LLM_API_KEY").or_else(|| var("OPENROUTER_API_KEY")),
            llm_api_base: var("LLM_API_BASE").unwrap_or(defaults.llm_api_base),
            llm_model: var("LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_timeout: parse_var::<u64>(&var, "LLM_TIMEOUT_SECS")?
                .map_or(defaults.llm_timeout, Duration::from_secs),
            max_ai_failures: parse_var(&var, "MAX_AI_FAILURES")?
                .unwrap_or(defaults.max_ai_failures),
            enable_search_fallback: parse_flag(&var, "ENABLE_SEARCH_FALLBACK")?
                .unwrap_or(defaults.enable_search_fallback),
            search_timeout: parse_var::<u64>(&var, "SEARCH_TIMEOUT_SECS")?
                .map_or(defaults.search_timeout, Duration::from_secs),
            github_token: var("GITHUB_TOKEN"),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map_or(defaults.allowed_origins, |v| split_origins(&v)),
            port: parse_var(&var, "PORT")?.unwrap_or(defaults.port),
            rust_log: var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
        })
        .transpose()
}

fn parse_flag(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<bool>> {
    var(key)
        .map(|raw| match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("Environment variable '{key}' must be a boolean, got '{raw}'"),
        })
        .transpose()
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

use anyhow::{Context, Result};

const DEFAULT_INFERENCE_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";
const DEFAULT_READER_PROXY_URL: &str = "https://r.jina.ai/";
const DEFAULT_PORT: &str = "8787";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub cloudflare_account_id: String,
    pub cloudflare_api_token: String,
    pub inference_base_url: String,
    pub default_model: String,
    pub reader_proxy_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: require_env("REDIS_URL")?,
            cloudflare_account_id: require_env("CLOUDFLARE_ACCOUNT_ID")?,
            cloudflare_api_token: require_env("CLOUDFLARE_API_TOKEN")?,
            inference_base_url: env_or("INFERENCE_BASE_URL", DEFAULT_INFERENCE_BASE_URL),
            default_model: env_or("DEFAULT_MODEL", DEFAULT_MODEL),
            reader_proxy_url: env_or("READER_PROXY_URL", DEFAULT_READER_PROXY_URL),
            port: parse_port(&env_or("PORT", DEFAULT_PORT))?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .with_context(|| format!("PORT must be a valid port number, got '{value}'"))
}

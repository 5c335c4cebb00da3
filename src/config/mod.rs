use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::preview::fetch::DEFAULT_MAX_HTML_BYTES;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_MIN_HTML_LEN: usize = 200;
pub const DEFAULT_MIRROR_BASE_URL: &str = "https://r.jina.ai/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    /// Upper bound for each outbound fetch, body download included.
    pub fetch_timeout: Duration,
    /// Trimmed HTML shorter than this is treated as "no content".
    pub min_html_len: usize,
    /// Response bodies are cut off after this many bytes.
    pub max_html_bytes: usize,
    /// Always ends with `/`; the target is appended as `http://<host-and-path>`.
    pub mirror_base_url: String,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server_port = parse_number("SERVER_PORT", 8080u16)?;
        let timeout_secs = parse_number("PREVIEW_FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Zero {
                key: "PREVIEW_FETCH_TIMEOUT_SECS",
            });
        }

        let mut mirror_base_url = env::var("PREVIEW_MIRROR_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIRROR_BASE_URL.to_string());
        if !mirror_base_url.ends_with('/') {
            mirror_base_url.push('/');
        }

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            fetch_timeout: Duration::from_secs(timeout_secs),
            min_html_len: parse_number("PREVIEW_MIN_HTML_LEN", DEFAULT_MIN_HTML_LEN)?,
            max_html_bytes: parse_number("PREVIEW_MAX_HTML_BYTES", DEFAULT_MAX_HTML_BYTES)?,
            mirror_base_url,
            user_agent: env::var("PREVIEW_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            is_dev: true,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            min_html_len: DEFAULT_MIN_HTML_LEN,
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
            mirror_base_url: DEFAULT_MIRROR_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}

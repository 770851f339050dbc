use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Ollama endpoint used when `OLLAMA_URL` is not provided.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Upper bound on the cleaned document length accepted at ingestion.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 100_000;
/// Word budget applied to normalized summaries.
pub const DEFAULT_SUMMARY_WORD_TARGET: usize = 600;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Paper Digest service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Model identifier passed to the generation backend.
    pub generator_model: String,
    /// Base URL of the Ollama runtime.
    pub ollama_url: String,
    /// Optional HTTP timeout applied to each generation call.
    pub generator_timeout_secs: Option<u64>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Maximum number of characters kept from an ingested document.
    pub max_document_chars: usize,
    /// Word budget for the normalized summary.
    pub summary_word_target: usize,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            generator_model: load_env("GENERATOR_MODEL")?,
            ollama_url: load_env_optional("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            generator_timeout_secs: parse_optional("GENERATOR_TIMEOUT_SECS")?,
            server_port: parse_optional("SERVER_PORT")?,
            max_document_chars: parse_optional("MAX_DOCUMENT_CHARS")?
                .unwrap_or(DEFAULT_MAX_DOCUMENT_CHARS),
            summary_word_target: parse_optional("SUMMARY_WORD_TARGET")?
                .unwrap_or(DEFAULT_SUMMARY_WORD_TARGET),
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        generator_model = %config.generator_model,
        ollama_url = %config.ollama_url,
        timeout_secs = ?config.generator_timeout_secs,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

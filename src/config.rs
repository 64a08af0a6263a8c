//! Process configuration.
//!
//! DESIGN
//! ======
//! Built once in `main` from the environment (after `.env` is loaded) and
//! handed to the constructors that need it. Nothing reads the environment
//! after startup.

use axum::http::HeaderValue;

use crate::diagram::PipelineSettings;
use crate::diagram::pipeline::DEFAULT_MAX_DESCRIPTION_CHARS;
use crate::error::ErrorCode;
use crate::llm::config::LlmConfig;
use crate::llm::types::LlmError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "E_CONFIG_INVALID",
            Self::Llm(e) => e.error_code(),
        }
    }
}

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    Origins(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsPolicy,
    pub pipeline: PipelineSettings,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Read every setting the service needs.
    ///
    /// - `HOST` (default `0.0.0.0`), `PORT` (default 8000)
    /// - `CORS_ALLOWED_ORIGINS`: `*` (default) or comma-separated origins
    /// - `DIAGRAM_MAX_DESCRIPTION_CHARS` (default 8000)
    /// - `LLM_*` variables, see [`LlmConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for any missing or unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let cors = parse_cors(std::env::var("CORS_ALLOWED_ORIGINS").ok().as_deref())?;
        let pipeline = PipelineSettings {
            max_description_chars: parse_max_description_chars(
                std::env::var("DIAGRAM_MAX_DESCRIPTION_CHARS").ok().as_deref(),
            )?,
        };
        let llm = LlmConfig::from_env()?;
        Ok(Self { host, port, cors, pipeline, llm })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PORT);
    };
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw.to_string() })
}

fn parse_max_description_chars(raw: Option<&str>) -> Result<usize, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MAX_DESCRIPTION_CHARS);
    };
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::Invalid { key: "DIAGRAM_MAX_DESCRIPTION_CHARS", value: raw.to_string() }),
        Ok(n) => Ok(n),
    }
}

fn parse_cors(raw: Option<&str>) -> Result<CorsPolicy, ConfigError> {
    let raw = raw.map(str::trim).unwrap_or("*");
    if raw.is_empty() || raw.split(',').any(|origin| origin.trim() == "*") {
        return Ok(CorsPolicy::AnyOrigin);
    }
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::Invalid { key: "CORS_ALLOWED_ORIGINS", value: origin.to_string() })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsPolicy::Origins(origins))
}

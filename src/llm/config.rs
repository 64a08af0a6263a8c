//! LLM configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Low temperature keeps the model close to the required markup grammar.
pub const DEFAULT_LLM_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
    Anthropic,
    OpenAi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiApiMode {
    ChatCompletions,
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    pub api_key: String,
    pub model: String,
    pub sampling: Sampling,
    pub openai_mode: OpenAiApiMode,
    pub openai_base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Optional:
    /// - `LLM_PROVIDER`: `openai` (default) or `anthropic`
    /// - `LLM_API_KEY_ENV`: names the env var containing the key
    ///   (`OPENAI_API_KEY` / `ANTHROPIC_API_KEY` by provider)
    /// - `LLM_MODEL`: provider default when absent
    /// - `LLM_TEMPERATURE`: default 0.1, within `0.0..=2.0`
    /// - `LLM_MAX_TOKENS`: default 2048, non-zero
    /// - `LLM_OPENAI_MODE`: `chat_completions` (default) or `responses`
    /// - `LLM_OPENAI_BASE_URL`: default OpenAI API base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120, non-zero
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10, non-zero
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the key variable is unset and
    /// [`LlmError::ConfigParse`] for any value that does not parse.
    pub fn from_env() -> Result<Self, LlmError> {
        let provider = parse_provider(std::env::var("LLM_PROVIDER").ok().as_deref())?;

        let key_var = std::env::var("LLM_API_KEY_ENV").unwrap_or_else(|_| default_key_var(provider).to_string());
        let api_key = std::env::var(&key_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey { var: key_var.clone() })?;

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| default_model(provider).to_string());
        let sampling = Sampling {
            temperature: parse_temperature(std::env::var("LLM_TEMPERATURE").ok().as_deref())?,
            max_tokens: parse_max_tokens(std::env::var("LLM_MAX_TOKENS").ok().as_deref())?,
        };
        let openai_mode = parse_openai_mode(std::env::var("LLM_OPENAI_MODE").ok().as_deref())?;
        let openai_base_url = std::env::var("LLM_OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request_secs: parse_timeout_secs(
                "LLM_REQUEST_TIMEOUT_SECS",
                std::env::var("LLM_REQUEST_TIMEOUT_SECS").ok().as_deref(),
                DEFAULT_LLM_REQUEST_TIMEOUT_SECS,
            )?,
            connect_secs: parse_timeout_secs(
                "LLM_CONNECT_TIMEOUT_SECS",
                std::env::var("LLM_CONNECT_TIMEOUT_SECS").ok().as_deref(),
                DEFAULT_LLM_CONNECT_TIMEOUT_SECS,
            )?,
        };

        Ok(Self { provider, api_key, model, sampling, openai_mode, openai_base_url, timeouts })
    }
}

/// A zero timeout would fail every request, so it is rejected with garbage.
fn parse_timeout_secs(key: &str, raw: Option<&str>, default: u64) -> Result<u64, LlmError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(LlmError::ConfigParse(format!("invalid {key}: {raw}"))),
        Ok(n) => Ok(n),
    }
}

fn parse_provider(raw: Option<&str>) -> Result<LlmProviderKind, LlmError> {
    match raw.unwrap_or("openai") {
        "anthropic" => Ok(LlmProviderKind::Anthropic),
        "openai" => Ok(LlmProviderKind::OpenAi),
        other => Err(LlmError::ConfigParse(format!("unknown LLM_PROVIDER: {other}"))),
    }
}

fn parse_openai_mode(raw: Option<&str>) -> Result<OpenAiApiMode, LlmError> {
    match raw.unwrap_or("chat_completions") {
        "responses" => Ok(OpenAiApiMode::Responses),
        "chat_completions" => Ok(OpenAiApiMode::ChatCompletions),
        other => Err(LlmError::ConfigParse(format!(
            "unsupported openai_api mode '{other}' (expected 'responses' or 'chat_completions')"
        ))),
    }
}

fn parse_temperature(raw: Option<&str>) -> Result<f64, LlmError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LLM_TEMPERATURE);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| LlmError::ConfigParse(format!("invalid LLM_TEMPERATURE: {raw}")))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(LlmError::ConfigParse(format!("LLM_TEMPERATURE out of range 0.0..=2.0: {value}")));
    }
    Ok(value)
}

fn parse_max_tokens(raw: Option<&str>) -> Result<u32, LlmError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_LLM_MAX_TOKENS);
    };
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(LlmError::ConfigParse(format!("invalid LLM_MAX_TOKENS: {raw}"))),
        Ok(n) => Ok(n),
    }
}

fn default_key_var(provider: LlmProviderKind) -> &'static str {
    match provider {
        LlmProviderKind::Anthropic => "ANTHROPIC_API_KEY",
        LlmProviderKind::OpenAi => "OPENAI_API_KEY",
    }
}

fn default_model(provider: LlmProviderKind) -> &'static str {
    match provider {
        LlmProviderKind::Anthropic => "claude-sonnet-4-5-20250929",
        LlmProviderKind::OpenAi => "gpt-4",
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use super::*;
use std::sync::{Mutex, MutexGuard};

/// Serializes tests that mutate the `LLM_*` environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const LLM_VARS: &[&str] = &[
    "LLM_PROVIDER",
    "LLM_MODEL",
    "LLM_API_KEY_ENV",
    "LLM_TEMPERATURE",
    "LLM_MAX_TOKENS",
    "LLM_OPENAI_MODE",
    "LLM_OPENAI_BASE_URL",
    "LLM_REQUEST_TIMEOUT_SECS",
    "LLM_CONNECT_TIMEOUT_SECS",
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "RIPPLE_TEST_KEY",
];

fn lock_clean_env() -> MutexGuard<'static, ()> {
    let guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    // SAFETY: every test touching these variables holds ENV_LOCK.
    unsafe {
        for var in LLM_VARS {
            std::env::remove_var(var);
        }
    }
    guard
}

fn set(key: &str, value: &str) {
    // SAFETY: callers hold ENV_LOCK.
    unsafe { std::env::set_var(key, value) };
}

#[test]
fn from_env_defaults_to_openai() {
    let _guard = lock_clean_env();
    set("OPENAI_API_KEY", "sk-test");

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::OpenAi);
    assert_eq!(cfg.model, "gpt-4");
    assert_eq!(cfg.api_key, "sk-test");
    assert!((cfg.sampling.temperature - DEFAULT_LLM_TEMPERATURE).abs() < f64::EPSILON);
    assert_eq!(cfg.sampling.max_tokens, DEFAULT_LLM_MAX_TOKENS);
    assert_eq!(cfg.openai_mode, OpenAiApiMode::ChatCompletions);
    assert_eq!(cfg.openai_base_url, DEFAULT_OPENAI_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        LlmTimeouts { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_env_parses_anthropic_overrides() {
    let _guard = lock_clean_env();
    set("LLM_PROVIDER", "anthropic");
    set("LLM_API_KEY_ENV", "RIPPLE_TEST_KEY");
    set("RIPPLE_TEST_KEY", "secret");
    set("LLM_TEMPERATURE", "0.5");
    set("LLM_MAX_TOKENS", "512");
    set("LLM_REQUEST_TIMEOUT_SECS", "42");
    set("LLM_CONNECT_TIMEOUT_SECS", "7");

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Anthropic);
    assert_eq!(cfg.model, "claude-sonnet-4-5-20250929");
    assert_eq!(cfg.api_key, "secret");
    assert!((cfg.sampling.temperature - 0.5).abs() < f64::EPSILON);
    assert_eq!(cfg.sampling.max_tokens, 512);
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_env_trims_base_url_and_reads_mode() {
    let _guard = lock_clean_env();
    set("OPENAI_API_KEY", "sk-test");
    set("LLM_OPENAI_MODE", "responses");
    set("LLM_OPENAI_BASE_URL", "https://example.test/v1/");
    set("LLM_MODEL", "gpt-4o-mini");

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.openai_mode, OpenAiApiMode::Responses);
    assert_eq!(cfg.openai_base_url, "https://example.test/v1");
    assert_eq!(cfg.model, "gpt-4o-mini");
}

#[test]
fn from_env_missing_key_names_the_variable() {
    let _guard = lock_clean_env();

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "OPENAI_API_KEY"));
}

#[test]
fn from_env_blank_key_is_missing() {
    let _guard = lock_clean_env();
    set("OPENAI_API_KEY", "   ");

    assert!(matches!(LlmConfig::from_env(), Err(LlmError::MissingApiKey { .. })));
}

#[test]
fn from_env_unknown_provider_errors() {
    let _guard = lock_clean_env();
    set("LLM_PROVIDER", "bad");
    set("OPENAI_API_KEY", "sk-test");

    let err = LlmConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unknown LLM_PROVIDER"));
}

#[test]
fn from_env_rejects_unparsable_request_timeout() {
    let _guard = lock_clean_env();
    set("OPENAI_API_KEY", "sk-test");
    set("LLM_REQUEST_TIMEOUT_SECS", "abc");

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(ref m) if m.contains("LLM_REQUEST_TIMEOUT_SECS")));
}

#[test]
fn from_env_rejects_zero_connect_timeout() {
    let _guard = lock_clean_env();
    set("OPENAI_API_KEY", "sk-test");
    set("LLM_CONNECT_TIMEOUT_SECS", "0");

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::ConfigParse(ref m) if m.contains("LLM_CONNECT_TIMEOUT_SECS")));
}

#[test]
fn parse_timeout_secs_defaults_and_bounds() {
    assert_eq!(parse_timeout_secs("T", None, 120).unwrap(), 120);
    assert_eq!(parse_timeout_secs("T", Some(" 30 "), 120).unwrap(), 30);
    assert!(parse_timeout_secs("T", Some("0"), 120).is_err());
    assert!(parse_timeout_secs("T", Some("-1"), 120).is_err());
    assert!(parse_timeout_secs("T", Some("soon"), 120).is_err());
}

#[test]
fn parse_openai_mode_rejects_unknown() {
    let err = parse_openai_mode(Some("bad_mode")).unwrap_err().to_string();
    assert!(err.contains("unsupported openai_api mode"));
}

#[test]
fn parse_temperature_bounds() {
    assert!((parse_temperature(None).unwrap() - 0.1).abs() < f64::EPSILON);
    assert!((parse_temperature(Some(" 0 ")).unwrap()).abs() < f64::EPSILON);
    assert!((parse_temperature(Some("2.0")).unwrap() - 2.0).abs() < f64::EPSILON);
    assert!(parse_temperature(Some("2.5")).is_err());
    assert!(parse_temperature(Some("-0.1")).is_err());
    assert!(parse_temperature(Some("warm")).is_err());
}

#[test]
fn parse_max_tokens_rejects_zero_and_garbage() {
    assert_eq!(parse_max_tokens(None).unwrap(), DEFAULT_LLM_MAX_TOKENS);
    assert_eq!(parse_max_tokens(Some("100")).unwrap(), 100);
    assert!(parse_max_tokens(Some("0")).is_err());
    assert!(parse_max_tokens(Some("-5")).is_err());
    assert!(parse_max_tokens(Some("lots")).is_err());
}

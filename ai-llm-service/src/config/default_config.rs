//! Default LLM configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`LlmModelConfig`], grouped by role:
//!
//! - **Chat**      → answer composition and query expansion
//! - **Embedding** → remote embedding generation
//!
//! # Environment variables
//!
//! Common:
//! - `OPENAI_API_KEY`  = API key (mandatory)
//! - `OPENAI_BASE_URL` = API base URL (optional, default `https://api.openai.com`)
//!
//! Chat:
//! - `LLM_MODEL`       = chat model (optional, default `gpt-4o-mini`)
//! - `LLM_TEMPERATURE` = sampling temperature (optional, default `0.0`)
//! - `LLM_MAX_TOKENS`  = optional max tokens (u32)
//!
//! Embedding:
//! - `EMBED_MODEL`     = embedding model (optional, default `text-embedding-3-large`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, env_opt_f32, env_opt_u32, env_or, must_env},
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-large";

/// Constructs a config for the **chat** model.
///
/// # Errors
/// Returns [`crate::ConfigError::MissingVar`] if `OPENAI_API_KEY` is unset,
/// or `InvalidNumber` if a numeric variable fails to parse.
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.or(Some(0.0));
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        model: env_or("LLM_MODEL", DEFAULT_CHAT_MODEL),
        endpoint: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
        api_key: Some(api_key),
        max_tokens,
        temperature,
        top_p: None,
        timeout_secs: Some(60),
    })
}

/// Constructs a config for the **embedding** model.
///
/// # Errors
/// Returns [`crate::ConfigError::MissingVar`] if `OPENAI_API_KEY` is unset.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let api_key = must_env("OPENAI_API_KEY")?;

    Ok(LlmModelConfig {
        model: env_or("EMBED_MODEL", DEFAULT_EMBED_MODEL),
        endpoint: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
        api_key: Some(api_key),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}

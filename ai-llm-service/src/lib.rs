//! Shared LLM client for an OpenAI-compatible API.
//!
//! - Construct [`services::open_ai_service::OpenAiService`] once, wrap it in
//!   `Arc`, and pass clones to dependents.
//! - Chat completions are non-streaming; `chat_json` adds a best-effort JSON
//!   recovery chain on top of the raw reply.
//! - Embeddings are batched and order-preserving (one vector per input).
//! - Configuration is resolved strictly from environment variables via
//!   [`config::default_config`], so backend choice is explicit and testable
//!   by substitution.

pub mod config;
pub mod error_handler;
pub mod json_recovery;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, ConfigError};
pub use services::open_ai_service::{ChatMessage, OpenAiService};

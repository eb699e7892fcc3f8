/// Configuration for an LLM model invocation.
///
/// One struct serves both the chat and the embeddings role; the role is
/// decided by which constructor in [`crate::config::default_config`] built
/// it. Extend as needed to support new parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string (e.g., `"gpt-4o-mini"`,
    /// `"text-embedding-3-large"`).
    pub model: String,

    /// API base URL (e.g., `"https://api.openai.com"`).
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

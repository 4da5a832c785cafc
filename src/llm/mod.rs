//! LLM integration.
//!
//! The coach only needs plain chat completions, so the one concrete backend
//! is an OpenAI-compatible HTTP client. Anything speaking the same
//! `/chat/completions` dialect can be used by pointing `base_url` at it.

pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    if config.model.trim().is_empty() {
        return Err(LlmError::RequestFailed {
            provider: "openai".to_string(),
            reason: "No model configured".to_string(),
        });
    }
    tracing::info!(model = %config.model, base_url = %config.base_url, "Using OpenAI-compatible provider");
    Ok(Arc::new(OpenAiProvider::new(
        config.api_key.clone(),
        &config.model,
        &config.base_url,
    )))
}

//! Multimodal generation providers.
//!
//! A provider takes a prompt, one embedded image and the JSON schema the
//! answer must follow, and returns the model's raw text. Parsing and
//! validating that text is the recipe service's job.

mod fake;
mod gemini;
pub mod json;
mod openai;

pub use fake::FakeProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::{fmt, sync::Arc, time::Duration};
use thiserror::Error;

use crate::{config::Config, image_io::ImagePayload};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider response has no content")]
    MissingContent,

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        Self::RequestFailed(e.to_string())
    }
}

/// One generation call: `submit(prompt, image, schema)`.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a str,
    pub image: &'a ImagePayload,
    pub schema: &'a JsonValue,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync + fmt::Debug {
    /// Run one generation and return the model's text output.
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, ProviderError>;

    /// e.g. "openai", "gemini", "fake".
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Which backend to talk to.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Any OpenAI-compatible `/chat/completions` endpoint (`OpenRouter`, `OpenAI`, ...)
    #[default]
    Openai,
    /// Google Gemini `generateContent`
    Gemini,
    /// Canned answers, no network
    Fake,
}

/// Build the provider selected in the configuration.
///
/// # Errors
///
/// `ProviderError::NotConfigured` if a network provider is selected without an
/// API key or the HTTP client cannot be built.
pub fn create_provider(config: &Config) -> Result<Arc<dyn GenerationProvider>, ProviderError> {
    if config.llm_provider == ProviderKind::Fake {
        return Ok(Arc::new(FakeProvider::default()));
    }

    let token = config
        .llm_api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ProviderError::NotConfigured("LLM API key is not set".into()))?
        .to_string();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.llm_timeout_secs))
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("http client: {e}")))?;

    let base = config.llm_api_base();
    let model = config.llm_model();

    Ok(match config.llm_provider {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(http, base, token, model)),
        _ => Arc::new(OpenAiProvider::new(http, base, token, model)),
    })
}

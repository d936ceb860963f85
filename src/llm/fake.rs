//! Fake provider for tests and offline runs.
//!
//! Returns one canned answer (or one canned failure) for every call and
//! counts how often it was called.

use async_trait::async_trait;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use super::{GenerationProvider, GenerationRequest, ProviderError};

const DEFAULT_RESPONSE: &str = r#"{"hasFood":false,"errorMessage":"The fake provider does not look at photos. Configure a real LLM provider to get recipes."}"#;

#[derive(Debug)]
pub struct FakeProvider {
    response: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::with_response(DEFAULT_RESPONSE)
    }
}

impl FakeProvider {
    /// Always answer with `text`.
    #[must_use]
    pub fn with_response(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always fail as if the provider were unreachable.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of `generate` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt of the most recent call.
    #[must_use]
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl GenerationProvider for FakeProvider {
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(req.prompt.to_string());
        }

        self.response
            .clone()
            .map_err(ProviderError::RequestFailed)
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::ImagePayload;
    use serde_json::json;

    #[tokio::test]
    async fn counts_calls_and_remembers_prompt() {
        let provider = FakeProvider::with_response("{}");
        let image = ImagePayload::parse("data:image/png;base64,AAAA").unwrap();
        let schema = json!({});
        let req = GenerationRequest {
            prompt: "hello",
            image: &image,
            schema: &schema,
        };

        assert_eq!(provider.generate(&req).await.unwrap(), "{}");
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.last_prompt().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn failing_provider_reports_request_failure() {
        let provider = FakeProvider::failing("connection refused");
        let image = ImagePayload::parse("data:image/png;base64,AAAA").unwrap();
        let schema = json!({});
        let err = provider
            .generate(&GenerationRequest {
                prompt: "p",
                image: &image,
                schema: &schema,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::RequestFailed(ref m) if m == "connection refused"));
    }
}

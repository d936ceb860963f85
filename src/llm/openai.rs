use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};

use super::{GenerationProvider, GenerationRequest, ProviderError};

/// OpenAI-compatible chat completions client (`OpenRouter` by default).
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    http: reqwest::Client,
    base: String,
    token: String,
    model: String,
}

impl OpenAiProvider {
    #[must_use]
    pub const fn new(http: reqwest::Client, base: String, token: String, model: String) -> Self {
        Self {
            http,
            base,
            token,
            model,
        }
    }

    fn request_body(&self, req: &GenerationRequest<'_>) -> JsonValue {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": req.prompt },
                        { "type": "image_url", "image_url": { "url": req.image.as_str() } }
                    ]
                }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "recipe_result",
                    "schema": req.schema
                }
            }
        })
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base.trim_end_matches('/'));

        let mut http_req = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&self.request_body(req));

        if !self.token.trim().is_empty() {
            http_req = http_req.bearer_auth(&self.token);
        }

        let resp = http_req.send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text.chars().take(500).collect(),
            });
        }

        let envelope: JsonValue = serde_json::from_str(&text)
            .map_err(|e| ProviderError::RequestFailed(format!("invalid response envelope: {e}")))?;

        envelope
            .pointer("/choices/0/message/content")
            .and_then(JsonValue::as_str)
            .or_else(|| {
                envelope
                    .pointer("/choices/0/text")
                    .and_then(JsonValue::as_str)
            })
            .map(ToString::to_string)
            .ok_or(ProviderError::MissingContent)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::ImagePayload;

    #[test]
    fn body_carries_prompt_image_and_schema() {
        let provider = OpenAiProvider::new(
            reqwest::Client::new(),
            "https://example.test/api/v1/".into(),
            "sk-test".into(),
            "vision-model".into(),
        );
        let image = ImagePayload::parse("data:image/png;base64,AAAA").unwrap();
        let schema = json!({"type": "object"});
        let body = provider.request_body(&GenerationRequest {
            prompt: "cook something",
            image: &image,
            schema: &schema,
        });

        assert_eq!(body["model"], "vision-model");
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["text"], "cook something");
        assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(body["response_format"]["json_schema"]["schema"], schema);
    }
}

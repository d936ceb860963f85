use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{GenerationProvider, GenerationRequest, ProviderError};

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a JsonValue,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GeminiProvider {
    #[must_use]
    pub const fn new(http: reqwest::Client, base: String, api_key: String, model: String) -> Self {
        Self {
            http,
            base,
            api_key,
            model,
        }
    }

    fn request_body<'a>(req: &'a GenerationRequest<'a>) -> GeminiRequest<'a> {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: req.prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: req.image.mime_type(),
                            data: req.image.base64_data(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: req.schema,
            },
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn generate(&self, req: &GenerationRequest<'_>) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base.trim_end_matches('/'),
            self.model
        );

        let resp = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(req))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text.chars().take(500).collect(),
            });
        }

        let body: GeminiResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("invalid response envelope: {e}")))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or(ProviderError::MissingContent)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::ImagePayload;
    use serde_json::json;

    #[test]
    fn inline_data_splits_the_data_uri() {
        let image = ImagePayload::parse("data:image/jpeg;base64,/9j/").unwrap();
        let schema = json!({"type": "object"});
        let req = GenerationRequest {
            prompt: "what can I cook?",
            image: &image,
            schema: &schema,
        };
        let body = serde_json::to_value(GeminiProvider::request_body(&req)).unwrap();

        assert_eq!(
            body["contents"][0]["parts"],
            json!([
                { "text": "what can I cook?" },
                { "inline_data": { "mime_type": "image/jpeg", "data": "/9j/" } }
            ])
        );
        assert_eq!(
            body["generation_config"]["response_mime_type"],
            "application/json"
        );
    }

    #[test]
    fn parses_candidate_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{\"hasFood\":false}"}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let text = parsed.candidates[0].content.as_ref().unwrap().parts[0].text.clone();
        assert_eq!(text.as_deref(), Some("{\"hasFood\":false}"));
    }
}

//! Photo in, validated `RecipeResult` out.

use serde_json::Value as JsonValue;
use std::{fmt, sync::Arc, time::Instant};

use crate::{
    error::RecipeError,
    image_io::ImagePayload,
    llm::{GenerationProvider, GenerationRequest, json::extract_json_object},
    locale::Language,
    models::RecipeResult,
    prompt::PromptTemplate,
};

/// Stateless: every call is one independent provider round trip.
pub struct RecipeService {
    provider: Arc<dyn GenerationProvider>,
    prompt: PromptTemplate,
    validator: jsonschema::Validator,
    language: Language,
}

impl fmt::Debug for RecipeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeService")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_name())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl RecipeService {
    /// # Errors
    ///
    /// Fails if the template's schema is not a valid JSON schema.
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        prompt: PromptTemplate,
        language: Language,
    ) -> anyhow::Result<Self> {
        let validator = jsonschema::validator_for(prompt.schema())
            .map_err(|e| anyhow::anyhow!("invalid recipe schema: {e}"))?;
        Ok(Self {
            provider,
            prompt,
            validator,
            language,
        })
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Ask the provider for a recipe based on `image`.
    ///
    /// Exactly one provider call, no retries.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `image` does not carry an `image/*` type.
    /// - `ProviderFailure` if the provider call fails.
    /// - `SchemaViolation` if the output can't be read as a `RecipeResult`.
    pub async fn generate_recipe(&self, image: &ImagePayload) -> Result<RecipeResult, RecipeError> {
        if !image.is_image() {
            return Err(RecipeError::InvalidInput(format!(
                "not an image: {}",
                image.mime_type()
            )));
        }

        let prompt = self.prompt.render();
        let request = GenerationRequest {
            prompt: &prompt,
            image,
            schema: self.prompt.schema(),
        };

        let started = Instant::now();
        tracing::info!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            image = %image,
            "requesting recipe"
        );

        let raw = self.provider.generate(&request).await.inspect_err(|e| {
            tracing::warn!(
                error = %e,
                elapsed_ms = started.elapsed().as_millis(),
                "provider call failed"
            );
        })?;

        let result = self.parse_output(&raw).inspect_err(|e| {
            let preview: String = raw.chars().take(500).collect();
            tracing::warn!(error = %e, output = %preview, "provider output rejected");
        })?;

        tracing::info!(
            has_food = result.has_food,
            elapsed_ms = started.elapsed().as_millis(),
            "recipe generated"
        );
        Ok(result)
    }

    /// Extract, validate and normalize the provider's text output.
    ///
    /// # Errors
    ///
    /// `SchemaViolation` if there is no JSON object, it doesn't match the
    /// schema, or it claims food without a usable recipe.
    pub fn parse_output(&self, raw: &str) -> Result<RecipeResult, RecipeError> {
        if raw.trim().is_empty() {
            return Err(RecipeError::SchemaViolation("empty output".into()));
        }

        let mut value = extract_json_object(raw)
            .ok_or_else(|| RecipeError::SchemaViolation("no JSON object in output".into()))?;
        drop_nulls(&mut value);

        if !self.validator.is_valid(&value) {
            let msgs: Vec<String> = self
                .validator
                .iter_errors(&value)
                .take(3)
                .map(|err| format!("{} at {}", err, err.instance_path))
                .collect();
            return Err(RecipeError::SchemaViolation(msgs.join("; ")));
        }

        let result: RecipeResult = serde_json::from_value(value)
            .map_err(|e| RecipeError::SchemaViolation(e.to_string()))?;
        self.normalize(result)
    }

    /// Enforce "exactly one of recipe / errorMessage".
    fn normalize(&self, result: RecipeResult) -> Result<RecipeResult, RecipeError> {
        if !result.has_food {
            let message = result
                .error_message
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| self.language.strings().no_food_fallback.to_string());
            return Ok(RecipeResult::no_food(message));
        }

        let Some(mut recipe) = result.recipe else {
            return Err(RecipeError::SchemaViolation(
                "hasFood is true but recipe is missing".into(),
            ));
        };

        recipe.title = recipe.title.trim().to_string();
        recipe.ingredients = non_blank(recipe.ingredients);
        recipe.instructions = non_blank(recipe.instructions);
        recipe.tips = recipe.tips.map(non_blank).filter(|t| !t.is_empty());

        if recipe.title.is_empty() {
            return Err(RecipeError::SchemaViolation("recipe title is empty".into()));
        }
        if recipe.ingredients.is_empty() {
            return Err(RecipeError::SchemaViolation("recipe has no ingredients".into()));
        }
        if recipe.instructions.is_empty() {
            return Err(RecipeError::SchemaViolation("recipe has no instructions".into()));
        }

        Ok(RecipeResult::with_recipe(recipe))
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Models like to send `null` for fields they leave out.
fn drop_nulls(value: &mut JsonValue) {
    if let JsonValue::Object(map) = value {
        map.retain(|_, v| !v.is_null());
        if let Some(recipe) = map.get_mut("recipe") {
            drop_nulls(recipe);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::FakeProvider;
    use crate::models::Recipe;

    const PHOTO: &str = "data:image/png;base64,AAAA";

    fn service_with(provider: Arc<FakeProvider>) -> RecipeService {
        RecipeService::new(provider, PromptTemplate::for_language(Language::En), Language::En)
            .unwrap()
    }

    fn service_answering(text: &str) -> RecipeService {
        service_with(Arc::new(FakeProvider::with_response(text)))
    }

    #[tokio::test]
    async fn returns_recipe_and_calls_provider_once() {
        let provider = Arc::new(FakeProvider::with_response(
            r#"{
                "hasFood": true,
                "recipe": {
                    "title": "Egg Fried Rice",
                    "description": "Leftover rice, reborn.",
                    "ingredients": ["2 cups cooked rice", "2 eggs", "1 tbsp soy sauce"],
                    "instructions": ["Heat the wok.", "Scramble the eggs.", "Add rice and soy sauce."],
                    "tips": ["Day-old rice fries best."]
                }
            }"#,
        ));
        let service = service_with(provider.clone());
        let image = ImagePayload::parse(PHOTO).unwrap();

        let result = service.generate_recipe(&image).await.unwrap();
        assert_eq!(provider.calls(), 1);
        assert!(result.has_food);
        assert!(result.error_message.is_none());
        let recipe = result.recipe.unwrap();
        assert_eq!(recipe.title, "Egg Fried Rice");
        assert_eq!(
            recipe.instructions,
            vec!["Heat the wok.", "Scramble the eggs.", "Add rice and soy sauce."]
        );
        assert!(provider.last_prompt().unwrap().contains("IN ENGLISH"));
    }

    #[tokio::test]
    async fn no_food_keeps_the_model_message() {
        let service = service_answering(r#"{"hasFood":false,"errorMessage":"no food found"}"#);
        let image = ImagePayload::parse(PHOTO).unwrap();
        let result = service.generate_recipe(&image).await.unwrap();
        assert_eq!(result, RecipeResult::no_food("no food found"));
    }

    #[tokio::test]
    async fn provider_failure_is_not_retried() {
        let provider = Arc::new(FakeProvider::failing("timeout"));
        let service = service_with(provider.clone());
        let image = ImagePayload::parse(PHOTO).unwrap();

        let err = service.generate_recipe(&image).await.unwrap_err();
        assert!(matches!(err, RecipeError::ProviderFailure(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn non_image_payload_never_reaches_provider() {
        let provider = Arc::new(FakeProvider::default());
        let service = service_with(provider.clone());
        let pdf = ImagePayload::parse("data:application/pdf;base64,JVBERg==").unwrap();

        let err = service.generate_recipe(&pdf).await.unwrap_err();
        assert!(matches!(err, RecipeError::InvalidInput(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn empty_output_is_a_schema_violation() {
        let service = service_answering("");
        for raw in ["", "  \n", "Sorry, I can't help."] {
            assert!(matches!(
                service.parse_output(raw),
                Err(RecipeError::SchemaViolation(_))
            ));
        }
    }

    #[test]
    fn wrong_types_are_rejected() {
        let service = service_answering("");
        for raw in [
            r#"{"errorMessage":"missing hasFood"}"#,
            r#"{"hasFood":"yes"}"#,
            r#"{"hasFood":true,"recipe":{"title":"x","description":"y","ingredients":"eggs","instructions":["a"]}}"#,
            r#"{"hasFood":true,"recipe":{"title":"x","ingredients":["a"],"instructions":["b"]}}"#,
        ] {
            let err = service.parse_output(raw).unwrap_err();
            assert!(matches!(err, RecipeError::SchemaViolation(_)), "{raw}");
        }
    }

    #[test]
    fn has_food_requires_a_usable_recipe() {
        let service = service_answering("");
        for raw in [
            r#"{"hasFood":true}"#,
            r#"{"hasFood":true,"recipe":{"title":"  ","description":"","ingredients":["a"],"instructions":["b"]}}"#,
            r#"{"hasFood":true,"recipe":{"title":"x","description":"","ingredients":[],"instructions":["b"]}}"#,
            r#"{"hasFood":true,"recipe":{"title":"x","description":"","ingredients":["a"],"instructions":[" "]}}"#,
        ] {
            assert!(
                matches!(service.parse_output(raw), Err(RecipeError::SchemaViolation(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn exactly_one_of_recipe_or_message() {
        let service = service_answering("");

        // stray errorMessage next to a recipe is dropped
        let r = service
            .parse_output(
                r#"{"hasFood":true,"errorMessage":"","recipe":{"title":"Soup","description":"Warm.","ingredients":["water"],"instructions":["Boil."],"tips":[]}}"#,
            )
            .unwrap();
        assert!(r.error_message.is_none());
        assert_eq!(
            r.recipe,
            Some(Recipe {
                title: "Soup".into(),
                description: "Warm.".into(),
                ingredients: vec!["water".into()],
                instructions: vec!["Boil.".into()],
                tips: None,
            })
        );

        // stray recipe next to hasFood=false is dropped, missing message filled in
        let r = service
            .parse_output(
                r#"{"hasFood":false,"errorMessage":null,"recipe":{"title":"Soup","description":"","ingredients":["a"],"instructions":["b"]}}"#,
            )
            .unwrap();
        assert!(r.recipe.is_none());
        assert_eq!(
            r.error_message.as_deref(),
            Some(Language::En.strings().no_food_fallback)
        );
    }

    #[test]
    fn accepts_fenced_output() {
        let service = service_answering("");
        let r = service
            .parse_output("```json\n{\"hasFood\": false, \"errorMessage\": \"That's a cat.\"}\n```")
            .unwrap();
        assert_eq!(r, RecipeResult::no_food("That's a cat."));
    }
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{config::Config, recipe_service::RecipeService};

/* ---------- App state ---------- */
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecipeService>,
    pub config: Config,
}

/* ---------- API models ---------- */

/// Outcome of one generation: a recipe, or a reason there is none.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResult {
    pub has_food: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
}

impl RecipeResult {
    #[must_use]
    pub const fn with_recipe(recipe: Recipe) -> Self {
        Self {
            has_food: true,
            error_message: None,
            recipe: Some(recipe),
        }
    }

    #[must_use]
    pub fn no_food(message: impl Into<String>) -> Self {
        Self {
            has_food: false,
            error_message: Some(message.into()),
            recipe: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Recipe {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Execution order.
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

/// Body of `POST /generate-recipe`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecipeRequest {
    pub photo_data_uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_food_serializes_without_recipe() {
        let v = serde_json::to_value(RecipeResult::no_food("no food found")).unwrap();
        assert_eq!(v, json!({"hasFood": false, "errorMessage": "no food found"}));
    }

    #[test]
    fn recipe_without_tips_omits_the_key() {
        let r = RecipeResult::with_recipe(Recipe {
            title: "Rántotta".into(),
            description: "Gyors reggeli.".into(),
            ingredients: vec!["3 tojás".into()],
            instructions: vec!["Verd fel.".into(), "Süsd meg.".into()],
            tips: None,
        });
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["hasFood"], true);
        assert!(v.get("errorMessage").is_none());
        assert!(v["recipe"].get("tips").is_none());
        assert_eq!(v["recipe"]["instructions"], json!(["Verd fel.", "Süsd meg."]));
    }
}

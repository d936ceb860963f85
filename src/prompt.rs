//! The instruction sent with every photo, and the shape the answer must take.

use serde_json::{Value as JsonValue, json};

use crate::locale::Language;

/// Placeholder in the prompt text replaced by the pretty-printed schema.
pub const SCHEMA_PLACEHOLDER: &str = "{schema}";

/// Prompt text plus output schema. Plain data: no I/O, no provider.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    text: String,
    schema: JsonValue,
}

impl PromptTemplate {
    /// Custom prompt text with the standard recipe schema.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            schema: recipe_schema(),
        }
    }

    /// Built-in prompt asking for a recipe written in `lang`.
    #[must_use]
    pub fn for_language(lang: Language) -> Self {
        Self::new(match lang {
            Language::Hu => DEFAULT_PROMPT_HU,
            Language::En => DEFAULT_PROMPT_EN,
        })
    }

    #[must_use]
    pub const fn schema(&self) -> &JsonValue {
        &self.schema
    }

    /// Final prompt text, schema inlined.
    #[must_use]
    pub fn render(&self) -> String {
        if !self.text.contains(SCHEMA_PLACEHOLDER) {
            return self.text.clone();
        }
        let schema = serde_json::to_string_pretty(&self.schema).unwrap_or_default();
        self.text.replace(SCHEMA_PLACEHOLDER, &schema)
    }
}

/// JSON schema of a `RecipeResult`.
#[must_use]
pub fn recipe_schema() -> JsonValue {
    let string_list = |description: &str| {
        json!({
            "type": "array",
            "items": { "type": "string" },
            "description": description
        })
    };

    json!({
        "type": "object",
        "properties": {
            "hasFood": {
                "type": "boolean",
                "description": "Whether the image contains identifiable food or ingredients."
            },
            "errorMessage": {
                "type": "string",
                "description": "User-facing explanation, only when hasFood is false."
            },
            "recipe": {
                "type": "object",
                "description": "The generated recipe, only when hasFood is true.",
                "properties": {
                    "title": { "type": "string", "description": "Recipe title." },
                    "description": { "type": "string", "description": "Short description of the dish." },
                    "ingredients": string_list("Ingredients with quantities, including pantry staples."),
                    "instructions": string_list("Cooking steps in execution order."),
                    "tips": string_list("Optional cooking or serving tips.")
                },
                "required": ["title", "description", "ingredients", "instructions"]
            }
        },
        "required": ["hasFood"]
    })
}

const DEFAULT_PROMPT_HU: &str = r#"Te egy 'Maradék Séf' AI asszisztens vagy, aki arra specializálódott, hogy a rendelkezésre álló alapanyagokból finom és teljes recepteket készítsen.
A feladatod, hogy elemezd a kapott képet az alapanyagokról, és generálj egy receptet MAGYAR NYELVEN.

Ha a képen azonosítható élelmiszer található, állítsd a 'hasFood' értéket 'true'-ra, és generálj egy teljes, ehető és finom receptet. A recept tartalmazza a következőket:
1. Kreatív és vonzó cím.
2. Rövid leírás a receptről.
3. A képen azonosított összes hozzávaló listája, kiegészítve az alapvető éléskamrai cikkekkel (pl. só, olaj), amelyek szükségesek a teljes fogáshoz. Légy pontos a mennyiségekkel és az állapotokkal (pl. "1 közepes vöröshagyma, felkockázva", "200g sült csirke, felaprítva").
4. Lépésről lépésre kidolgozott főzési útmutató, egyértelműen sorszámozva.
5. Hasznos tippek az étel elkészítéséhez vagy tálalásához.

Ha nem tudsz élelmiszert azonosítani a képen, vagy ha a kép nem étellel kapcsolatos, állítsd a 'hasFood' értéket 'false'-ra, és adj meg egy segítőkész 'errorMessage'-t a felhasználónak magyarul, javasolva, hogy töltsön fel egy képet az alapanyagokról. Ebben az esetben ne generálj 'recipe' objektumot.

A választ szigorúan az alábbi JSON séma szerint add vissza, és minden szöveges tartalom MAGYARUL legyen.
{schema}"#;

const DEFAULT_PROMPT_EN: &str = r#"You are a "Leftover Chef" AI assistant who specialises in turning whatever ingredients are at hand into complete, delicious recipes.
Your task is to analyse the attached photo of ingredients and write a recipe IN ENGLISH.

If the photo shows identifiable food, set "hasFood" to true and write a complete, edible and tasty recipe containing:
1. A creative, appealing title.
2. A short description of the dish.
3. Every ingredient identified in the photo, completed with the basic pantry staples (e.g. salt, oil) needed for a full dish. Be precise about quantities and states (e.g. "1 medium onion, diced", "200 g roast chicken, shredded").
4. Step-by-step cooking instructions, clearly numbered.
5. Helpful tips for preparing or serving the dish.

If you cannot identify any food in the photo, or the photo is not about food, set "hasFood" to false and give the user a helpful "errorMessage" in English suggesting they upload a photo of their ingredients. Do not produce a "recipe" object in that case.

Answer strictly as JSON following the schema below, with all text in ENGLISH.
{schema}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_inlines_schema() {
        let prompt = PromptTemplate::for_language(Language::En).render();
        assert!(!prompt.contains(SCHEMA_PLACEHOLDER));
        assert!(prompt.contains("\"hasFood\""));
        assert!(prompt.contains("IN ENGLISH"));

        let prompt = PromptTemplate::for_language(Language::Hu).render();
        assert!(prompt.contains("MAGYAR NYELVEN"));
        assert!(prompt.contains("\"instructions\""));
    }

    #[test]
    fn custom_text_without_placeholder_is_kept_verbatim() {
        let t = PromptTemplate::new("Just cook.");
        assert_eq!(t.render(), "Just cook.");
        assert_eq!(t.schema(), &recipe_schema());
    }

    #[test]
    fn instructions_are_asked_for_numbered() {
        let hu = PromptTemplate::for_language(Language::Hu).render();
        assert!(hu.contains("főzési útmutató, egyértelműen sorszámozva."));
        let en = PromptTemplate::for_language(Language::En).render();
        assert!(en.contains("clearly numbered"));
    }

    #[test]
    fn schema_compiles() {
        assert!(jsonschema::validator_for(&recipe_schema()).is_ok());
    }
}

use axum::{Json, body::Bytes, extract::State};

use crate::{
    error::{AppResult, RecipeError},
    image_io::ImagePayload,
    models::{AppState, GenerateRecipeRequest, RecipeResult},
};

/// `POST /generate-recipe`
///
/// The body is taken as raw bytes so that every malformed request, not only
/// a missing field, ends up as the same 400.
///
/// # Errors
///
/// 400 for a missing or malformed `photoDataUri`, 500 if generation fails.
pub async fn generate(State(state): State<AppState>, body: Bytes) -> AppResult<Json<RecipeResult>> {
    let image = photo_from_body(&body)?;
    let result = state.service.generate_recipe(&image).await?;
    Ok(Json(result))
}

fn photo_from_body(body: &[u8]) -> Result<ImagePayload, RecipeError> {
    let req: GenerateRecipeRequest = serde_json::from_slice(body)
        .map_err(|e| RecipeError::InvalidInput(format!("bad request body: {e}")))?;
    ImagePayload::parse(&req.photo_data_uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_must_carry_a_data_uri_string() {
        for body in [
            "",
            "[]",
            "{}",
            r#"{"photoDataUri":null}"#,
            r#"{"photoDataUri":42}"#,
            r#"{"photoDataUri":""}"#,
            r#"{"photoDataUri":"https://example.com/fridge.jpg"}"#,
        ] {
            assert!(
                matches!(photo_from_body(body.as_bytes()), Err(RecipeError::InvalidInput(_))),
                "{body}"
            );
        }

        let image = photo_from_body(br#"{"photoDataUri":"data:image/png;base64,AAAA"}"#).unwrap();
        assert_eq!(image.mime_type(), "image/png");
    }
}

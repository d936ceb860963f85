use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::llm::ProviderError;

pub const INVALID_PHOTO_MSG: &str = "Missing or invalid photoDataUri";
pub const GENERATION_FAILED_MSG: &str = "Failed to generate recipe";

/// Everything that can go wrong between picking a photo and holding a recipe.
///
/// A photo without food is not an error: it is a valid result with
/// `hasFood = false`.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("invalid image payload: {0}")]
    InvalidInput(String),

    #[error("not an image file (type: {0})")]
    InvalidFileKind(String),

    #[error("generation provider failed: {0}")]
    ProviderFailure(#[from] ProviderError),

    #[error("provider output does not match the recipe schema: {0}")]
    SchemaViolation(String),
}

impl RecipeError {
    /// True for errors caused by what the caller sent us.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidFileKind(_))
    }
}

#[derive(Debug)]
pub enum AppError {
    /// A status code with a JSON `{ "error": msg }` body.
    Msg(StatusCode, String),
    /// Recipe flow error: client errors -> 400, the rest -> generic 500; logged.
    Recipe(RecipeError),
}

impl From<RecipeError> for AppError {
    fn from(e: RecipeError) -> Self {
        Self::Recipe(e)
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        Self::Msg(StatusCode::BAD_REQUEST, format!("multipart error: {e}"))
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

fn json_error(code: StatusCode, msg: impl Into<String>) -> axum::response::Response {
    (code, Json(ErrBody { error: msg.into() })).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Msg(code, msg) => json_error(code, msg),
            Self::Recipe(err) if err.is_client_error() => {
                tracing::debug!(error = %err, "rejected recipe request");
                json_error(StatusCode::BAD_REQUEST, INVALID_PHOTO_MSG)
            }
            Self::Recipe(err) => {
                // the cause stays in the server log; callers get a uniform 500
                tracing::error!(error = %err, "recipe generation failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MSG)
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

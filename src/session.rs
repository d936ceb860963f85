//! What the user sees, as one explicit state machine.
//!
//! ```text
//! Idle --select--> ImageReady --submit--> Loading --ok, food--> Success
//!  ^                 |  ^                    |
//!  +------clear------+  |                    +--no food / error--> Error
//!  +----------------reset--------------------- Success | Error
//!                       +--------select-------------------- Error
//! ```

use crate::{
    error::RecipeError,
    image_io::ImagePayload,
    locale::Strings,
    models::{Recipe, RecipeResult},
    recipe_service::RecipeService,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Idle,
    ImageReady {
        image: ImagePayload,
    },
    Loading {
        image: ImagePayload,
    },
    Success {
        image: ImagePayload,
        recipe: Recipe,
    },
    Error {
        message: String,
    },
}

#[derive(Debug)]
pub enum Event {
    /// A valid image was picked.
    SelectImage(ImagePayload),
    /// The picked file was not an image.
    RejectFile,
    Clear,
    Submit,
    Resolved(Result<RecipeResult, RecipeError>),
    Reset,
}

/// Work the caller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the recipe service once with this image and feed the outcome
    /// back as `Event::Resolved`.
    Generate(ImagePayload),
}

impl Session {
    /// Apply `event`. Events that don't apply to the current state leave it
    /// unchanged and produce no effect.
    #[must_use]
    pub fn step(self, event: Event, strings: &Strings) -> (Self, Option<Effect>) {
        match (self, event) {
            (
                Self::Idle | Self::ImageReady { .. } | Self::Error { .. },
                Event::SelectImage(image),
            ) => (Self::ImageReady { image }, None),
            (Self::ImageReady { .. }, Event::Clear) => (Self::Idle, None),
            (Self::ImageReady { image }, Event::Submit) => {
                let effect = Effect::Generate(image.clone());
                (Self::Loading { image }, Some(effect))
            }
            (Self::Loading { image }, Event::Resolved(outcome)) => {
                (resolve(image, outcome, strings), None)
            }
            (Self::Success { .. } | Self::Error { .. }, Event::Reset) => (Self::Idle, None),
            (state, _) => (state, None),
        }
    }
}

/// Select `image`, submit it and run the resulting effect to completion.
///
/// Ends in `Success` or `Error`.
pub async fn cook(service: &RecipeService, image: ImagePayload, strings: &Strings) -> Session {
    let (session, _) = Session::Idle.step(Event::SelectImage(image), strings);
    let (mut session, effect) = session.step(Event::Submit, strings);
    if let Some(Effect::Generate(image)) = effect {
        let outcome = service.generate_recipe(&image).await;
        session = session.step(Event::Resolved(outcome), strings).0;
    }
    session
}

fn resolve(
    image: ImagePayload,
    outcome: Result<RecipeResult, RecipeError>,
    strings: &Strings,
) -> Session {
    match outcome {
        Ok(RecipeResult {
            has_food: true,
            recipe: Some(recipe),
            ..
        }) => Session::Success { image, recipe },
        Ok(result) => Session::Error {
            message: result
                .error_message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| strings.no_food_fallback.to_string()),
        },
        Err(e) => {
            tracing::debug!(error = %e, "generation failed, showing generic error");
            Session::Error {
                message: strings.generic_error.to_string(),
            }
        }
    }
}

//! The browser flow: every step is a full page render of a `Session`.

use axum::{
    Form,
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::Local;
use serde::Deserialize;

use crate::{
    error::AppResult,
    image_io::{self, ImagePayload},
    models::AppState,
    session::{self, Event, Session},
    views::{self, PageContext},
};

fn page_context(state: &AppState) -> PageContext {
    PageContext {
        language: state.service.language(),
        today: Local::now().date_naive(),
    }
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(views::render_session(&page_context(&state), &Session::Idle, None))
}

/// `GET /how-it-works`
pub async fn how_it_works(State(state): State<AppState>) -> Html<String> {
    Html(views::render_how_it_works(&page_context(&state)))
}

/// `POST /upload` with a multipart `image` field.
///
/// # Errors
///
/// 400 if the multipart body itself can't be read.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> AppResult<Html<String>> {
    let ctx = page_context(&state);
    let strings = ctx.strings();

    let mut picked: Option<ImagePayload> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let declared = field.content_type().map(ToString::to_string);
        let file_name = field.file_name().map(ToString::to_string);
        let bytes = field.bytes().await?;

        match image_io::ingest_upload(declared.as_deref(), file_name.as_deref(), &bytes) {
            Ok(image) => picked = Some(image),
            Err(e) => tracing::info!(error = %e, file = ?file_name, "upload rejected"),
        }
        break;
    }

    let (session, notice) = match picked {
        Some(image) => (Session::Idle.step(Event::SelectImage(image), strings).0, None),
        None => (
            Session::Idle.step(Event::RejectFile, strings).0,
            Some(strings.not_an_image),
        ),
    };
    Ok(Html(views::render_session(&ctx, &session, notice)))
}

#[derive(Debug, Deserialize)]
pub struct CookForm {
    #[serde(rename = "photoDataUri", default)]
    pub photo_data_uri: String,
}

/// `POST /cook`: submit the previewed image and render the outcome.
pub async fn cook(State(state): State<AppState>, Form(form): Form<CookForm>) -> Response {
    let ctx = page_context(&state);
    let strings = ctx.strings();

    let image = match ImagePayload::parse(&form.photo_data_uri) {
        Ok(image) if image.is_image() => image,
        outcome => {
            let reason = outcome.map_or_else(
                |e| e.to_string(),
                |img| format!("type {}", img.mime_type()),
            );
            tracing::info!(%reason, "cook request without a usable image");
            let page = views::render_session(&ctx, &Session::Idle, Some(strings.not_an_image));
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    let session = session::cook(&state.service, image, strings).await;
    Html(views::render_session(&ctx, &session, None)).into_response()
}

use crate::{
    embedded_assets::serve_asset,
    logging::{access_log, log_payloads},
    models::AppState,
    routes::{generate_recipe, pages},
};

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Request};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::{Json, Router};

use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info_span;

async fn healthz() -> Json<&'static str> {
    Json("ok")
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        None => base.allow_origin(Any),
        Some(Ok(origin)) => base.allow_origin(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid CORS origin, allowing all origins");
            base.allow_origin(Any)
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let rid = req
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info_span!("http", method = %req.method(), path = %req.uri().path(), request_id = %rid)
        });

    // Outermost: everything below sees the x-request-id header.
    let request_id_layer = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id());

    let body_limit = state.config.max_upload_bytes;
    let cors = cors_layer(state.config.cors_origin.as_deref());

    Router::new()
        .route("/healthz", get(healthz))
        .route("/generate-recipe", post(generate_recipe::generate))
        .route("/", get(pages::index))
        .route("/upload", post(pages::upload))
        .route("/cook", post(pages::cook))
        .route("/how-it-works", get(pages::how_it_works))
        .route("/assets/{*path}", get(serve_asset))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn_with_state(body_limit, log_payloads))
        .layer(from_fn(access_log))
        .layer(trace)
        .layer(cors)
        .layer(request_id_layer)
}

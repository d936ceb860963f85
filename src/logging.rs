use crate::config::Config;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, Response, StatusCode, header};
use axum::middleware::Next;
use axum::response::IntoResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const BODY_READ_LIMIT: usize = 64 * 1024;
const PREVIEW_LIMIT: usize = 4 * 1024;

static DATA_URI_PAYLOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(data:[\w.+-]+/[\w.+-]+;base64,)[A-Za-z0-9+/=]+").unwrap());

/// Keep guards alive for the lifetime of the app.
pub struct LogGuards {
    _file_guard: WorkerGuard,
}

fn split_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let file = path
        .file_name()
        .unwrap_or_else(|| OsStr::new("leftover-chef.logs"))
        .to_string_lossy()
        .to_string();
    (dir, file)
}

fn timer() -> fmt::time::ChronoLocal {
    fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string())
}

pub fn init_logging(config: &Config) -> LogGuards {
    let filter = EnvFilter::new(config.log_filter());

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_ansi(true)
        .compact()
        .with_timer(timer());

    let (dir, file) = split_path(&config.log_file);
    let appender = tracing_appender::rolling::never(dir, file);
    let (nb, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_timer(timer())
        .with_writer(nb);

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    LogGuards { _file_guard: guard }
}

fn request_id<B>(req: &Request<B>) -> String {
    req.headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Replace image payloads with their length and cut long bodies.
#[must_use]
pub fn redact_preview(raw: &str) -> String {
    let redacted = DATA_URI_PAYLOAD_RE.replace_all(raw, |caps: &regex::Captures<'_>| {
        let payload_len = caps[0].len() - caps[1].len();
        format!("{}<{payload_len} bytes>", &caps[1])
    });
    if redacted.len() > PREVIEW_LIMIT {
        let mut cut = PREVIEW_LIMIT;
        while !redacted.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}… [truncated]", &redacted[..cut])
    } else {
        redacted.into_owned()
    }
}

/// One line per request: method, path, status, latency.
pub async fn access_log(req: Request<Body>, next: Next) -> Response<Body> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let req_id = request_id(&req);
    let started = Instant::now();

    let res = next.run(req).await;

    let status = res.status();
    let latency_ms = started.elapsed().as_millis();
    if status.is_server_error() {
        tracing::warn!(request_id=%req_id, %method, %path, %status, latency_ms, "request failed");
    } else {
        tracing::info!(request_id=%req_id, %method, %path, %status, latency_ms, "request completed");
    }
    res
}

/// Multipart and form bodies carry raw image data and are never logged.
fn request_body_logged(content_type: &str) -> bool {
    !(content_type.starts_with("multipart/")
        || content_type.starts_with("application/x-www-form-urlencoded"))
}

fn response_body_logged(content_type: &str) -> bool {
    content_type.starts_with("application/json") || content_type.starts_with("text/plain")
}

/// Logs request & response bodies at debug level, reading at most `limit`
/// bytes of each. Skips multipart and form requests and non-text responses,
/// redacts image data.
pub async fn log_payloads(
    State(limit): State<usize>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return next.run(req).await;
    }

    let req_id = request_id(&req);
    let req_ct = content_type(req.headers());

    let (req_parts, req_body) = req.into_parts();
    let req = if request_body_logged(&req_ct) {
        match axum::body::to_bytes(req_body, limit).await {
            Ok(bytes) => {
                let shown = &bytes[..bytes.len().min(BODY_READ_LIMIT)];
                let preview = redact_preview(&String::from_utf8_lossy(shown));
                tracing::debug!(request_id=%req_id, request_body=%preview, "request body");
                Request::from_parts(req_parts, Body::from(bytes))
            }
            Err(e) => {
                tracing::warn!(request_id=%req_id, error=%e, limit, "request body over limit or unreadable");
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            }
        }
    } else {
        tracing::debug!(request_id=%req_id, content_type=%req_ct, "request body not logged");
        Request::from_parts(req_parts, req_body)
    };

    let res = next.run(req).await;

    if !response_body_logged(&content_type(res.headers())) {
        return res;
    }
    let (res_parts, res_body) = res.into_parts();
    match axum::body::to_bytes(res_body, limit).await {
        Ok(bytes) => {
            let shown = &bytes[..bytes.len().min(BODY_READ_LIMIT)];
            let preview = redact_preview(&String::from_utf8_lossy(shown));
            tracing::debug!(request_id=%req_id, response_body=%preview, "response body");
            Response::from_parts(res_parts, Body::from(bytes))
        }
        Err(e) => {
            tracing::warn!(request_id=%req_id, error=%e, "failed reading response body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

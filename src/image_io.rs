use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fmt, path::Path};

use crate::error::RecipeError;

/// A photo embedded as `data:<mime>;base64,<data>`.
///
/// Built once when the user picks a file and handed to the recipe service
/// unchanged; the bytes are never resized or re-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    uri: String,
    // byte offsets into `uri`
    mime_end: usize,
    data_start: usize,
}

static MIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9!#$&^_.+-]*/[a-z0-9][a-z0-9!#$&^_.+-]*$").unwrap()
});

static DATA_URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^data:([A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*)(?:;[^;,]+=[^;,]*)*;base64,(.+)$")
        .unwrap()
});

impl ImagePayload {
    /// Parse a data URI received from a caller.
    ///
    /// # Errors
    ///
    /// `RecipeError::InvalidInput` if the string is empty, lacks the
    /// `data:<mime>;base64,` prefix, or carries a payload that is not base64.
    pub fn parse(raw: &str) -> Result<Self, RecipeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RecipeError::InvalidInput("empty image payload".into()));
        }

        let caps = DATA_URI_RE.captures(raw).ok_or_else(|| {
            RecipeError::InvalidInput("expected data:<mime>;base64,<data>".into())
        })?;
        let (Some(mime), Some(data)) = (caps.get(1), caps.get(2)) else {
            return Err(RecipeError::InvalidInput(
                "expected data:<mime>;base64,<data>".into(),
            ));
        };

        B64.decode(data.as_str())
            .map_err(|e| RecipeError::InvalidInput(format!("payload is not base64: {e}")))?;

        Ok(Self {
            uri: raw.to_string(),
            mime_end: mime.end(),
            data_start: data.start(),
        })
    }

    /// Embed raw bytes as-is.
    ///
    /// # Errors
    ///
    /// `RecipeError::InvalidFileKind` if `mime` is not a `type/subtype` token
    /// pair, `RecipeError::InvalidInput` if `bytes` is empty.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, RecipeError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !MIME_RE.is_match(&mime) {
            return Err(RecipeError::InvalidFileKind(mime));
        }
        if bytes.is_empty() {
            return Err(RecipeError::InvalidInput("image file is empty".into()));
        }
        let prefix = format!("data:{mime};base64,");
        let data_start = prefix.len();
        Ok(Self {
            uri: format!("{prefix}{}", B64.encode(bytes)),
            mime_end: "data:".len() + mime.len(),
            data_start,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.uri["data:".len()..self.mime_end]
    }

    #[must_use]
    pub fn base64_data(&self) -> &str {
        &self.uri[self.data_start..]
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        is_image_mime(self.mime_type())
    }

}

impl fmt::Display for ImagePayload {
    /// Never prints the payload, only its type and size.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data:{};base64,<{} chars>",
            self.mime_type(),
            self.base64_data().len()
        )
    }
}

fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Resolve the type of an uploaded file: the declared content type wins,
/// otherwise guess from the file name.
fn resolve_mime(declared: Option<&str>, file_name: Option<&str>) -> Option<String> {
    let declared = declared
        .map(str::trim)
        .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case("application/octet-stream"));
    if let Some(m) = declared {
        // drop parameters such as "; charset=..."
        return Some(m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase());
    }
    file_name
        .and_then(|n| mime_guess::from_path(n).first())
        .map(|m| m.essence_str().to_string())
}

/// Turn a user-selected file into an `ImagePayload`.
///
/// # Errors
///
/// `RecipeError::InvalidFileKind` when the file is not an image,
/// `RecipeError::InvalidInput` when it is empty.
pub fn ingest_upload(
    declared_type: Option<&str>,
    file_name: Option<&str>,
    bytes: &[u8],
) -> Result<ImagePayload, RecipeError> {
    let mime = resolve_mime(declared_type, file_name).unwrap_or_default();
    if !is_image_mime(&mime) {
        let shown = if mime.is_empty() { "unknown".to_string() } else { mime };
        return Err(RecipeError::InvalidFileKind(shown));
    }
    ImagePayload::from_bytes(&mime, bytes)
}

/// Read an image from disk, typing it by extension.
///
/// # Errors
///
/// Same as [`ingest_upload`]; I/O failures are reported as `InvalidInput`.
pub async fn ingest_path(path: &Path) -> Result<ImagePayload, RecipeError> {
    let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());
    let mime = resolve_mime(None, file_name.as_deref()).unwrap_or_default();
    if !is_image_mime(&mime) {
        let shown = if mime.is_empty() { "unknown".to_string() } else { mime };
        return Err(RecipeError::InvalidFileKind(shown));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RecipeError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
    ImagePayload::from_bytes(&mime, &bytes)
}

//! Content type detection for response bodies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a response body should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    /// JSON, pretty-printed when it parses.
    Json,
    /// Any other UTF-8 text (HTML, XML, plain), shown as-is.
    Text,
    /// Anything that is not UTF-8, shown as a hex preview.
    Binary,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "JSON",
            ContentType::Text => "Text",
            ContentType::Binary => "Binary",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detects the content type from the Content-Type header, falling back to
/// the body when the header is missing or names something generic.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use http_probe::formatter::content_type::{detect_content_type, ContentType};
///
/// let mut headers = HashMap::new();
/// headers.insert("Content-Type".to_string(), "application/json; charset=utf-8".to_string());
///
/// assert_eq!(detect_content_type(&headers, br#"{"id": 1}"#), ContentType::Json);
/// ```
pub fn detect_content_type(headers: &HashMap<String, String>, body: &[u8]) -> ContentType {
    let header = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.to_ascii_lowercase());

    if let Some(value) = header {
        let mime_type = value.split(';').next().unwrap_or_default().trim();
        if mime_type.contains("json") {
            return ContentType::Json;
        }
        if mime_type.starts_with("text/") || mime_type.contains("xml") {
            return if std::str::from_utf8(body).is_ok() {
                ContentType::Text
            } else {
                ContentType::Binary
            };
        }
        if mime_type.starts_with("image/")
            || mime_type.starts_with("audio/")
            || mime_type.starts_with("video/")
        {
            return ContentType::Binary;
        }
    }

    inspect_body_content(body)
}

fn inspect_body_content(body: &[u8]) -> ContentType {
    match std::str::from_utf8(body) {
        Ok(text) => {
            let trimmed = text.trim();
            if (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'))
            {
                ContentType::Json
            } else {
                ContentType::Text
            }
        }
        Err(_) => ContentType::Binary,
    }
}

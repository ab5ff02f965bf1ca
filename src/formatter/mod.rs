//! HTTP response formatter.
//!
//! Renders what came back from the server the way a person checking the
//! server by hand wants to read it: status code, headers, body, in that
//! order.

pub mod content_type;

pub use content_type::{detect_content_type, ContentType};

use crate::executor::timing::format_duration_human;
use crate::models::response::HttpResponse;
use crate::scenarios::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Bodies longer than this are cut off in the printout (1MB).
const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// Size of hex preview for binary content (1KB).
const HEX_PREVIEW_SIZE: usize = 1024;

/// Message printed when the server drops the connection.
pub const CONNECTION_CLOSED_MESSAGE: &str =
    "Error: Connection closed by the server. This is expected for 4xx errors.";

/// Errors that can occur during response formatting.
#[derive(Debug)]
pub enum FormatError {
    /// JSON parsing or formatting error.
    JsonError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::JsonError(msg) => write!(f, "JSON formatting error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

/// Summary information shown under the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub status_code: u16,
    pub duration: Duration,
    pub size: usize,
    pub content_type: ContentType,
    pub is_truncated: bool,
}

impl ResponseMetadata {
    /// Formats the size as "456 B", "1.23 KB" or "10.00 MB".
    pub fn format_size(&self) -> String {
        if self.size < 1024 {
            format!("{} B", self.size)
        } else if self.size < 1024 * 1024 {
            format!("{:.2} KB", self.size as f64 / 1024.0)
        } else {
            format!("{:.2} MB", self.size as f64 / (1024.0 * 1024.0))
        }
    }
}

/// Formatted HTTP response ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedResponse {
    /// Status code and reason phrase, e.g. "400 Bad Request".
    pub status_line: String,

    /// Headers rendered as `{Name: value, ...}`, sorted by name.
    pub headers_text: String,

    /// Body rendered according to its content type.
    pub formatted_body: String,

    pub metadata: ResponseMetadata,
}

impl FormattedResponse {
    /// Renders the full printout.
    pub fn to_display_string(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Status Code: {}\n", self.status_line));
        output.push_str(&format!("Response Headers: {}\n", self.headers_text));
        output.push_str(&format!("Response Body: {}\n", self.formatted_body));
        output.push_str(&format!(
            "Duration: {} | Size: {} | Type: {}\n",
            format_duration_human(&self.metadata.duration),
            self.metadata.format_size(),
            self.metadata.content_type
        ));

        if self.metadata.is_truncated {
            output.push_str("(body truncated, exceeds 1MB)\n");
        }

        output
    }
}

/// Formats an HTTP response for display.
///
/// # Examples
///
/// ```
/// use http_probe::formatter::format_response;
/// use http_probe::models::response::HttpResponse;
///
/// let mut response = HttpResponse::new(400, "Bad Request".to_string());
/// response.set_body(b"invalid json".to_vec());
///
/// let text = format_response(&response).to_display_string();
/// assert!(text.starts_with("Status Code: 400 Bad Request\n"));
/// assert!(text.contains("Response Body: invalid json\n"));
/// ```
pub fn format_response(response: &HttpResponse) -> FormattedResponse {
    let content_type = detect_content_type(&response.headers, &response.body);

    let is_truncated = response.body.len() > MAX_RESPONSE_SIZE;
    let body_to_format = if is_truncated {
        &response.body[..MAX_RESPONSE_SIZE]
    } else {
        &response.body
    };

    let formatted_body = match content_type {
        ContentType::Json => {
            let text = String::from_utf8_lossy(body_to_format);
            format_json(&text).unwrap_or_else(|_| text.into_owned())
        }
        ContentType::Text => String::from_utf8_lossy(body_to_format).into_owned(),
        ContentType::Binary => format_binary_preview(body_to_format),
    };

    let status_line = if response.status_text.is_empty() {
        response.status_code.to_string()
    } else {
        format!("{} {}", response.status_code, response.status_text)
    };

    FormattedResponse {
        status_line,
        headers_text: format_headers(&response.headers),
        formatted_body,
        metadata: ResponseMetadata {
            status_code: response.status_code,
            duration: response.duration,
            size: response.size,
            content_type,
            is_truncated,
        },
    }
}

/// Renders the outcome of one scenario, including dropped connections and
/// transport failures.
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Response(response) => format_response(response).to_display_string(),
        Outcome::ConnectionClosed(details) => {
            format!("{} Details: {}\n", CONNECTION_CLOSED_MESSAGE, details)
        }
        Outcome::Failed(err) => format!("Error: {}\n", err),
    }
}

/// Pretty-prints JSON.
///
/// # Examples
///
/// ```
/// use http_probe::formatter::format_json;
///
/// let formatted = format_json(r#"{"name":"John Doe"}"#).unwrap();
/// assert!(formatted.contains("  \"name\""));
/// ```
pub fn format_json(json: &str) -> Result<String, FormatError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| FormatError::JsonError(e.to_string()))?;

    serde_json::to_string_pretty(&value).map_err(|e| FormatError::JsonError(e.to_string()))
}

fn format_headers(headers: &HashMap<String, String>) -> String {
    let mut header_lines: Vec<String> = headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();

    header_lines.sort_by_key(|line| line.to_ascii_lowercase());
    format!("{{{}}}", header_lines.join(", "))
}

/// Shows the first 1KB of binary data as a hex dump.
fn format_binary_preview(body: &[u8]) -> String {
    let preview_size = body.len().min(HEX_PREVIEW_SIZE);

    let mut output = String::new();
    output.push_str(&format!("[Binary Data - {} bytes]\n", body.len()));

    for (i, chunk) in body[..preview_size].chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            if j == 8 {
                output.push(' ');
            }
            output.push_str(&format!("{:02x} ", byte));
        }

        for j in chunk.len()..16 {
            if j == 8 {
                output.push(' ');
            }
            output.push_str("   ");
        }

        output.push_str(" |");
        for byte in chunk {
            let ch = if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            };
            output.push(ch);
        }
        output.push_str("|\n");
    }

    if body.len() > HEX_PREVIEW_SIZE {
        output.push_str(&format!(
            "... ({} more bytes not shown)",
            body.len() - HEX_PREVIEW_SIZE
        ));
    }

    output
}

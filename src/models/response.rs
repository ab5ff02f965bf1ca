//! HTTP response data models.
//!
//! This module defines the core data structures for representing HTTP responses,
//! including status information, headers, body, and timing metrics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Timing breakdown for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTiming {
    /// Connecting and writing the request (head and body).
    pub send: Duration,

    /// From request written to the response head arriving.
    pub first_byte: Duration,

    /// Reading the response body.
    pub download: Duration,
}

impl RequestTiming {
    /// Creates a new RequestTiming with all durations set to zero.
    pub fn new() -> Self {
        Self {
            send: Duration::ZERO,
            first_byte: Duration::ZERO,
            download: Duration::ZERO,
        }
    }

    /// Sum of all phases.
    pub fn total(&self) -> Duration {
        self.send + self.first_byte + self.download
    }
}

impl Default for RequestTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents an HTTP response received from the server under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// HTTP reason phrase (e.g., "OK", "Bad Request").
    pub status_text: String,

    /// Response headers as key-value pairs.
    ///
    /// Header names are kept as received; lookups go through [`HttpResponse::header`].
    pub headers: HashMap<String, String>,

    /// Response body as raw bytes.
    pub body: Vec<u8>,

    /// Total request duration from start to completion.
    pub duration: Duration,

    /// Timing breakdown.
    pub timing: RequestTiming,

    /// Total response size in bytes (headers plus body).
    pub size: usize,
}

impl HttpResponse {
    /// Creates a new HttpResponse with the given status code and text.
    pub fn new(status_code: u16, status_text: String) -> Self {
        Self {
            status_code,
            status_text,
            headers: HashMap::new(),
            body: Vec::new(),
            duration: Duration::ZERO,
            timing: RequestTiming::new(),
            size: 0,
        }
    }

    /// `true` if status code is in the 200-299 range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// `true` if status code is in the 400-499 range.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// `true` if status code is in the 500-599 range.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// `true` if status code is in the 300-399 range.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Looks up a header value by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets the Content-Type header value if present.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Attempts to parse the response body as UTF-8 text.
    pub fn body_as_string(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    /// Body decoded as UTF-8 with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Adds a header to the response.
    pub fn add_header(&mut self, name: String, value: String) {
        self.headers.insert(name, value);
    }

    /// Sets the response body and recomputes [`HttpResponse::size`].
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.size = self.calculate_headers_size() + body.len();
        self.body = body;
    }

    fn calculate_headers_size(&self) -> usize {
        self.headers
            .iter()
            .map(|(k, v)| k.len() + v.len() + 4) // ": " and "\r\n"
            .sum()
    }
}

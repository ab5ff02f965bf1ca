//! Built-in suites.
//!
//! Payloads are literal: a 1 MiB run of `x`, a JSON object missing its
//! closing brace, a well-formed JSON object, and in-memory files from
//! empty to 10 MiB.

use super::{Expectation, Scenario};
use crate::auth::apply_authorization;
use crate::config::ProbeConfig;
use crate::models::request::{HttpRequest, RequestBody};
use crate::multipart::{repeated, VirtualFile};
use std::fmt;
use std::str::FromStr;

/// 1 MiB, beyond what the example server accepts.
pub const TOO_LARGE_PAYLOAD_SIZE: usize = 1024 * 1024;

/// 10 MiB upload.
pub const LARGE_FILE_SIZE: usize = 10 * 1024 * 1024;

pub const INVALID_JSON: &str = "{\"name\": \"John Doe\" ";
pub const VALID_JSON: &str = "{\"name\": \"John Doe\"}";
pub const SMALL_FILE_CONTENT: &[u8] = b"Hello, this is a small virtual file.";
pub const NON_ASCII_FILE_NAME: &str = "spécial_文件.txt";

/// Path of the JSON-consuming endpoint.
pub const USERS_PATH: &str = "/api/users";

/// A named group of scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    /// Plain POSTs: oversized, invalid JSON, valid JSON.
    Post,
    /// The same POSTs announced with `Expect: 100-continue`.
    ExpectContinue,
    /// Multipart uploads of in-memory files.
    Multipart,
}

impl Suite {
    pub fn all() -> [Suite; 3] {
        [Suite::Post, Suite::ExpectContinue, Suite::Multipart]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::Post => "post",
            Suite::ExpectContinue => "expect",
            Suite::Multipart => "multipart",
        }
    }

    /// First banner line.
    pub fn title(&self) -> &'static str {
        match self {
            Suite::Post | Suite::Multipart => "--- Starting Client Tests ---",
            Suite::ExpectContinue => "--- Starting 100 Continue Client Tests ---",
        }
    }

    /// Second banner line.
    pub fn subtitle(&self) -> &'static str {
        match self {
            Suite::Post => "This run makes various POST requests in a rapid sequence.",
            Suite::ExpectContinue => "This run sends various POST requests using the Expect header.",
            Suite::Multipart => "This run makes various POST multipart requests in a rapid sequence.",
        }
    }

    pub fn scenarios(&self, config: &ProbeConfig) -> Vec<Scenario> {
        match self {
            Suite::Post => post_requests(config),
            Suite::ExpectContinue => expect_continue_requests(config),
            Suite::Multipart => multipart_uploads(config),
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Suite::Post),
            "expect" | "expect-continue" | "100-continue" => Ok(Suite::ExpectContinue),
            "multipart" | "upload" => Ok(Suite::Multipart),
            other => Err(format!(
                "unknown suite '{}', expected one of: post, expect, multipart",
                other
            )),
        }
    }
}

/// JSON POST with an explicit length, `Connection: close` and the
/// configured authorization.
pub fn json_post(url: String, payload: &str, config: &ProbeConfig) -> HttpRequest {
    let mut request = HttpRequest::post(url)
        .with_header("Content-Type", "application/json")
        .with_header("Content-Length", payload.len().to_string())
        .with_header("Connection", "close")
        .with_body(payload);
    apply_authorization(&mut request, &config.auth_token);
    request
}

/// Multipart POST of in-memory files, no extra headers.
pub fn upload(url: String, files: Vec<VirtualFile>) -> HttpRequest {
    let mut request = HttpRequest::post(url);
    request.body = Some(RequestBody::Multipart(files));
    request
}

fn json_scenarios(config: &ProbeConfig, with_expect: bool) -> Vec<Scenario> {
    let too_large = "x".repeat(TOO_LARGE_PAYLOAD_SIZE);
    let cases = [
        (
            "too-large-payload",
            "Testing posting a too large payload...",
            config.url_for("/"),
            too_large.as_str(),
            Expectation::RejectedOrClosed,
        ),
        (
            "invalid-json",
            "Testing invalid json...",
            config.url_for(USERS_PATH),
            INVALID_JSON,
            Expectation::RejectedOrClosed,
        ),
        (
            "valid-json",
            "Testing valid json...",
            config.url_for(USERS_PATH),
            VALID_JSON,
            Expectation::Success,
        ),
    ];

    cases
        .into_iter()
        .map(|(name, description, url, payload, expectation)| {
            let mut request = json_post(url, payload, config);
            if with_expect {
                request.add_header("Expect", "100-continue");
            }
            Scenario::new(name, description, request, expectation)
        })
        .collect()
}

/// Plain POST scenarios.
pub fn post_requests(config: &ProbeConfig) -> Vec<Scenario> {
    json_scenarios(config, false)
}

/// POST scenarios that hold the body until the server agrees to take it.
pub fn expect_continue_requests(config: &ProbeConfig) -> Vec<Scenario> {
    json_scenarios(config, true)
        .into_iter()
        .map(|mut scenario| {
            scenario.description = scenario
                .description
                .replace("Testing ", "Testing with Expect: 100-continue, ");
            scenario
        })
        .collect()
}

/// Multipart upload scenarios.
pub fn multipart_uploads(config: &ProbeConfig) -> Vec<Scenario> {
    let url = config.url_for("/");
    let cases: Vec<(&str, &str, Vec<VirtualFile>)> = vec![
        (
            "small-file",
            "Testing uploading a small virtual file...",
            vec![VirtualFile::new("small.txt", SMALL_FILE_CONTENT)],
        ),
        (
            "large-file",
            "Testing uploading a large virtual file...",
            vec![VirtualFile::new("large.bin", repeated(b'A', LARGE_FILE_SIZE))],
        ),
        (
            "empty-file",
            "Testing uploading an empty virtual file...",
            vec![VirtualFile::new("empty.txt", Vec::new())],
        ),
        (
            "non-ascii-file-name",
            "Testing uploading a virtual file with special characters in the name...",
            vec![VirtualFile::new(NON_ASCII_FILE_NAME, SMALL_FILE_CONTENT)],
        ),
        (
            "multiple-files",
            "Testing uploading multiple virtual files in one request...",
            vec![
                VirtualFile::new("file1.bin", repeated(b'B', 128)),
                VirtualFile::new("file2.bin", repeated(b'C', 256)),
                VirtualFile::new("file3.bin", repeated(b'D', 512)),
            ],
        ),
    ];

    cases
        .into_iter()
        .map(|(name, description, files)| {
            Scenario::new(name, description, upload(url.clone(), files), Expectation::Handled)
        })
        .collect()
}

//! HTTP request executor.
//!
//! Requests are sent with reqwest's blocking client: one request at a time,
//! each bounded by the configured timeout, no retries. Headers go out as
//! given, `Expect: 100-continue` included; the body follows the head
//! without waiting for an interim response.

pub mod config;
pub mod error;
pub mod timing;

pub use config::ExecutionConfig;
pub use error::RequestError;
pub use timing::{format_timing_breakdown, TimingCheckpoints};

use crate::models::request::{HttpRequest, RequestBody};
use crate::models::response::HttpResponse;
use crate::multipart::build_form;
use std::collections::HashMap;
use url::Url;

/// Headers that describe a multipart body and must come from the encoder.
const MULTIPART_OWNED_HEADERS: [&str; 2] = ["content-type", "content-length"];

/// Executes an HTTP request and returns the response.
///
/// Any status code is a successful execution; only transport problems
/// (refused, reset, timed out, invalid URL) are errors.
///
/// # Examples
///
/// ```no_run
/// use http_probe::executor::{execute_request, ExecutionConfig};
/// use http_probe::models::request::HttpRequest;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = HttpRequest::post("http://localhost:8080/api/users")
///     .with_header("Content-Type", "application/json")
///     .with_body(r#"{"name": "John Doe"}"#);
///
/// let response = execute_request(&request, &ExecutionConfig::default())?;
/// println!("Status: {}", response.status_code);
/// # Ok(())
/// # }
/// ```
pub fn execute_request(
    request: &HttpRequest,
    config: &ExecutionConfig,
) -> Result<HttpResponse, RequestError> {
    let url = validate_url(&request.url)?;
    log::debug!(
        "[{}] {} {} ({} body bytes)",
        request.id,
        request.method,
        request.url,
        request.body.as_ref().map_or(0, |b| b.len())
    );

    if request.expects_continue() {
        log::debug!(
            "[{}] Expect: 100-continue passed through, body sent with the head",
            request.id
        );
    }

    let result = execute_with_client(request, &url, config);

    match &result {
        Ok(response) => log::info!(
            "[{}] {} {} -> {} {} in {}ms",
            request.id,
            request.method,
            request.url,
            response.status_code,
            response.status_text,
            response.duration.as_millis()
        ),
        Err(e) if e.is_connection_closed() => {
            log::warn!("[{}] {} closed the connection: {}", request.id, request.url, e)
        }
        Err(e) => log::error!("[{}] {} failed: {}", request.id, request.url, e),
    }

    result
}

/// Parses the URL and checks that it is http or https.
pub fn validate_url(url: &str) -> Result<Url, RequestError> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(RequestError::UnsupportedProtocol(other.to_string())),
    }
}

/// Builds the blocking client for one request.
fn build_client(config: &ExecutionConfig) -> Result<reqwest::blocking::Client, RequestError> {
    let redirect = if config.follow_redirects {
        reqwest::redirect::Policy::limited(config.max_redirects as usize)
    } else {
        reqwest::redirect::Policy::none()
    };

    reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .redirect(redirect)
        .danger_accept_invalid_certs(!config.validate_ssl)
        .build()
        .map_err(|e| RequestError::BuildError(e.to_string()))
}

fn execute_with_client(
    request: &HttpRequest,
    url: &Url,
    config: &ExecutionConfig,
) -> Result<HttpResponse, RequestError> {
    let mut checkpoints = TimingCheckpoints::new();
    let client = build_client(config)?;

    let is_multipart = matches!(request.body, Some(RequestBody::Multipart(_)));
    let mut req_builder = client.request(request.method.to_reqwest(), url.clone());

    for (name, value) in &config.default_headers {
        if request.header(name).is_none() {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }
    }

    for (name, value) in &request.headers {
        if is_multipart
            && MULTIPART_OWNED_HEADERS
                .iter()
                .any(|h| name.eq_ignore_ascii_case(h))
        {
            log::debug!("[{}] Dropping {} for multipart body", request.id, name);
            continue;
        }
        req_builder = req_builder.header(name.as_str(), value.as_str());
    }

    req_builder = match &request.body {
        Some(RequestBody::Bytes(bytes)) => req_builder.body(bytes.clone()),
        Some(RequestBody::Multipart(files)) => req_builder.multipart(build_form(files)?),
        None => req_builder,
    };

    let response = req_builder.send()?;
    checkpoints.mark_request_sent();
    checkpoints.mark_first_byte_received();

    let status = response.status();
    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let body = response.bytes()?.to_vec();
    checkpoints.mark_response_complete();

    let mut result = HttpResponse::new(
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown").to_string(),
    );
    result.headers = headers;
    result.set_body(body);
    result.timing = checkpoints.to_request_timing();
    result.duration = checkpoints.elapsed();
    Ok(result)
}

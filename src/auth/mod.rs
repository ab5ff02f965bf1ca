//! Authorization header handling.
//!
//! Probe requests carry an `Authorization` header built from the configured
//! token. Values that already name a scheme are sent untouched so servers
//! can also be probed with deliberately odd credentials.

use crate::models::request::HttpRequest;

/// Formats a token as a `Bearer` header value (RFC 6750).
///
/// # Examples
///
/// ```
/// use http_probe::auth::bearer_token;
///
/// assert_eq!(bearer_token("abc123xyz"), "Bearer abc123xyz");
/// ```
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Extracts the token from a `Bearer` header value.
///
/// The scheme match is case-sensitive. Returns `None` for any other scheme
/// or an empty token.
///
/// # Examples
///
/// ```
/// use http_probe::auth::parse_bearer_token_header;
///
/// assert_eq!(parse_bearer_token_header("Bearer valid_token"), Some("valid_token".to_string()));
/// assert_eq!(parse_bearer_token_header("Basic dXNlcjpwYXNz"), None);
/// ```
pub fn parse_bearer_token_header(header: &str) -> Option<String> {
    let token = header.trim().strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

/// Turns a configured token into an `Authorization` header value.
///
/// `"Bearer abc"` or `"Basic dXNlcjpwYXNz"` are passed through; a bare
/// `"abc"` becomes `"Bearer abc"`. Blank input yields `None`.
///
/// # Examples
///
/// ```
/// use http_probe::auth::authorization_value;
///
/// assert_eq!(authorization_value("valid_token").as_deref(), Some("Bearer valid_token"));
/// assert_eq!(authorization_value("Bearer valid_token").as_deref(), Some("Bearer valid_token"));
/// assert_eq!(authorization_value("  "), None);
/// ```
pub fn authorization_value(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(token) = parse_bearer_token_header(raw) {
        return Some(bearer_token(&token));
    }

    match raw.split_once(' ') {
        Some((scheme, credentials))
            if is_scheme_token(scheme) && !credentials.trim().is_empty() =>
        {
            Some(raw.to_string())
        }
        _ => Some(bearer_token(raw)),
    }
}

/// Sets the `Authorization` header on `request` when `raw` is not blank.
pub fn apply_authorization(request: &mut HttpRequest, raw: &str) {
    if let Some(value) = authorization_value(raw) {
        request.add_header("Authorization", value);
    }
}

fn is_scheme_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

//! Probe scenarios.
//!
//! A scenario is one request plus what a healthy server should do with
//! it. Scenarios are grouped into suites ([`Suite`]) that run top to
//! bottom, each request finishing before the next starts.

pub mod runner;
pub mod suites;

pub use runner::{run_scenario, run_scenarios, run_suite, ScenarioReport, SuiteReport};
pub use suites::{expect_continue_requests, multipart_uploads, post_requests, Suite};

use crate::executor::RequestError;
use crate::models::request::HttpRequest;
use crate::models::response::HttpResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One request and the behavior expected from the server.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Short identifier, e.g. `too-large-payload`.
    pub name: String,

    /// Headline printed before the request is sent.
    pub description: String,

    pub request: HttpRequest,

    pub expectation: Expectation,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        request: HttpRequest,
        expectation: Expectation,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            request,
            expectation,
        }
    }
}

/// What a correctly behaving server does with a scenario's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expectation {
    /// A 2xx response.
    Success,

    /// A 4xx response, or the connection being closed on us.
    RejectedOrClosed,

    /// Any response below 500; the server must neither fail nor hang up.
    Handled,
}

impl Expectation {
    pub fn describe(&self) -> &'static str {
        match self {
            Expectation::Success => "a 2xx response",
            Expectation::RejectedOrClosed => "a 4xx response or a closed connection",
            Expectation::Handled => "a response without a server error",
        }
    }

    /// Judges an outcome against this expectation.
    pub fn evaluate(&self, outcome: &Outcome) -> Verdict {
        let passed = match (self, outcome) {
            (Expectation::Success, Outcome::Response(r)) => r.is_success(),
            (Expectation::RejectedOrClosed, Outcome::Response(r)) => r.is_client_error(),
            (Expectation::RejectedOrClosed, Outcome::ConnectionClosed(_)) => true,
            (Expectation::Handled, Outcome::Response(r)) => r.status_code < 500,
            _ => false,
        };

        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail(format!(
                "expected {}, got {}",
                self.describe(),
                outcome.summary()
            ))
        }
    }
}

/// What actually happened when a request was sent.
#[derive(Debug)]
pub enum Outcome {
    /// The server answered, whatever the status.
    Response(HttpResponse),

    /// The server closed or reset the connection.
    ConnectionClosed(String),

    /// The request failed for another reason (refused, timed out, ...).
    Failed(RequestError),
}

impl Outcome {
    /// One-line description, e.g. `413 Payload Too Large`.
    pub fn summary(&self) -> String {
        match self {
            Outcome::Response(r) => format!("{} {}", r.status_code, r.status_text)
                .trim_end()
                .to_string(),
            Outcome::ConnectionClosed(_) => "a closed connection".to_string(),
            Outcome::Failed(e) => e.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Outcome::Response(r) => Some(r.status_code),
            _ => None,
        }
    }
}

impl From<Result<HttpResponse, RequestError>> for Outcome {
    fn from(result: Result<HttpResponse, RequestError>) -> Self {
        match result {
            Ok(response) => Outcome::Response(response),
            Err(RequestError::ConnectionClosed(details)) => Outcome::ConnectionClosed(details),
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// Result of judging one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail(reason) => write!(f, "FAIL ({})", reason),
        }
    }
}

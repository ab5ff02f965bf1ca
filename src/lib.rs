//! HTTP probe client
//!
//! Sends hand-crafted requests to a separately running HTTP server and
//! prints what comes back, so that the server's handling of awkward input
//! can be checked by eye.
//!
//! # Architecture
//!
//! - **models**: request and response data structures
//! - **auth**: `Authorization` header values
//! - **multipart**: in-memory files and the multipart form built from them
//! - **executor**: sends requests with reqwest, or over a raw socket for the
//!   `Expect: 100-continue` handshake
//! - **formatter**: renders status, headers and body for display
//! - **scenarios**: the built-in request suites and the runner that judges
//!   each outcome
//! - **config**: target server, timeouts and auth token
//!
//! # Closed connections
//!
//! A server is free to reset the connection instead of answering an
//! oversized or malformed request. The executor reports that as
//! [`executor::RequestError::ConnectionClosed`], and the scenarios accept it
//! wherever a 4xx would be accepted.
//!
//! # Usage
//!
//! ```no_run
//! use http_probe::config::ProbeConfig;
//! use http_probe::scenarios::{run_suite, Suite};
//!
//! # fn main() -> std::io::Result<()> {
//! let config = ProbeConfig::default();
//! let report = run_suite(Suite::Post, &config, &mut std::io::stdout())?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod executor;
pub mod formatter;
pub mod models;
pub mod multipart;
pub mod scenarios;

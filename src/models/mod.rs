//! Data models for probe requests and responses.

pub mod request;
pub mod response;

pub use request::{HttpMethod, HttpRequest, RequestBody};
pub use response::{HttpResponse, RequestTiming};
